//! The interactive donation command.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chains::{
    Bip39WalletService, EsploraBitcoinService, EsploraClient, EthereumRpcClient, FinalTxParams,
    FundraiserContract, HttpStatusService,
};
use orchestrator::{DeclineReason, DonationOutcome, DonationSession, Services};
use tracing::info;

use crate::config::Config;
use crate::output::OutputFormatter;
use crate::terminal::TerminalConsole;

/// Wire the network-backed collaborators described by `config`.
pub fn build_services(config: &Config) -> Result<Services> {
    let timeout = config.request_timeout();

    let status = HttpStatusService::new(config.status_url.clone(), timeout)
        .context("Failed to create status client")?;

    let esplora = EsploraClient::new(config.esplora_url(), timeout)
        .context("Failed to create Esplora client")?;
    let bitcoin = EsploraBitcoinService::new(
        esplora,
        FinalTxParams {
            exodus_address: config.exodus_address.clone(),
            network: config.network,
            atoms_per_btc: config.atoms_per_btc,
        },
    )
    .with_poll_interval(Duration::from_secs(config.payment_poll_secs))
    .with_payment_timeout(config.payment_timeout_secs.map(Duration::from_secs))
    .with_max_poll_failures(config.payment_poll_max_failures);

    let rpc = EthereumRpcClient::new(config.eth_rpc_url.clone(), timeout)
        .context("Failed to create Ethereum RPC client")?;
    let ethereum = FundraiserContract::new(rpc, config.fundraiser_contract.clone())
        .with_gas_limit(config.eth_gas_limit);

    Ok(Services {
        status: Arc::new(status),
        wallet: Arc::new(Bip39WalletService::new(config.network)),
        bitcoin: Arc::new(bitcoin),
        ethereum: Arc::new(ethereum),
    })
}

/// Run one donation session against the configured campaign.
pub async fn donate(config: &Config, formatter: OutputFormatter) -> Result<()> {
    config.validate()?;
    let services = build_services(config)?;
    let session = DonationSession::new(services, config.donation_params());

    formatter.banner();
    info!("Starting donation session on {}", config.network);

    let mut console = TerminalConsole::new(formatter);
    let outcome = match session.run(&mut console).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_broadcast_failure() => {
            formatter.warning(
                "The transaction may still have reached the network. \
                 Check your intermediate address on a block explorer before trying again.",
            );
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        DonationOutcome::Completed { txid } => info!("Donation completed: {}", txid),
        DonationOutcome::InstructionIssued(_) => info!("Donation instruction issued"),
        DonationOutcome::Declined(DeclineReason::CampaignInactive) => {
            info!("Donor stopped at the status gate")
        }
        DonationOutcome::Declined(reason) => info!("Donation not finalized: {:?}", reason),
    }

    Ok(())
}
