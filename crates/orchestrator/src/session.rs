//! Top-level donation driver.

use std::sync::Arc;

use common::{BitcoinService, Currency, EthereumService, StatusService, WalletService};
use tracing::info;

use crate::btc_flow::run_btc_flow;
use crate::console::Console;
use crate::currency::select_currency;
use crate::error::DonationError;
use crate::eth_flow::run_eth_flow;
use crate::outcome::{DonationOutcome, StageOutcome};
use crate::params::DonationParams;
use crate::status_gate::check_status;
use crate::wallet_acquisition::acquire_wallet;

/// Collaborators a session depends on.
#[derive(Clone)]
pub struct Services {
    pub status: Arc<dyn StatusService>,
    pub wallet: Arc<dyn WalletService>,
    pub bitcoin: Arc<dyn BitcoinService>,
    pub ethereum: Arc<dyn EthereumService>,
}

/// One pass through status gate, wallet, currency and the chosen rail.
pub struct DonationSession {
    services: Services,
    params: DonationParams,
}

impl DonationSession {
    pub fn new(services: Services, params: DonationParams) -> Self {
        Self { services, params }
    }

    pub async fn run(&self, console: &mut dyn Console) -> Result<DonationOutcome, DonationError> {
        if let StageOutcome::Stop(reason) =
            check_status(self.services.status.as_ref(), &self.params.retry, console).await?
        {
            info!("Session ended at status gate");
            return Ok(reason.into());
        }

        let wallet = acquire_wallet(self.services.wallet.as_ref(), console)?;
        let currency = select_currency(console)?;
        info!("Donating in {}", currency);

        let outcome = match currency {
            Currency::Btc => {
                match run_btc_flow(self.services.bitcoin.as_ref(), &wallet, &self.params, console)
                    .await?
                {
                    StageOutcome::Continue(txid) => DonationOutcome::Completed { txid },
                    StageOutcome::Stop(reason) => reason.into(),
                }
            }
            Currency::Eth => DonationOutcome::InstructionIssued(
                run_eth_flow(self.services.ethereum.as_ref(), &wallet, &self.params, console)
                    .await?,
            ),
        };

        Ok(outcome)
    }
}
