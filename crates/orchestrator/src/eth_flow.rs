//! ETH rail: produce an instruction the donor executes in their own wallet.

use common::{retry_with_backoff, DonationInstruction, EthereumService, Wallet, WEI_PER_ETH};

use crate::console::Console;
use crate::error::DonationError;
use crate::params::DonationParams;

/// Atoms per whole ether for a contract price in wei per atom.
pub fn atoms_per_eth(wei_per_atom: u128) -> f64 {
    WEI_PER_ETH as f64 / wei_per_atom as f64
}

/// Fetch the rate, build the call and render it. Never signs or sends.
pub async fn run_eth_flow(
    ethereum: &dyn EthereumService,
    wallet: &Wallet,
    params: &DonationParams,
    console: &mut dyn Console,
) -> Result<DonationInstruction, DonationError> {
    let addresses = wallet.addresses();
    let transaction = ethereum.build_payload(&addresses.cosmos, &addresses.ethereum)?;

    console.start_progress("Fetching ATOM/ETH exchange rate...");
    let result = retry_with_backoff(&params.retry, "exchange rate", || {
        ethereum.fetch_wei_per_atom()
    })
    .await;
    console.finish_progress(None);
    let rate = atoms_per_eth(result?);

    let instruction = DonationInstruction::new(
        transaction,
        &addresses.cosmos,
        &addresses.ethereum,
        rate,
        params.eth_minimum.clone(),
    )?;

    console.field("Suggested allocation rate", &format!("1 ETH : {} ATOM", rate));
    console.field("Minimum donation", &format!("{} ETH", instruction.minimum_eth));
    console.field(
        "Your Cosmos address",
        &format!("{} (DO NOT SEND ETHER HERE!)", instruction.claim_address),
    );
    console.info("Here's your donation transaction:");
    console.highlight(&instruction.transaction_json()?);
    console.info(
        "To make your donation, copy and paste this information into a wallet\n\
         such as MyEtherWallet or Mist. Be sure to include an amount of ETH to\n\
         donate! Your Cosmos address is included in the data, and the donation\n\
         will be recorded for that address in the smart contract.",
    );
    console.success("Thank you for participating in the Cosmos Fundraiser!");

    Ok(instruction)
}
