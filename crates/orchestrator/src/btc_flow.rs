//! BTC rail: hold, confirm twice, sign, broadcast.
//!
//! ```text
//! AwaitingPayment -> FeeNegotiated -> Terms -> FinalConfirmation -> Signed -> Broadcast
//!                                       |              |
//!                                       +-> declined   +-> declined
//! ```
//!
//! Nothing is signed until both confirmations are affirmative, and broadcast
//! happens at most once.

use common::{
    format_btc, retry_with_backoff, BitcoinService, FinalTransaction, PaymentInputs, Wallet,
};
use tracing::{debug, info};

use crate::console::Console;
use crate::error::DonationError;
use crate::outcome::{DeclineReason, StageOutcome};
use crate::params::DonationParams;

pub const TERMS_PROMPT: &str =
    "Have you read and agreed to the Terms of Service and Donation Agreement?";
pub const FINAL_PROMPT: &str =
    "Finalize contribution? You will NOT be able undo this transaction:";

/// Show the intermediate address and wait for funds to arrive there.
pub async fn await_payment(
    bitcoin: &dyn BitcoinService,
    wallet: &Wallet,
    params: &DonationParams,
    console: &mut dyn Console,
) -> Result<PaymentInputs, DonationError> {
    let address = &wallet.addresses().bitcoin;

    console.field(
        "Suggested allocation rate",
        &format!("1 BTC : {} ATOM", params.atoms_per_btc),
    );
    console.field("Minimum donation", &format_btc(params.btc_minimum_sats));
    console.info("Your intermediate Bitcoin address is:");
    console.highlight(address);
    console.info(
        "Send BTC to this address to continue with your contribution.\n\
         This address is owned by you, so you can get the coins back if you\n\
         change your mind.",
    );

    console.start_progress("Waiting for a transaction...");
    let result = bitcoin.wait_for_payment(address).await;
    let inputs = match result {
        Ok(inputs) => inputs,
        Err(e) => {
            console.finish_progress(None);
            return Err(e.into());
        }
    };
    console.finish_progress(Some(&format!(
        "Got payment of {}",
        format_btc(inputs.amount_sats)
    )));

    Ok(inputs)
}

/// Fetch a fresh fee rate and build the final transaction from it.
pub async fn negotiate_fee(
    bitcoin: &dyn BitcoinService,
    wallet: &Wallet,
    inputs: &PaymentInputs,
    params: &DonationParams,
    console: &mut dyn Console,
) -> Result<FinalTransaction, DonationError> {
    console.start_progress("Fetching BTC transaction fee rate...");
    let result = retry_with_backoff(&params.retry, "fee rate", || bitcoin.fetch_fee_rate()).await;
    console.finish_progress(None);
    let fee_rate = result?;
    debug!("Fee rate for this session: {}", fee_rate);

    let final_tx = bitcoin.build_final_transaction(inputs, fee_rate, &wallet.addresses().cosmos)?;
    Ok(final_tx)
}

/// Present the final transaction and collect both confirmations.
pub fn confirm_donation(
    final_tx: &FinalTransaction,
    wallet: &Wallet,
    params: &DonationParams,
    console: &mut dyn Console,
) -> Result<StageOutcome<()>, DonationError> {
    console.info("Ready to finalize contribution:");
    console.field("Donating", &format_btc(final_tx.paid_sats));
    console.field("Bitcoin transaction fee", &format_btc(final_tx.fee_sats));
    console.field(
        "Suggested Atom Equivalent",
        &format!("{} ATOM", final_tx.suggested_atoms),
    );
    console.field("Destination", &final_tx.destination);
    console.field("Cosmos address", &wallet.addresses().cosmos);

    if !console.confirm(TERMS_PROMPT, false)? {
        console.warning(&format!(
            "You can read the Terms of Service and Donation Agreement here:\n{}",
            params.terms_url
        ));
        return Ok(StageOutcome::Stop(DeclineReason::TermsNotAccepted));
    }

    if !console.confirm(FINAL_PROMPT, false)? {
        return Ok(StageOutcome::Stop(DeclineReason::FinalConfirmationDeclined));
    }

    Ok(StageOutcome::Continue(()))
}

/// Run the whole rail. Returns the broadcast txid.
pub async fn run_btc_flow(
    bitcoin: &dyn BitcoinService,
    wallet: &Wallet,
    params: &DonationParams,
    console: &mut dyn Console,
) -> Result<StageOutcome<String>, DonationError> {
    let inputs = await_payment(bitcoin, wallet, params, console).await?;
    let final_tx = negotiate_fee(bitcoin, wallet, &inputs, params, console).await?;

    if let StageOutcome::Stop(reason) = confirm_donation(&final_tx, wallet, params, console)? {
        info!("Donation not finalized: {:?}", reason);
        return Ok(StageOutcome::Stop(reason));
    }

    let signed = bitcoin.sign(wallet, &final_tx)?;
    debug!("Signed transaction {}", signed.txid);

    console.start_progress("Broadcasting transaction...");
    let result = bitcoin.broadcast(&signed).await;
    let txid = match result {
        Ok(txid) => txid,
        Err(e) => {
            console.finish_progress(None);
            return Err(e.into());
        }
    };
    console.finish_progress(Some("Transaction sent!"));

    console.field("Bitcoin TXID", &txid);
    console.field("Explorer", &params.tx_url(&txid));
    console.success("Thank you for participating in the Cosmos fundraiser!");

    Ok(StageOutcome::Continue(txid))
}
