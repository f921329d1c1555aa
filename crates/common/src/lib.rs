//! Common types shared between fundraiser components.

pub mod credential;
pub mod error;
pub mod retry;
pub mod services;
pub mod types;

pub use credential::{Credential, VerifiedCredential};
pub use error::FundraiserError;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use services::{BitcoinService, EthereumService, StatusService, WalletService};
pub use types::{
    CampaignStatus, Currency, DonationInstruction, EthTransaction, FeeRate, FinalTransaction,
    PaymentInputs, SignedTransaction, Utxo, UtxoStatus, Wallet, WalletAddresses,
};

/// Satoshis per whole bitcoin.
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Wei per whole ether.
pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Format satoshis as BTC with 8 decimal places.
pub fn format_btc(sats: u64) -> String {
    format!("{:.8} BTC", sats as f64 / SATS_PER_BTC as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_btc() {
        assert_eq!(format_btc(5_000_000), "0.05000000 BTC");
        assert_eq!(format_btc(1), "0.00000001 BTC");
    }
}
