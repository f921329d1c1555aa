//! Campaign parameters shown to the donor.

use common::RetryPolicy;

/// Campaign terms and session policy.
#[derive(Debug, Clone)]
pub struct DonationParams {
    /// Suggested allocation rate for BTC.
    pub atoms_per_btc: u64,
    /// Informational BTC minimum, in satoshis.
    pub btc_minimum_sats: u64,
    /// Informational ETH minimum, as displayed.
    pub eth_minimum: String,
    /// Where the terms of service and donation agreement can be read.
    pub terms_url: String,
    /// Block explorer base URL for transaction links.
    pub explorer_url: String,
    /// Applied to status, fee-rate and exchange-rate reads.
    pub retry: RetryPolicy,
}

impl DonationParams {
    pub fn tx_url(&self, txid: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), txid)
    }
}

impl Default for DonationParams {
    fn default() -> Self {
        Self {
            atoms_per_btc: 11_635,
            btc_minimum_sats: 1_000_000,
            eth_minimum: "1".to_string(),
            terms_url: "https://github.com/cosmos/cosmos/blob/master/fundraiser/Interchain%20Cosmos%20Contribution%20Terms%20-%20FINAL.pdf".to_string(),
            explorer_url: "https://blockstream.info".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}
