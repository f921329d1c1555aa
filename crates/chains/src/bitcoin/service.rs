//! Esplora-backed implementation of the BTC rail.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{
    BitcoinService, FeeRate, FinalTransaction, FundraiserError, PaymentInputs, SignedTransaction,
    Wallet,
};
use tracing::{debug, info, warn};

use super::client::EsploraClient;
use super::transaction::{build_final_transaction, sign_final_transaction, FinalTxParams};

/// Consecutive failed payment polls tolerated before the wait gives up.
pub const DEFAULT_MAX_POLL_FAILURES: u32 = 6;

/// BTC rail backed by an Esplora API.
pub struct EsploraBitcoinService {
    client: EsploraClient,
    params: FinalTxParams,
    poll_interval: Duration,
    payment_timeout: Option<Duration>,
    max_poll_failures: u32,
}

impl EsploraBitcoinService {
    pub fn new(client: EsploraClient, params: FinalTxParams) -> Self {
        Self {
            client,
            params,
            poll_interval: Duration::from_secs(10),
            payment_timeout: None,
            max_poll_failures: DEFAULT_MAX_POLL_FAILURES,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Give up waiting for a payment after `timeout`. Without one the wait is
    /// unbounded.
    pub fn with_payment_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.payment_timeout = timeout;
        self
    }

    /// End the wait with the last poll error once this many polls in a row
    /// have failed. An empty UTXO set is not a failure.
    pub fn with_max_poll_failures(mut self, max: u32) -> Self {
        self.max_poll_failures = max.max(1);
        self
    }
}

#[async_trait]
impl BitcoinService for EsploraBitcoinService {
    async fn wait_for_payment(&self, address: &str) -> Result<PaymentInputs, FundraiserError> {
        let started = Instant::now();
        let mut failures = 0u32;
        info!("Waiting for payment to {}", address);

        loop {
            match self.client.get_utxos(address).await {
                Ok(utxos) if !utxos.is_empty() => {
                    let inputs = PaymentInputs::new(address, utxos);
                    info!(
                        "Payment received: {} sats in {} UTXO(s)",
                        inputs.amount_sats,
                        inputs.utxos.len()
                    );
                    return Ok(inputs);
                }
                Ok(_) => {
                    failures = 0;
                    debug!("No UTXOs yet at {}", address);
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    if failures >= self.max_poll_failures {
                        return Err(FundraiserError::Payment(format!(
                            "{} consecutive polls failed, last error: {}",
                            failures, e
                        )));
                    }
                    warn!(
                        "Payment poll failed ({}/{}): {}",
                        failures, self.max_poll_failures, e
                    );
                }
            }

            if let Some(timeout) = self.payment_timeout {
                if started.elapsed() >= timeout {
                    return Err(FundraiserError::PaymentTimeout(timeout));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn fetch_fee_rate(&self) -> Result<FeeRate, FundraiserError> {
        let estimates = self.client.get_fee_estimates().await?;
        let rate = FeeRate(estimates.recommended());
        debug!("Fee rate: {}", rate);
        Ok(rate)
    }

    fn build_final_transaction(
        &self,
        inputs: &PaymentInputs,
        fee_rate: FeeRate,
        claim_address: &str,
    ) -> Result<FinalTransaction, FundraiserError> {
        build_final_transaction(inputs, fee_rate, &self.params, claim_address)
    }

    fn sign(
        &self,
        wallet: &Wallet,
        final_tx: &FinalTransaction,
    ) -> Result<SignedTransaction, FundraiserError> {
        sign_final_transaction(wallet, final_tx, self.params.network)
    }

    async fn broadcast(&self, signed: &SignedTransaction) -> Result<String, FundraiserError> {
        let txid = self.client.broadcast_tx(&signed.hex).await?;
        if txid != signed.txid {
            warn!("Network reported txid {} for {}", txid, signed.txid);
        }
        info!("Broadcast transaction {}", txid);
        Ok(txid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitcoin::BitcoinNetwork;

    // Nothing listens on port 1, so every poll fails with connection refused.
    fn unreachable_service() -> EsploraBitcoinService {
        let client = EsploraClient::new("http://127.0.0.1:1", Duration::from_millis(200)).unwrap();
        EsploraBitcoinService::new(
            client,
            FinalTxParams {
                exodus_address: "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx".to_string(),
                network: BitcoinNetwork::Testnet,
                atoms_per_btc: 11_635,
            },
        )
        .with_poll_interval(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_persistent_poll_failures_surface() {
        let service = unreachable_service().with_max_poll_failures(3);

        let result = tokio::time::timeout(Duration::from_secs(10), service.wait_for_payment("tb1qx"))
            .await
            .expect("wait should end on its own");

        match result {
            Err(FundraiserError::Payment(message)) => {
                assert!(message.starts_with("3 consecutive polls failed"));
            }
            other => panic!("expected a payment error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_polls_continue_until_timeout() {
        let service = unreachable_service()
            .with_max_poll_failures(u32::MAX)
            .with_payment_timeout(Some(Duration::from_millis(100)));

        let result = tokio::time::timeout(Duration::from_secs(10), service.wait_for_payment("tb1qx"))
            .await
            .expect("timeout should fire");

        match result {
            Err(FundraiserError::PaymentTimeout(timeout)) => {
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("expected a payment timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_limit_is_at_least_one() {
        let service = unreachable_service().with_max_poll_failures(0);
        assert_eq!(service.max_poll_failures, 1);
    }
}
