//! Collaborator interfaces the donation flow depends on.
//!
//! Each network-facing call is a single async method so the orchestrator can
//! suspend on it; concrete implementations live in the `chains` crate and
//! tests substitute fakes.

use async_trait::async_trait;

use crate::credential::{Credential, VerifiedCredential};
use crate::error::FundraiserError;
use crate::types::{
    CampaignStatus, EthTransaction, FeeRate, FinalTransaction, PaymentInputs, SignedTransaction,
    Wallet,
};

/// Campaign status lookup.
#[async_trait]
pub trait StatusService: Send + Sync {
    async fn fetch_status(&self) -> Result<CampaignStatus, FundraiserError>;
}

/// Credential generation and wallet derivation.
pub trait WalletService: Send + Sync {
    /// Generate a fresh credential. Never called more than once per session.
    fn generate_credential(&self) -> Result<Credential, FundraiserError>;

    /// Derive the wallet. Deterministic for a given phrase.
    fn derive_wallet(&self, credential: &VerifiedCredential) -> Result<Wallet, FundraiserError>;
}

/// Hold-and-broadcast rail primitives.
#[async_trait]
pub trait BitcoinService: Send + Sync {
    /// Suspend until funds arrive at `address`.
    async fn wait_for_payment(&self, address: &str) -> Result<PaymentInputs, FundraiserError>;

    async fn fetch_fee_rate(&self) -> Result<FeeRate, FundraiserError>;

    /// Pure: identical arguments always yield an identical transaction.
    fn build_final_transaction(
        &self,
        inputs: &PaymentInputs,
        fee_rate: FeeRate,
        claim_address: &str,
    ) -> Result<FinalTransaction, FundraiserError>;

    fn sign(
        &self,
        wallet: &Wallet,
        final_tx: &FinalTransaction,
    ) -> Result<SignedTransaction, FundraiserError>;

    /// Submit the transaction once. Returns the txid reported by the network.
    async fn broadcast(&self, signed: &SignedTransaction) -> Result<String, FundraiserError>;
}

/// Instruction-only rail primitives.
#[async_trait]
pub trait EthereumService: Send + Sync {
    /// Price of one atom in wei, read from the fundraiser contract.
    async fn fetch_wei_per_atom(&self) -> Result<u128, FundraiserError>;

    /// Contract call that records `claim_address` as the donor.
    fn build_payload(
        &self,
        claim_address: &str,
        return_address: &str,
    ) -> Result<EthTransaction, FundraiserError>;
}
