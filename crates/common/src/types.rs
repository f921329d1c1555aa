//! Domain types passed between the donation stages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FundraiserError;

// ============================================================================
// Campaign
// ============================================================================

/// Campaign status as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignStatus {
    pub started: bool,
    pub ended: bool,
}

impl CampaignStatus {
    /// Donations only earn a claim while the campaign is running.
    pub fn is_active(&self) -> bool {
        self.started && !self.ended
    }
}

/// Settlement rail chosen by the donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    /// Hold-and-broadcast: funds pass through an intermediate address.
    Btc,
    /// Instruction-only: the donor executes the transaction elsewhere.
    Eth,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Btc, Currency::Eth];
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Btc => write!(f, "BTC"),
            Currency::Eth => write!(f, "ETH"),
        }
    }
}

// ============================================================================
// Wallet
// ============================================================================

/// Per-rail addresses derived from a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAddresses {
    /// Intermediate Bitcoin address the donor funds for the BTC rail.
    pub bitcoin: String,
    /// Ethereum return address embedded in the ETH instruction.
    pub ethereum: String,
    /// Claim-reference address the donation is attributed to.
    pub cosmos: String,
}

/// A wallet derived from a verified credential. Never mutated after derivation.
#[derive(Clone)]
pub struct Wallet {
    addresses: WalletAddresses,
    bitcoin_key: bitcoin::PrivateKey,
}

impl Wallet {
    pub fn new(addresses: WalletAddresses, bitcoin_key: bitcoin::PrivateKey) -> Self {
        Self {
            addresses,
            bitcoin_key,
        }
    }

    pub fn addresses(&self) -> &WalletAddresses {
        &self.addresses
    }

    /// Key controlling the intermediate Bitcoin address.
    pub fn bitcoin_key(&self) -> &bitcoin::PrivateKey {
        &self.bitcoin_key
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("addresses", &self.addresses)
            .field("bitcoin_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// BTC rail
// ============================================================================

/// A UTXO (Unspent Transaction Output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    pub value: u64, // satoshis
    #[serde(default)]
    pub status: UtxoStatus,
}

/// Status of a UTXO (confirmed or in mempool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UtxoStatus {
    pub confirmed: bool,
    #[serde(default)]
    pub block_height: Option<u64>,
}

/// Funds credited to the intermediate address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInputs {
    pub address: String,
    pub utxos: Vec<Utxo>,
    pub amount_sats: u64,
}

impl PaymentInputs {
    pub fn new(address: impl Into<String>, utxos: Vec<Utxo>) -> Self {
        let amount_sats = utxos.iter().map(|u| u.value).sum();
        Self {
            address: address.into(),
            utxos,
            amount_sats,
        }
    }
}

/// Fee rate in sat/vB, fetched fresh for every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRate(pub u64);

impl FeeRate {
    pub fn sat_per_vb(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sat/vB", self.0)
    }
}

/// The transaction that forwards received funds to the campaign.
///
/// Built wholly from the payment inputs and fee rate; any renegotiation
/// discards it and builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalTransaction {
    /// Amount forwarded to the campaign.
    pub paid_sats: u64,
    /// Network fee.
    pub fee_sats: u64,
    /// Suggested credit equivalent of `paid_sats`.
    pub suggested_atoms: f64,
    /// Campaign receiving address.
    pub destination: String,
    /// Claim address recorded in the transaction.
    pub claim_address: String,
    /// Inputs being spent, in transaction order.
    pub inputs: Vec<Utxo>,
    /// The unsigned transaction.
    pub tx: bitcoin::Transaction,
}

/// A signed, broadcastable transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub txid: String,
    pub hex: String,
}

// ============================================================================
// ETH rail
// ============================================================================

/// Transaction fields the donor pastes into their own wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EthTransaction {
    pub to: String,
    pub gas: u64,
    pub data: String,
}

/// Everything the donor needs to execute an ETH donation externally.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationInstruction {
    pub transaction: EthTransaction,
    pub claim_address: String,
    pub return_address: String,
    pub atoms_per_eth: f64,
    pub minimum_eth: String,
}

impl DonationInstruction {
    /// Assemble an instruction. The claim address must be present, otherwise
    /// the donation cannot be attributed to anyone.
    pub fn new(
        transaction: EthTransaction,
        claim_address: &str,
        return_address: &str,
        atoms_per_eth: f64,
        minimum_eth: impl Into<String>,
    ) -> Result<Self, FundraiserError> {
        let claim = claim_address.trim().trim_start_matches("0x").to_lowercase();
        if claim.is_empty() {
            return Err(FundraiserError::Instruction(
                "claim address is missing".to_string(),
            ));
        }
        if !transaction.data.to_lowercase().contains(&claim) {
            return Err(FundraiserError::Instruction(format!(
                "transaction data does not reference claim address {}",
                claim_address
            )));
        }

        Ok(Self {
            transaction,
            claim_address: claim_address.to_string(),
            return_address: return_address.to_string(),
            atoms_per_eth,
            minimum_eth: minimum_eth.into(),
        })
    }

    /// Pretty JSON of the transaction fields.
    pub fn transaction_json(&self) -> Result<String, FundraiserError> {
        serde_json::to_string_pretty(&self.transaction)
            .map_err(|e| FundraiserError::Serialization(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
