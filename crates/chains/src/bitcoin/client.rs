//! Bitcoin blockchain API client (Esplora/Blockstream compatible).
//!
//! Provides async access to:
//! - UTXOs of the intermediate address
//! - Fee estimation
//! - Transaction broadcasting

use std::time::Duration;

use common::{FundraiserError, Utxo};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Network
// ============================================================================

/// Bitcoin network the fundraiser runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BitcoinNetwork {
    #[default]
    Mainnet,
    Testnet,
}

impl BitcoinNetwork {
    /// Parse from string (config file or environment variable).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Some(BitcoinNetwork::Mainnet),
            "testnet" | "test" => Some(BitcoinNetwork::Testnet),
            _ => None,
        }
    }

    /// Default Blockstream API base URL.
    pub fn api_url(&self) -> &'static str {
        match self {
            BitcoinNetwork::Mainnet => "https://blockstream.info/api",
            BitcoinNetwork::Testnet => "https://blockstream.info/testnet/api",
        }
    }

    /// Block explorer URL.
    pub fn explorer_url(&self) -> &'static str {
        match self {
            BitcoinNetwork::Mainnet => "https://blockstream.info",
            BitcoinNetwork::Testnet => "https://blockstream.info/testnet",
        }
    }

    /// BIP44 coin type for the intermediate address path.
    pub fn coin_type(&self) -> u32 {
        match self {
            BitcoinNetwork::Mainnet => 0,
            BitcoinNetwork::Testnet => 1,
        }
    }

    /// Get the bitcoin crate Network type.
    pub fn to_bitcoin_network(&self) -> bitcoin::Network {
        match self {
            BitcoinNetwork::Mainnet => bitcoin::Network::Bitcoin,
            BitcoinNetwork::Testnet => bitcoin::Network::Testnet,
        }
    }
}

impl std::fmt::Display for BitcoinNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BitcoinNetwork::Mainnet => write!(f, "mainnet"),
            BitcoinNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

// ============================================================================
// Fee estimates
// ============================================================================

/// Fee estimates by confirmation target (blocks).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeeEstimates {
    #[serde(rename = "1", default)]
    pub fastest: f64,
    #[serde(rename = "3", default)]
    pub fast: f64,
    #[serde(rename = "6", default)]
    pub medium: f64,
    #[serde(rename = "144", default)]
    pub slow: f64,
}

impl FeeEstimates {
    /// Recommended fee rate: the 6-block target, falling back to the 3-block
    /// target, never below 1 sat/vB.
    pub fn recommended(&self) -> u64 {
        let base = if self.medium > 0.0 {
            self.medium.ceil() as u64
        } else if self.fast > 0.0 {
            self.fast.ceil() as u64
        } else {
            1
        };
        base.max(1)
    }
}

// ============================================================================
// Esplora client
// ============================================================================

/// Async client for an Esplora API.
#[derive(Clone)]
pub struct EsploraClient {
    api_base: String,
    client: reqwest::Client,
}

impl EsploraClient {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, FundraiserError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FundraiserError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Get UTXOs for an address, confirmed and unconfirmed.
    pub async fn get_utxos(&self, address: &str) -> Result<Vec<Utxo>, FundraiserError> {
        let url = format!("{}/address/{}/utxo", self.api_base, address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FundraiserError::Payment(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FundraiserError::Payment(format!(
                "API error {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FundraiserError::Serialization(format!("Failed to parse UTXOs: {}", e)))
    }

    /// Get current fee estimates (sat/vB).
    pub async fn get_fee_estimates(&self) -> Result<FeeEstimates, FundraiserError> {
        let url = format!("{}/fee-estimates", self.api_base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FundraiserError::FeeRate(format!("Fee estimate failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FundraiserError::FeeRate(format!(
                "Fee estimate error {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FundraiserError::FeeRate(format!("Failed to parse fees: {}", e)))
    }

    /// Broadcast a signed transaction. Called at most once per transaction.
    pub async fn broadcast_tx(&self, tx_hex: &str) -> Result<String, FundraiserError> {
        let url = format!("{}/tx", self.api_base);
        debug!("Broadcasting {} byte transaction", tx_hex.len() / 2);

        let response = self
            .client
            .post(&url)
            .body(tx_hex.to_string())
            .send()
            .await
            .map_err(|e| FundraiserError::Broadcast(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FundraiserError::Broadcast(format!("{}: {}", status, body)));
        }

        // Response is just the txid as plain text
        let txid = response
            .text()
            .await
            .map_err(|e| FundraiserError::Broadcast(format!("Failed to read txid: {}", e)))?;
        Ok(txid.trim().to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
