//! Configuration management for the fundraiser CLI.
//!
//! Handles loading and saving configuration from ~/.fundraiser/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chains::BitcoinNetwork;
use common::RetryPolicy;
use orchestrator::DonationParams;
use serde::{Deserialize, Serialize};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Bitcoin network (mainnet, testnet)
    #[serde(default)]
    pub network: BitcoinNetwork,

    /// Campaign status endpoint
    #[serde(default)]
    pub status_url: String,

    /// Esplora API base; the network's public endpoint when unset
    #[serde(default)]
    pub esplora_url: Option<String>,

    /// Ethereum JSON-RPC endpoint
    #[serde(default = "default_eth_rpc_url")]
    pub eth_rpc_url: String,

    /// Campaign Bitcoin address receiving BTC donations
    #[serde(default)]
    pub exodus_address: String,

    /// Fundraiser contract receiving ETH donations
    #[serde(default)]
    pub fundraiser_contract: String,

    #[serde(default = "default_atoms_per_btc")]
    pub atoms_per_btc: u64,

    #[serde(default = "default_btc_minimum_sats")]
    pub btc_minimum_sats: u64,

    #[serde(default = "default_eth_minimum_donation")]
    pub eth_minimum_donation: String,

    #[serde(default = "default_eth_gas_limit")]
    pub eth_gas_limit: u64,

    /// Interval between payment checks (seconds)
    #[serde(default = "default_payment_poll_secs")]
    pub payment_poll_secs: u64,

    /// Give up waiting for a payment after this long (seconds); wait forever when unset
    #[serde(default)]
    pub payment_timeout_secs: Option<u64>,

    /// Consecutive failed payment polls before the wait ends with an error
    #[serde(default = "default_payment_poll_max_failures")]
    pub payment_poll_max_failures: u32,

    /// Attempts for status, fee-rate and exchange-rate reads
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,

    /// Timeout for HTTP requests (seconds)
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Enable colored output
    #[serde(default = "default_colored")]
    pub colored: bool,

    /// Terms of service and donation agreement
    #[serde(default = "default_terms_url")]
    pub terms_url: String,
}

fn default_eth_rpc_url() -> String {
    "https://cloudflare-eth.com".to_string()
}

fn default_atoms_per_btc() -> u64 {
    11_635
}

fn default_btc_minimum_sats() -> u64 {
    1_000_000
}

fn default_eth_minimum_donation() -> String {
    "1".to_string()
}

fn default_eth_gas_limit() -> u64 {
    chains::ethereum::DEFAULT_GAS_LIMIT
}

fn default_payment_poll_secs() -> u64 {
    10
}

fn default_payment_poll_max_failures() -> u32 {
    chains::bitcoin::DEFAULT_MAX_POLL_FAILURES
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_initial_delay_ms() -> u64 {
    500
}

fn default_timeout() -> u64 {
    30
}

fn default_colored() -> bool {
    true
}

fn default_terms_url() -> String {
    "https://github.com/cosmos/cosmos/blob/master/fundraiser/Interchain%20Cosmos%20Contribution%20Terms%20-%20FINAL.pdf".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: BitcoinNetwork::default(),
            status_url: String::new(),
            esplora_url: None,
            eth_rpc_url: default_eth_rpc_url(),
            exodus_address: String::new(),
            fundraiser_contract: String::new(),
            atoms_per_btc: default_atoms_per_btc(),
            btc_minimum_sats: default_btc_minimum_sats(),
            eth_minimum_donation: default_eth_minimum_donation(),
            eth_gas_limit: default_eth_gas_limit(),
            payment_poll_secs: default_payment_poll_secs(),
            payment_timeout_secs: None,
            payment_poll_max_failures: default_payment_poll_max_failures(),
            retry_attempts: default_retry_attempts(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            request_timeout_secs: default_timeout(),
            colored: default_colored(),
            terms_url: default_terms_url(),
        }
    }
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub network: Option<BitcoinNetwork>,
    pub status_url: Option<String>,
    pub esplora_url: Option<String>,
    pub eth_rpc_url: Option<String>,
    pub exodus_address: Option<String>,
    pub fundraiser_contract: Option<String>,
    pub payment_timeout_secs: Option<u64>,
    pub no_color: bool,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the path to the config directory
    pub fn config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home_dir.join(".fundraiser"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

            toml::from_str(&contents).context("Failed to parse config file")
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(network) = overrides.network {
            self.network = network;
        }
        if let Some(url) = overrides.status_url {
            self.status_url = url;
        }
        if let Some(url) = overrides.esplora_url {
            self.esplora_url = Some(url);
        }
        if let Some(url) = overrides.eth_rpc_url {
            self.eth_rpc_url = url;
        }
        if let Some(address) = overrides.exodus_address {
            self.exodus_address = address;
        }
        if let Some(contract) = overrides.fundraiser_contract {
            self.fundraiser_contract = contract;
        }
        if overrides.payment_timeout_secs.is_some() {
            self.payment_timeout_secs = overrides.payment_timeout_secs;
        }
        if overrides.no_color {
            self.colored = false;
        }
    }

    /// Check the campaign parameters a donation cannot proceed without.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("status_url", &self.status_url),
            ("exodus_address", &self.exodus_address),
            ("fundraiser_contract", &self.fundraiser_contract),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing configuration: {}. Set them in {} or pass them as flags",
                missing.join(", "),
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "the config file".to_string())
            );
        }
        if self.atoms_per_btc == 0 {
            anyhow::bail!("atoms_per_btc must be greater than zero");
        }
        if self.payment_poll_secs == 0 {
            anyhow::bail!("payment_poll_secs must be greater than zero");
        }
        if self.payment_poll_max_failures == 0 {
            anyhow::bail!("payment_poll_max_failures must be greater than zero");
        }
        Ok(())
    }

    pub fn esplora_url(&self) -> &str {
        self.esplora_url
            .as_deref()
            .unwrap_or_else(|| self.network.api_url())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
        }
    }

    pub fn donation_params(&self) -> DonationParams {
        DonationParams {
            atoms_per_btc: self.atoms_per_btc,
            btc_minimum_sats: self.btc_minimum_sats,
            eth_minimum: self.eth_minimum_donation.clone(),
            terms_url: self.terms_url.clone(),
            explorer_url: self.network.explorer_url().to_string(),
            retry: self.retry_policy(),
        }
    }
}
