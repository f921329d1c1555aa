//! Blockchain implementations for the fundraiser.
//!
//! This crate provides the concrete collaborators behind the service traits
//! in `common`:
//! - Mnemonic generation and per-rail address derivation
//! - Bitcoin payment detection, final transaction building, signing, broadcast
//! - Ethereum exchange-rate lookup and donation call encoding
//! - Campaign status lookup

pub mod bitcoin;
pub mod ethereum;
pub mod status;
pub mod wallet;

pub use self::bitcoin::{BitcoinNetwork, EsploraBitcoinService, EsploraClient, FinalTxParams};
pub use ethereum::{EthereumRpcClient, FundraiserContract};
pub use status::HttpStatusService;
pub use wallet::Bip39WalletService;
