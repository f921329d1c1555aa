//! Bitcoin blockchain support.
//!
//! Includes:
//! - Esplora API client (UTXOs, fee estimates, broadcast)
//! - Final transaction building and P2WPKH signing
//! - The `BitcoinService` implementation used by the BTC rail

pub mod client;
pub mod service;
pub mod transaction;

pub use client::*;
pub use service::*;
pub use transaction::*;
