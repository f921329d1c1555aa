//! Interactive donation orchestrator.
//!
//! A session runs strictly in order:
//! status gate -> wallet acquisition -> currency selection -> BTC or ETH rail.
//! Each stage reports whether to continue; only the session decides to stop.

pub mod btc_flow;
pub mod console;
pub mod currency;
pub mod error;
pub mod eth_flow;
pub mod outcome;
pub mod params;
pub mod session;
pub mod status_gate;
pub mod wallet_acquisition;

pub use console::Console;
pub use error::DonationError;
pub use outcome::{DeclineReason, DonationOutcome, StageOutcome};
pub use params::DonationParams;
pub use session::{DonationSession, Services};
pub use wallet_acquisition::WalletChoice;
