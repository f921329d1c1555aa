//! Errors that end a donation session.

use common::FundraiserError;

/// A failure the session cannot recover from.
///
/// User-declined paths are not errors; they come back as
/// [`DonationOutcome::Declined`](crate::DonationOutcome::Declined).
#[derive(Debug, thiserror::Error)]
pub enum DonationError {
    #[error(transparent)]
    Service(#[from] FundraiserError),

    /// The console could not prompt (closed stdin, no terminal).
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl DonationError {
    /// True when a signed transaction may or may not have reached the network.
    pub fn is_broadcast_failure(&self) -> bool {
        matches!(self, DonationError::Service(FundraiserError::Broadcast(_)))
    }
}
