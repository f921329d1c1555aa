//! Stage and session outcomes.

use common::DonationInstruction;

/// Why a session ended without a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// The campaign is inactive and the donor chose not to continue.
    CampaignInactive,
    /// The donor did not accept the terms of service.
    TermsNotAccepted,
    /// The donor declined the final irreversibility confirmation.
    FinalConfirmationDeclined,
}

/// Result of a single stage: carry on with a value, or stop the session.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Continue(T),
    Stop(DeclineReason),
}

/// How a donation session ended. Every variant is a clean exit.
#[derive(Debug, Clone, PartialEq)]
pub enum DonationOutcome {
    /// BTC forwarded to the campaign.
    Completed { txid: String },
    /// ETH instruction rendered for external execution.
    InstructionIssued(DonationInstruction),
    Declined(DeclineReason),
}

impl From<DeclineReason> for DonationOutcome {
    fn from(reason: DeclineReason) -> Self {
        DonationOutcome::Declined(reason)
    }
}
