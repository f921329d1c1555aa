//! Campaign status gate.

use common::{retry_with_backoff, RetryPolicy, StatusService};
use tracing::info;

use crate::console::Console;
use crate::error::DonationError;
use crate::outcome::{DeclineReason, StageOutcome};

pub const INACTIVE_PROMPT: &str = "NOTICE: The fundraiser has ended or has not yet started.\n\
You may still donate, but you will NOT receive Atoms.\n\
Continue anyway?";

/// Check the campaign is running, or that the donor accepts it is not.
pub async fn check_status(
    status: &dyn StatusService,
    retry: &RetryPolicy,
    console: &mut dyn Console,
) -> Result<StageOutcome<()>, DonationError> {
    console.start_progress("Checking fundraiser status...");
    let result = retry_with_backoff(retry, "campaign status", || status.fetch_status()).await;
    console.finish_progress(None);
    let campaign = result?;

    if campaign.is_active() {
        return Ok(StageOutcome::Continue(()));
    }

    info!("Campaign inactive: {:?}", campaign);
    if console.confirm(INACTIVE_PROMPT, false)? {
        Ok(StageOutcome::Continue(()))
    } else {
        Ok(StageOutcome::Stop(DeclineReason::CampaignInactive))
    }
}
