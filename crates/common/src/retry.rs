//! Bounded retry with exponential backoff for idempotent reads.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::FundraiserError;

/// How often, and how patiently, a read is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A single attempt; the first failure is final.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
        }
    }
}

/// Run `f` until it succeeds, the error is not retryable, or attempts run out.
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    context: &str,
    mut f: F,
) -> Result<T, FundraiserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FundraiserError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        debug!("Attempt {}/{} for {}", attempt, max_attempts, context);

        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= max_attempts || !e.is_retryable() => return Err(e),
            Err(e) => {
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                    context, attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2); // Exponential backoff
                attempt += 1;
            }
        }
    }
}
