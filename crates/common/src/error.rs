//! Error types for the fundraiser system.

use std::time::Duration;

/// Failures raised by the collaborators the donation flow depends on.
///
/// Read failures (status, fee rate, exchange rate) are the only retryable
/// class. Broadcast is kept apart from them: resending a transaction whose
/// first submission may have landed risks a double send.
#[derive(Debug, thiserror::Error)]
pub enum FundraiserError {
    #[error("Campaign status unavailable: {0}")]
    Status(String),

    #[error("Wallet derivation failed: {0}")]
    Derivation(String),

    #[error("Payment wait failed: {0}")]
    Payment(String),

    #[error("No payment received within {0:?}")]
    PaymentTimeout(Duration),

    #[error("Fee rate unavailable: {0}")]
    FeeRate(String),

    #[error("Failed to build transaction: {0}")]
    TransactionBuild(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(String),

    #[error("Exchange rate unavailable: {0}")]
    ExchangeRate(String),

    /// The contract answered, but with a revert or an unusable value.
    #[error("Fundraiser contract error: {0}")]
    Contract(String),

    #[error("Invalid donation instruction: {0}")]
    Instruction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FundraiserError {
    /// Whether the failed call is an idempotent read that may be repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FundraiserError::Status(_) | FundraiserError::FeeRate(_) | FundraiserError::ExchangeRate(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_reads_are_retryable() {
        assert!(FundraiserError::Status("down".into()).is_retryable());
        assert!(FundraiserError::FeeRate("down".into()).is_retryable());
        assert!(FundraiserError::ExchangeRate("down".into()).is_retryable());

        assert!(!FundraiserError::Broadcast("rejected".into()).is_retryable());
        assert!(!FundraiserError::Signing("bad key".into()).is_retryable());
        assert!(!FundraiserError::Derivation("bad phrase".into()).is_retryable());
        assert!(!FundraiserError::Contract("execution reverted".into()).is_retryable());
        assert!(!FundraiserError::PaymentTimeout(Duration::from_secs(60)).is_retryable());
    }

    #[test]
    fn test_broadcast_message_is_distinct() {
        let err = FundraiserError::Broadcast("400 bad-txns".into());
        assert_eq!(err.to_string(), "Broadcast failed: 400 bad-txns");
    }
}
