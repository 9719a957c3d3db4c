//! Error types for the re-ranking pipeline.
//!
//! # Failure Domains
//!
//! | Domain | Variants | Visible to caller? |
//! |--------|----------|--------------------|
//! | Oracle unavailable | `NetworkError`, `Timeout`, `ApiError`, `EmptyResponse` | No, absorbed |
//! | Malformed oracle output | none, handled by the parser fallback | No |
//! | Invalid input | `InvalidInput` | Yes |
//! | Collaborators | `SearchError`, `ConfigError` | Yes |
//!
//! The reranker never returns an oracle error to its caller. Those variants
//! exist so that the oracle client can report *why* it failed and so the
//! orchestrator can decide whether a retry is worthwhile.

use std::time::Duration;
use thiserror::Error;

/// Result type for re-ranking operations.
pub type Result<T> = std::result::Result<T, RerankError>;

// ============================================================================
// Retry Strategy
// ============================================================================

/// Strategy for retrying a failed oracle call.
///
/// The oracle client itself never retries. The orchestrator builds one of
/// these from [`crate::reranker::RerankConfig`] and hands it to
/// [`crate::retry::RetryExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Retry retryable failures with exponential backoff.
    ExponentialBackoff {
        /// Initial delay before first retry.
        base_delay: Duration,
        /// Maximum delay between retries.
        max_delay: Duration,
        /// Maximum number of retries after the first attempt.
        max_retries: u32,
    },

    /// Single attempt.
    NoRetry,
}

impl RetryStrategy {
    /// Build a strategy from a retry count and base delay.
    ///
    /// Zero retries yields [`RetryStrategy::NoRetry`].
    pub fn with_retries(max_retries: u32, base_delay: Duration) -> Self {
        if max_retries == 0 {
            Self::NoRetry
        } else {
            Self::ExponentialBackoff {
                base_delay,
                max_delay: Duration::from_secs(10),
                max_retries,
            }
        }
    }

    /// Check if this strategy allows retrying.
    pub fn should_retry(&self) -> bool {
        !matches!(self, Self::NoRetry)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while producing recommendations.
#[derive(Debug, Error)]
pub enum RerankError {
    /// Caller supplied arguments that cannot be served.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Could not reach the oracle.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The oracle did not answer within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The oracle answered with a non-success status.
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// The oracle answered successfully but without any text.
    #[error("Oracle returned an empty response")]
    EmptyResponse,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The similarity search collaborator failed.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for RerankError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RerankError::Timeout
        } else if err.is_connect() {
            RerankError::NetworkError(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            RerankError::Unknown(format!("Failed to decode oracle response: {}", err))
        } else {
            RerankError::NetworkError(err.to_string())
        }
    }
}

impl RerankError {
    /// Whether this error belongs to the oracle-unavailable domain.
    ///
    /// Every such error is recovered by the reranker with prior-order fallback.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_)
                | Self::Timeout
                | Self::ApiError { .. }
                | Self::EmptyResponse
                | Self::SerializationError(_)
                | Self::Unknown(_)
        )
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Network failures, timeouts, rate limiting (429) and server errors (5xx)
    /// are transient. Client errors and empty bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError(_) | Self::Timeout => true,
            Self::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
