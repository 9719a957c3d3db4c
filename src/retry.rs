//! Retry executor for oracle calls.
//!
//! The oracle client makes exactly one request per call. When the reranker is
//! configured with `oracle_retries > 0` it wraps the call in a
//! [`RetryExecutor`], which retries only errors that report
//! [`RerankError::is_retryable`].
//!
//! ```ignore
//! use recsys_rerank::retry::RetryExecutor;
//! use recsys_rerank::RetryStrategy;
//!
//! let executor = RetryExecutor::new();
//! let text = executor
//!     .execute(&RetryStrategy::with_retries(2, base_delay), || async {
//!         oracle.generate(&prompt, &options).await
//!     })
//!     .await?;
//! ```

use crate::error::{RerankError, RetryStrategy};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Executor for retry logic with exponential backoff.
#[derive(Debug, Default)]
pub struct RetryExecutor {
    log_retries: bool,
}

impl RetryExecutor {
    /// Create a new retry executor.
    pub fn new() -> Self {
        Self { log_retries: true }
    }

    /// Create a retry executor without logging.
    pub fn silent() -> Self {
        Self { log_retries: false }
    }

    /// Run `operation`, retrying according to `strategy`.
    ///
    /// Returns the first success, or the last error once retries are
    /// exhausted or a non-retryable error is seen.
    pub async fn execute<F, Fut, T>(
        &self,
        strategy: &RetryStrategy,
        mut operation: F,
    ) -> Result<T, RerankError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RerankError>>,
    {
        match strategy {
            RetryStrategy::NoRetry => operation().await,
            RetryStrategy::ExponentialBackoff {
                base_delay,
                max_delay,
                max_retries,
            } => {
                self.execute_exponential_backoff(*base_delay, *max_delay, *max_retries, operation)
                    .await
            }
        }
    }

    async fn execute_exponential_backoff<F, Fut, T>(
        &self,
        base_delay: Duration,
        max_delay: Duration,
        max_retries: u32,
        mut operation: F,
    ) -> Result<T, RerankError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RerankError>>,
    {
        let mut delay = base_delay;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(v) => {
                    if retries > 0 && self.log_retries {
                        info!(retries, "Oracle call succeeded after retry");
                    }
                    return Ok(v);
                }
                Err(e) => {
                    if !e.is_retryable() {
                        if self.log_retries {
                            debug!(error = %e, "Error is non-retryable, stopping");
                        }
                        return Err(e);
                    }
                    if retries >= max_retries {
                        if self.log_retries {
                            warn!(retries, error = %e, "Giving up on oracle call");
                        }
                        return Err(e);
                    }

                    retries += 1;
                    if self.log_retries {
                        warn!(
                            "Retry {}/{} in {:?}: {}",
                            retries, max_retries, delay, e
                        );
                    }

                    sleep(delay).await;
                    delay = (delay * 2).min(max_delay);
                }
            }
        }
    }
}
