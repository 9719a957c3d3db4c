//! Reranker configuration.
//!
//! ```ascii
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        RerankConfig                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │ max_candidates       ───► size of the subset sent to oracle  │
//! │ description_chars    ───► description prefix per prompt line │
//! │ parse_fallback_len   ───► default prefix on unparseable text │
//! │ temperature          ───► oracle sampling temperature        │
//! │ max_output_tokens    ───► oracle output ceiling              │
//! │ oracle_timeout_secs  ───► hard bound on each oracle attempt  │
//! │ oracle_retries       ───► retries for transient failures     │
//! │ retry_base_delay_ms  ───► first backoff delay                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{RerankError, Result, RetryStrategy};
use crate::traits::CompletionOptions;

/// Default bound on candidates rendered into a prompt.
pub const DEFAULT_MAX_CANDIDATES: usize = 50;

/// Default description prefix length, in characters.
pub const DEFAULT_DESCRIPTION_CHARS: usize = 150;

/// Default length of the parser's fallback prefix.
pub const DEFAULT_PARSE_FALLBACK_LEN: usize = 10;

/// Configuration for [`super::LlmReranker`].
///
/// # Example
///
/// ```
/// use recsys_rerank::reranker::RerankConfig;
///
/// let config = RerankConfig::default().with_max_candidates(20).with_retries(1);
/// assert_eq!(config.max_candidates, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    /// Maximum candidates sent to the oracle; indices refer to this subset.
    pub max_candidates: usize,
    /// Maximum description characters per prompt line.
    pub description_chars: usize,
    /// Length of the prior-order prefix used when oracle text is unparseable.
    pub parse_fallback_len: usize,
    /// Sampling temperature for ranking prompts.
    pub temperature: f32,
    /// Output token ceiling for ranking prompts.
    pub max_output_tokens: usize,
    /// Timeout applied to each oracle attempt, in seconds.
    pub oracle_timeout_secs: u64,
    /// Retries for transient oracle failures (0 = single attempt).
    pub oracle_retries: u32,
    /// First backoff delay between retries, in milliseconds.
    pub retry_base_delay_ms: u64,
}

impl Default for RerankConfig {
    fn default() -> Self {
        let options = CompletionOptions::ranking();
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            description_chars: DEFAULT_DESCRIPTION_CHARS,
            parse_fallback_len: DEFAULT_PARSE_FALLBACK_LEN,
            temperature: options.temperature,
            max_output_tokens: options.max_tokens,
            oracle_timeout_secs: 30,
            oracle_retries: 0,
            retry_base_delay_ms: 250,
        }
    }
}

/// `timeout` in whole seconds, rounded up, never zero.
pub(crate) fn whole_secs_rounded_up(timeout: Duration) -> u64 {
    let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
    secs.max(1)
}

impl RerankConfig {
    /// Set the candidate bound.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Set the per-attempt oracle timeout.
    ///
    /// The timeout is stored in whole seconds: partial seconds round up and
    /// anything shorter than one second becomes one second.
    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout_secs = whole_secs_rounded_up(timeout);
        self
    }

    /// Set the number of retries for transient oracle failures.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.oracle_retries = retries;
        self
    }

    /// Set the parser fallback length.
    pub fn with_parse_fallback_len(mut self, len: usize) -> Self {
        self.parse_fallback_len = len;
        self
    }

    /// Per-attempt oracle timeout.
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Sampling options for ranking prompts.
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        }
    }

    /// Retry strategy for oracle calls.
    pub fn retry_strategy(&self) -> RetryStrategy {
        RetryStrategy::with_retries(
            self.oracle_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(RerankError::ConfigError(
                "max_candidates must be greater than zero".to_string(),
            ));
        }
        if self.oracle_timeout_secs == 0 {
            return Err(RerankError::ConfigError(
                "oracle_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_output_tokens == 0 {
            return Err(RerankError::ConfigError(
                "max_output_tokens must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RerankError::ConfigError(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        Ok(())
    }
}
