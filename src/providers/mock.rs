//! Mock ranking oracle for testing.
//!
//! Replies are served from a queue, so a test can script exactly what the
//! "model" says, or how it fails, on each call:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ MockOracle                                   │
//! │  queue:   [Text("3,1,2"), Fail(Timeout), ..] │
//! │  default: Text used once the queue is empty  │
//! │  latency: optional sleep before replying     │
//! │  prompts: every prompt received, in order    │
//! └──────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::{RerankError, Result};
use crate::traits::{CompletionOptions, RankingOracle};

/// Failure modes the mock can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Connection refused / reset.
    Network,
    /// Request timed out.
    Timeout,
    /// Non-success HTTP status.
    Status(u16),
    /// Success status with no text.
    Empty,
}

impl MockFailure {
    fn into_error(self) -> RerankError {
        match self {
            MockFailure::Network => {
                RerankError::NetworkError("mock connection refused".to_string())
            }
            MockFailure::Timeout => RerankError::Timeout,
            MockFailure::Status(status) => RerankError::ApiError {
                status,
                message: "mock api error".to_string(),
            },
            MockFailure::Empty => RerankError::EmptyResponse,
        }
    }
}

/// One scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail with this failure.
    Fail(MockFailure),
}

/// Mock oracle for testing.
///
/// Cloning shares the queue and the recorded prompts.
#[derive(Debug, Clone)]
pub struct MockOracle {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    default_reply: MockReply,
    latency: Option<Duration>,
    prompts: Arc<Mutex<Vec<(String, CompletionOptions)>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockOracle {
    /// Create a mock with an empty queue.
    ///
    /// Once the queue is exhausted it fails with an empty response.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            default_reply: MockReply::Fail(MockFailure::Empty),
            latency: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always answers `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Text(text.into()),
            ..Self::new()
        }
    }

    /// Create a mock that always fails with `failure`.
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            default_reply: MockReply::Fail(failure),
            ..Self::new()
        }
    }

    /// Sleep for `latency` before every reply.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a text reply.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(MockReply::Text(text.into()));
    }

    /// Queue a failure.
    pub async fn add_failure(&self, failure: MockFailure) {
        self.replies.lock().await.push_back(MockReply::Fail(failure));
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .await
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    /// Options received with the most recent call.
    pub async fn last_options(&self) -> Option<CompletionOptions> {
        self.prompts.lock().await.last().map(|(_, options)| *options)
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RankingOracle for MockOracle {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .await
            .push((prompt.to_string(), *options));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(failure) => Err(failure.into_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_then_default() {
        let oracle = MockOracle::always("1,2");
        oracle.add_response("3,1,2").await;
        oracle.add_failure(MockFailure::Timeout).await;

        let options = CompletionOptions::ranking();
        assert_eq!(oracle.generate("p1", &options).await.unwrap(), "3,1,2");
        assert!(matches!(
            oracle.generate("p2", &options).await,
            Err(RerankError::Timeout)
        ));
        assert_eq!(oracle.generate("p3", &options).await.unwrap(), "1,2");

        assert_eq!(oracle.call_count(), 3);
        assert_eq!(oracle.prompts().await, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_new_fails_when_exhausted() {
        let oracle = MockOracle::new();
        let result = oracle.generate("p", &CompletionOptions::ranking()).await;
        assert!(matches!(result, Err(RerankError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_failure_mapping() {
        let oracle = MockOracle::failing(MockFailure::Status(503));
        let err = oracle
            .generate("p", &CompletionOptions::ranking())
            .await
            .unwrap_err();
        assert!(matches!(err, RerankError::ApiError { status: 503, .. }));
        assert!(err.is_oracle_failure());
    }

    #[tokio::test]
    async fn test_records_options() {
        let oracle = MockOracle::always("ok");
        oracle
            .generate("p", &CompletionOptions::explanation())
            .await
            .unwrap();
        assert_eq!(
            oracle.last_options().await,
            Some(CompletionOptions::explanation())
        );
    }
}
