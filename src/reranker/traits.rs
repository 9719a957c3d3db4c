//! Reranker trait definition.
//!
//! ```ascii
//!                      ┌─────────────────┐
//!                      │  Reranker Trait │
//!                      └────────┬────────┘
//!                               │
//!              ┌────────────────┴────────────────┐
//!              ▼                                 ▼
//!      ┌──────────────┐                 ┌──────────────────┐
//!      │ LlmReranker  │                 │PriorOrderReranker│
//!      │ (oracle)     │                 │ (passthrough)    │
//!      └──────────────┘                 └──────────────────┘
//! ```

use async_trait::async_trait;

use crate::candidate::Candidate;

/// Trait for candidate rerankers.
///
/// `rerank` is total: it always returns a list, at most `top_k` long, with
/// each candidate id at most once. Failures of any external service are
/// absorbed by the implementation.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Get the name of this reranker.
    fn name(&self) -> &str;

    /// Reorder `candidates` (given in prior order) for `context`.
    async fn rerank(&self, candidates: &[Candidate], context: &str, top_k: usize)
        -> Vec<Candidate>;
}
