//! Prior-order reranker.
//!
//! Keeps the similarity-search order and truncates. Used when reranking is
//! disabled, and as the reference behaviour every fallback path matches.

use async_trait::async_trait;

use super::traits::Reranker;
use crate::candidate::Candidate;

/// Reranker that returns the first `top_k` candidates unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorOrderReranker;

impl PriorOrderReranker {
    /// Create a new prior-order reranker.
    pub fn new() -> Self {
        Self
    }
}

/// First `top_k` candidates in prior order.
pub fn prior_order(candidates: &[Candidate], top_k: usize) -> Vec<Candidate> {
    candidates.iter().take(top_k).cloned().collect()
}

#[async_trait]
impl Reranker for PriorOrderReranker {
    fn name(&self) -> &str {
        "prior-order"
    }

    async fn rerank(
        &self,
        candidates: &[Candidate],
        _context: &str,
        top_k: usize,
    ) -> Vec<Candidate> {
        prior_order(candidates, top_k)
    }
}
