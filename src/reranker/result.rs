//! Reranking result types.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Which path produced a rerank result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingSource {
    /// No candidates or `top_k == 0`; the oracle was not called.
    Empty,
    /// Blank context; prior order was returned without calling the oracle.
    NoContext,
    /// The oracle's ranking was applied (then filled in prior order).
    Oracle,
    /// The oracle answered but nothing parsed; the default prefix was used.
    ParseFallback,
    /// The oracle call failed; prior order was returned.
    OracleUnavailable,
}

impl RankingSource {
    /// Whether the oracle's answer influenced the order.
    pub fn is_reranked(&self) -> bool {
        matches!(self, RankingSource::Oracle)
    }
}

/// Candidates returned by a rerank call, tagged with how they were ordered.
///
/// # Example
///
/// ```ignore
/// let outcome = reranker.rerank_detailed(&candidates, "cozy mysteries", 5).await;
/// if outcome.source == RankingSource::OracleUnavailable {
///     metrics.oracle_down.inc();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankOutcome {
    /// Ordered candidates, each id at most once, at most `top_k` long.
    pub candidates: Vec<Candidate>,
    /// Path that produced `candidates`.
    pub source: RankingSource,
}

impl RerankOutcome {
    pub(crate) fn new(candidates: Vec<Candidate>, source: RankingSource) -> Self {
        Self { candidates, source }
    }

    /// Ids in result order.
    pub fn ids(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.id.as_str()).collect()
    }
}
