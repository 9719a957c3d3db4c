//! Oracle-backed reranker.
//!
//! # State machine
//!
//! ```ascii
//!  START ──(no candidates / top_k = 0)──────────────────────────► RETURN []
//!    │
//!    ├──(blank context)──────────────────────────────────────────► RETURN prior[..k]
//!    ▼
//!  BUILD_PROMPT ──► CALL_ORACLE ──(failure)──► FALLBACK ─────────► RETURN prior[..k]
//!                        │
//!                     (success)
//!                        ▼
//!                      PARSE ──► REORDER ──► FILL_IF_SHORT ──────► RETURN
//! ```
//!
//! All index arithmetic is relative to the bounded subset (the first
//! `max_candidates` candidates). The result is `min(top_k, subset size)`
//! long when ids are unique, and never repeats an id.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::RerankConfig;
use super::parser::{ParsedRanking, RankingParser};
use super::prior::prior_order;
use super::prompt::PromptBuilder;
use super::result::{RankingSource, RerankOutcome};
use super::traits::Reranker;
use crate::candidate::Candidate;
use crate::error::{RerankError, Result};
use crate::retry::RetryExecutor;
use crate::traits::RankingOracle;

/// Reranker that asks a [`RankingOracle`] to order candidates.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use recsys_rerank::{LlmReranker, OpenAICompatibleOracle, RerankConfig};
///
/// let oracle = Arc::new(OpenAICompatibleOracle::from_env()?);
/// let reranker = LlmReranker::new(oracle, RerankConfig::default())?;
/// let top = reranker.rerank(&candidates, "space opera with strong characters", 10).await;
/// ```
pub struct LlmReranker {
    oracle: Arc<dyn RankingOracle>,
    config: RerankConfig,
    prompt_builder: PromptBuilder,
    parser: RankingParser,
    retry: RetryExecutor,
}

impl std::fmt::Debug for LlmReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmReranker")
            .field("oracle", &self.oracle.name())
            .field("model", &self.oracle.model())
            .field("config", &self.config)
            .finish()
    }
}

impl LlmReranker {
    /// Create a reranker over `oracle`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` fails [`RerankConfig::validate`],
    /// e.g. a zero oracle timeout or an empty candidate bound.
    pub fn new(oracle: Arc<dyn RankingOracle>, config: RerankConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(oracle, config))
    }

    /// Create a reranker with default configuration.
    pub fn with_defaults(oracle: Arc<dyn RankingOracle>) -> Self {
        Self::build(oracle, RerankConfig::default())
    }

    fn build(oracle: Arc<dyn RankingOracle>, config: RerankConfig) -> Self {
        Self {
            prompt_builder: PromptBuilder::from_config(&config),
            parser: RankingParser::new(config.parse_fallback_len),
            retry: RetryExecutor::new(),
            oracle,
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    /// Rerank and report which path produced the result.
    pub async fn rerank_detailed(
        &self,
        candidates: &[Candidate],
        context: &str,
        top_k: usize,
    ) -> RerankOutcome {
        if candidates.is_empty() || top_k == 0 {
            return RerankOutcome::new(Vec::new(), RankingSource::Empty);
        }

        let subset = self.prompt_builder.subset(candidates);

        if context.trim().is_empty() {
            debug!("Blank context, keeping prior order");
            return RerankOutcome::new(prior_order(subset, top_k), RankingSource::NoContext);
        }

        let prompt = self.prompt_builder.build(context, subset, top_k);

        let outcome = match self.call_oracle(&prompt).await {
            Ok(raw) => {
                let parsed = self.parser.parse(&raw, subset.len());
                let source = match parsed {
                    ParsedRanking::Ranked(_) => RankingSource::Oracle,
                    ParsedRanking::Fallback(_) => {
                        warn!(
                            raw_len = raw.len(),
                            "Oracle output had no usable indices, using default order"
                        );
                        RankingSource::ParseFallback
                    }
                };
                RerankOutcome::new(reorder(subset, parsed.indices(), top_k), source)
            }
            Err(e) => {
                warn!(
                    oracle = self.oracle.name(),
                    error = %e,
                    "Ranking oracle unavailable, keeping prior order"
                );
                RerankOutcome::new(prior_order(subset, top_k), RankingSource::OracleUnavailable)
            }
        };

        info!(
            candidates = candidates.len(),
            subset = subset.len(),
            returned = outcome.candidates.len(),
            source = ?outcome.source,
            "Reranked candidates"
        );
        outcome
    }

    /// One bounded oracle call, retried per configuration.
    async fn call_oracle(&self, prompt: &str) -> Result<String> {
        let oracle = self.oracle.as_ref();
        let options = self.config.completion_options();
        let timeout = self.config.oracle_timeout();

        self.retry
            .execute(&self.config.retry_strategy(), move || async move {
                match tokio::time::timeout(timeout, oracle.generate(prompt, &options)).await {
                    Ok(result) => result,
                    Err(_) => Err(RerankError::Timeout),
                }
            })
            .await
    }
}

#[async_trait]
impl Reranker for LlmReranker {
    fn name(&self) -> &str {
        "llm"
    }

    async fn rerank(
        &self,
        candidates: &[Candidate],
        context: &str,
        top_k: usize,
    ) -> Vec<Candidate> {
        self.rerank_detailed(candidates, context, top_k)
            .await
            .candidates
    }
}

/// Order `subset` by `indices`, then fill from prior order.
///
/// Walks `indices` appending `subset[i]` unless that id was already taken,
/// stopping at `top_k`. If still short, walks `subset` itself and appends
/// every id not yet taken. Ids are compared by value, never by structure.
pub fn reorder(subset: &[Candidate], indices: &[usize], top_k: usize) -> Vec<Candidate> {
    let limit = top_k.min(subset.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(limit);
    let mut ranked = Vec::with_capacity(limit);

    let by_oracle = indices.iter().filter_map(|&idx| subset.get(idx));
    for candidate in by_oracle.chain(subset.iter()) {
        if ranked.len() >= limit {
            break;
        }
        if seen.insert(candidate.id.as_str()) {
            ranked.push(candidate.clone());
        }
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subset(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(format!("c{i}"), 1.0 - i as f64 / 10.0))
            .collect()
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_reorder_follows_indices() {
        let s = subset(3);
        assert_eq!(ids(&reorder(&s, &[2, 0, 1], 3)), vec!["c2", "c0", "c1"]);
    }

    #[test]
    fn test_reorder_fills_in_prior_order() {
        let s = subset(5);
        assert_eq!(
            ids(&reorder(&s, &[3], 4)),
            vec!["c3", "c0", "c1", "c2"]
        );
    }

    #[test]
    fn test_reorder_skips_duplicate_indices() {
        let s = subset(3);
        assert_eq!(ids(&reorder(&s, &[1, 1, 1, 0], 3)), vec!["c1", "c0", "c2"]);
    }

    #[test]
    fn test_reorder_skips_duplicate_ids() {
        let s = vec![
            Candidate::new("a", 0.9),
            Candidate::new("a", 0.8),
            Candidate::new("b", 0.7),
        ];
        assert_eq!(ids(&reorder(&s, &[1, 0, 2], 3)), vec!["a", "b"]);
    }

    #[test]
    fn test_reorder_stops_at_top_k() {
        let s = subset(10);
        assert_eq!(ids(&reorder(&s, &[9, 8, 7, 6], 2)), vec!["c9", "c8"]);
    }

    #[test]
    fn test_reorder_ignores_out_of_range_indices() {
        let s = subset(2);
        assert_eq!(ids(&reorder(&s, &[7, 1], 5)), vec!["c1", "c0"]);
    }

    #[test]
    fn test_reorder_empty_inputs() {
        assert!(reorder(&[], &[0, 1], 3).is_empty());
        assert!(reorder(&subset(3), &[0], 0).is_empty());
    }
}
