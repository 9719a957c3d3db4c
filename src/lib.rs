//! recsys-rerank - LLM-assisted re-ranking for recommendation APIs
//!
//! Takes candidates from a similarity search, asks a language model to order
//! them for a free-text user context, and always returns a usable top-K list:
//!
//! - malformed model output degrades to a deterministic default order
//! - an unavailable model (network, timeout, error status, empty body)
//!   degrades to the search's own order
//! - every oracle call is bounded by a finite timeout
//!
//! # Architecture
//!
//! Collaborators are traits, injected at construction:
//! - [`RankingOracle`]: text generation ([`OpenAICompatibleOracle`], [`MockOracle`])
//! - [`SimilaritySearch`]: the vector index that produces [`Candidate`]s
//! - [`PreferenceUpdater`]: background preference refresh
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use recsys_rerank::{LlmReranker, OpenAICompatibleOracle, Reranker, Settings};
//!
//! let settings = Settings::load()?;
//! let oracle = Arc::new(OpenAICompatibleOracle::new(settings.oracle)?);
//! let reranker = LlmReranker::new(oracle, settings.rerank)?;
//!
//! let top = reranker.rerank(&candidates, "light-hearted fantasy", 10).await;
//! ```
//!
//! # See Also
//!
//! - [`crate::reranker`] for the prompt, parser and orchestration
//! - [`crate::recommend`] for the request handler built on top

pub mod candidate;
pub mod config;
pub mod error;
pub mod providers;
pub mod recommend;
pub mod reranker;
pub mod retry;
pub mod traits;

pub use candidate::Candidate;
pub use config::{OracleConfig, Settings};
pub use error::{RerankError, Result, RetryStrategy};
pub use providers::{MockFailure, MockOracle, MockReply, OpenAICompatibleOracle};
pub use recommend::{spawn_preference_refresh, Recommendation, RecommendationRequest, Recommender};
pub use reranker::{
    build_prompt, parse_rankings, reorder, Explainer, LlmReranker, ParsedRanking,
    PriorOrderReranker, PromptBuilder, RankingParser, RankingSource, RerankConfig, RerankOutcome,
    Reranker,
};
pub use retry::RetryExecutor;
pub use traits::{CompletionOptions, PreferenceUpdater, RankingOracle, SimilaritySearch};
