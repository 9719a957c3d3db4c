//! Recommendation request handling.
//!
//! The [`Recommender`] is the caller of the reranking core: it validates the
//! request, pulls candidates from similarity search, reranks them when the
//! user supplied a context, and optionally attaches explanations. Oracle
//! problems never surface here; only invalid input and search failures do.
//!
//! ```ascii
//! RecommendationRequest
//!        │ validate (user_id, 1 ≤ limit ≤ 50)
//!        ▼
//! SimilaritySearch::search ──► candidates (prior order)
//!        │
//!        ├── use_rerank && context ──► Reranker::rerank(.., limit)
//!        └── otherwise ──────────────► prior order [..limit]
//!        │
//!        ▼
//! explain? ──► Explainer (concurrent, per item)
//!        │
//!        ▼
//! Vec<Recommendation>
//! ```

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::candidate::Candidate;
use crate::error::{RerankError, Result};
use crate::reranker::{prior_order, Explainer, Reranker};
use crate::traits::{PreferenceUpdater, SimilaritySearch};

/// Largest `limit` a request may ask for.
pub const MAX_LIMIT: usize = 50;

/// Default number of candidates pulled from search before reranking.
pub const DEFAULT_CANDIDATE_POOL: usize = 50;

/// Description characters returned per recommendation.
const DESCRIPTION_CHARS: usize = 200;

fn default_limit() -> usize {
    10
}

/// A request for recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// User asking for recommendations.
    pub user_id: String,
    /// Free-text intent, if any.
    #[serde(default)]
    pub context: Option<String>,
    /// Number of items to return (1..=50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Rerank candidates with the oracle when a context is present.
    #[serde(default)]
    pub use_rerank: bool,
    /// Attach a natural-language explanation to each item.
    #[serde(default)]
    pub explain: bool,
}

impl RecommendationRequest {
    /// Create a request with default options.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            context: None,
            limit: default_limit(),
            use_rerank: false,
            explain: false,
        }
    }

    /// Set the context and enable reranking.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self.use_rerank = true;
        self
    }

    /// Set the limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Request explanations.
    pub fn with_explanations(mut self) -> Self {
        self.explain = true;
        self
    }

    /// Non-blank context, if any.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Check the request can be served.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(RerankError::InvalidInput("user_id must not be empty".to_string()));
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(RerankError::InvalidInput(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            )));
        }
        Ok(())
    }
}

/// One recommended item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Item identifier.
    pub item_id: String,
    /// Display title.
    pub title: String,
    /// Description, at most 200 characters.
    pub description: String,
    /// Similarity score from search.
    pub score: f64,
    /// Why this item was recommended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Recommendation {
    fn from_candidate(candidate: &Candidate, explanation: Option<String>) -> Self {
        Self {
            item_id: candidate.id.clone(),
            title: candidate.title.clone().unwrap_or_default(),
            description: candidate.description_prefix(DESCRIPTION_CHARS).to_string(),
            score: candidate.score,
            explanation,
        }
    }
}

/// Serves recommendation requests.
pub struct Recommender {
    search: Arc<dyn SimilaritySearch>,
    reranker: Arc<dyn Reranker>,
    explainer: Option<Arc<Explainer>>,
    candidate_pool: usize,
}

impl Recommender {
    /// Create a recommender without explanations.
    pub fn new(search: Arc<dyn SimilaritySearch>, reranker: Arc<dyn Reranker>) -> Self {
        Self {
            search,
            reranker,
            explainer: None,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
        }
    }

    /// Enable explanations.
    pub fn with_explainer(mut self, explainer: Arc<Explainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    /// Set how many candidates are pulled from search.
    pub fn with_candidate_pool(mut self, pool: usize) -> Self {
        self.candidate_pool = pool;
        self
    }

    /// Serve a request.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a bad request; whatever the search backend returns
    /// if it fails. Oracle failures are never returned.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<Recommendation>> {
        request.validate()?;

        let pool = self.candidate_pool.max(request.limit);
        let candidates = self
            .search
            .search(&request.user_id, request.context(), pool)
            .await?;
        debug!(
            user_id = %request.user_id,
            found = candidates.len(),
            "Similarity search complete"
        );

        let ranked = match request.context() {
            Some(context) if request.use_rerank => {
                self.reranker
                    .rerank(&candidates, context, request.limit)
                    .await
            }
            _ => prior_order(&candidates, request.limit),
        };

        let explanations = match (&self.explainer, request.explain, request.context()) {
            (Some(explainer), true, Some(context)) => {
                let futures = ranked.iter().map(|c| explainer.explain(c, context));
                join_all(futures).await.into_iter().map(Some).collect()
            }
            _ => vec![None; ranked.len()],
        };

        let recommendations: Vec<Recommendation> = ranked
            .iter()
            .zip(explanations)
            .map(|(candidate, explanation)| Recommendation::from_candidate(candidate, explanation))
            .collect();

        info!(
            user_id = %request.user_id,
            returned = recommendations.len(),
            reranker = self.reranker.name(),
            "Served recommendations"
        );
        Ok(recommendations)
    }
}

/// Refresh a user's preferences in the background.
///
/// The request path does not await the returned handle; failures are logged.
pub fn spawn_preference_refresh(
    updater: Arc<dyn PreferenceUpdater>,
    user_id: impl Into<String>,
) -> JoinHandle<()> {
    let user_id = user_id.into();
    tokio::spawn(async move {
        match updater.refresh(&user_id).await {
            Ok(()) => debug!(user_id = %user_id, "Preferences refreshed"),
            Err(e) => warn!(user_id = %user_id, error = %e, "Preference refresh failed"),
        }
    })
}
