//! Collaborator traits for the recommendation path.
//!
//! # Why traits here
//!
//! The ranking oracle, the similarity index and the preference store are all
//! external services. Each one is injected as a trait object so that the
//! reranker holds no global client and tests can substitute fakes such as
//! [`crate::providers::MockOracle`].
//!
//! - [`RankingOracle`]: text generation used to order candidates
//! - [`SimilaritySearch`]: source of prior-ordered [`Candidate`]s
//! - [`PreferenceUpdater`]: background refresh of a user's preference vector

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::error::Result;

/// Sampling options sent with each oracle request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Temperature for sampling (0.0 = deterministic).
    pub temperature: f32,

    /// Ceiling on generated tokens.
    pub max_tokens: usize,
}

impl CompletionOptions {
    /// Options for ranking prompts.
    ///
    /// Low temperature, and just enough output budget for roughly fifty
    /// comma-separated numbers.
    pub fn ranking() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 150,
        }
    }

    /// Options for free-text explanations.
    pub fn explanation() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 100,
        }
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::ranking()
    }
}

/// External text-generation service used as a ranking oracle.
///
/// Implementations perform exactly one request per call, with no retries
/// and no local state mutation. Network errors, timeouts, non-success
/// statuses and empty bodies are all reported as `Err`.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Get the name of this oracle.
    fn name(&self) -> &str;

    /// Get the model used for generation.
    fn model(&self) -> &str;

    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;
}

/// Nearest-neighbour search over the item index.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Return up to `top_k` candidates ordered by descending score.
    ///
    /// `context` is the free-text intent when present; implementations fall
    /// back to the user's stored preferences otherwise.
    async fn search(
        &self,
        user_id: &str,
        context: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<Candidate>>;
}

/// Refreshes stored preferences for a user after new interactions.
#[async_trait]
pub trait PreferenceUpdater: Send + Sync {
    /// Recompute the user's preference state.
    async fn refresh(&self, user_id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_options() {
        let options = CompletionOptions::ranking();
        assert!((options.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(options.max_tokens, 150);
        assert_eq!(CompletionOptions::default(), options);
    }

    #[test]
    fn test_explanation_options() {
        let options = CompletionOptions::explanation();
        assert!((options.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(options.max_tokens, 100);
    }

    #[test]
    fn test_options_serialization() {
        let json = serde_json::to_value(CompletionOptions::ranking()).unwrap();
        assert_eq!(json["max_tokens"], 150);
    }
}
