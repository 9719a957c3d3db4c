//! Natural-language explanations for recommended items.
//!
//! Uses the same oracle as ranking with a warmer temperature. Like ranking,
//! it never fails: any oracle problem yields [`FALLBACK_EXPLANATION`].

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::candidate::Candidate;
use crate::traits::{CompletionOptions, RankingOracle};

/// Returned whenever the oracle cannot produce an explanation.
pub const FALLBACK_EXPLANATION: &str =
    "This item matches your preferences based on semantic similarity.";

/// Title rendered for items without one.
const UNTITLED: &str = "This item";

/// Description characters included in the prompt.
const DESCRIPTION_CHARS: usize = 200;

/// Generates short "why this item" explanations.
pub struct Explainer {
    oracle: Arc<dyn RankingOracle>,
    timeout: Duration,
}

impl Explainer {
    /// Create an explainer whose oracle calls are bounded by `timeout`.
    pub fn new(oracle: Arc<dyn RankingOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Build the explanation prompt for `candidate`.
    pub fn build_prompt(candidate: &Candidate, context: &str) -> String {
        format!(
            "Explain in 1-2 sentences why \"{}\" is a good match for someone looking for: \"{}\"\n\
             \n\
             Item description: {}\n\
             \n\
             Explanation:",
            candidate.title_or(UNTITLED),
            context,
            candidate.description_prefix(DESCRIPTION_CHARS)
        )
    }

    /// Explain why `candidate` fits `context`.
    pub async fn explain(&self, candidate: &Candidate, context: &str) -> String {
        let prompt = Self::build_prompt(candidate, context);
        let options = CompletionOptions::explanation();

        let call = self.oracle.generate(&prompt, &options);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => {
                warn!(item = %candidate.id, "Empty explanation from oracle");
                FALLBACK_EXPLANATION.to_string()
            }
            Ok(Err(e)) => {
                warn!(item = %candidate.id, error = %e, "Explanation failed");
                FALLBACK_EXPLANATION.to_string()
            }
            Err(_) => {
                warn!(item = %candidate.id, "Explanation timed out");
                FALLBACK_EXPLANATION.to_string()
            }
        }
    }
}
