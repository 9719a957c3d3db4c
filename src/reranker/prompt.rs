//! Ranking prompt construction.
//!
//! The prompt shape is fixed: only the context, the rendered candidate lines
//! and `top_k` vary between calls. Identical inputs always produce a
//! byte-identical prompt.

use super::config::{RerankConfig, DEFAULT_DESCRIPTION_CHARS, DEFAULT_MAX_CANDIDATES};
use crate::candidate::Candidate;

/// Title rendered for candidates without one.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Renders ranking prompts over a bounded candidate subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBuilder {
    max_candidates: usize,
    description_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES, DEFAULT_DESCRIPTION_CHARS)
    }
}

impl PromptBuilder {
    /// Create a builder with explicit bounds.
    pub fn new(max_candidates: usize, description_chars: usize) -> Self {
        Self {
            max_candidates,
            description_chars,
        }
    }

    /// Create a builder from reranker configuration.
    pub fn from_config(config: &RerankConfig) -> Self {
        Self::new(config.max_candidates, config.description_chars)
    }

    /// The prefix of `candidates` that prompts render and indices refer to.
    pub fn subset<'a>(&self, candidates: &'a [Candidate]) -> &'a [Candidate] {
        &candidates[..candidates.len().min(self.max_candidates)]
    }

    /// Build the ranking prompt.
    ///
    /// Candidates beyond the bound are dropped before rendering. An empty
    /// candidate slice still yields a well-formed prompt.
    pub fn build(&self, context: &str, candidates: &[Candidate], top_k: usize) -> String {
        let items_text = self.render_items(self.subset(candidates));

        format!(
            "You are a recommendation expert. A user is looking for: \"{context}\"\n\
             \n\
             Here are the candidate items:\n\
             {items_text}\n\
             \n\
             Rank these items by relevance to the user's request. \
             Return ONLY the top {top_k} item numbers as a comma-separated list \
             (e.g., \"5,1,3,7,2\").\n\
             \n\
             Your ranking:"
        )
    }

    /// One `"<n>. <title>: <description>"` line per candidate, numbered from 1.
    fn render_items(&self, subset: &[Candidate]) -> String {
        subset
            .iter()
            .enumerate()
            .map(|(idx, candidate)| {
                format!(
                    "{}. {}: {}",
                    idx + 1,
                    candidate.title_or(UNKNOWN_TITLE),
                    candidate.description_prefix(self.description_chars)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build a ranking prompt with the default bounds (50 candidates, 150 chars).
pub fn build_prompt(context: &str, candidates: &[Candidate], top_k: usize) -> String {
    PromptBuilder::default().build(context, candidates, top_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: usize) -> Candidate {
        Candidate::new(format!("id-{n}"), 1.0 - n as f64 / 100.0)
            .with_title(format!("Item {n}"))
            .with_description(format!("Description {n}"))
    }

    #[test]
    fn test_renders_numbered_lines() {
        let candidates = vec![item(0), item(1)];
        let prompt = build_prompt("sci-fi novels", &candidates, 2);

        assert!(prompt.contains("A user is looking for: \"sci-fi novels\""));
        assert!(prompt.contains("1. Item 0: Description 0\n2. Item 1: Description 1"));
        assert!(prompt.contains("Return ONLY the top 2 item numbers"));
        assert!(prompt.ends_with("Your ranking:"));
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let candidates = vec![Candidate::new("x", 0.5).with_description("no title here")];
        let prompt = build_prompt("anything", &candidates, 1);
        assert!(prompt.contains("1. Unknown: no title here"));
    }

    #[test]
    fn test_description_capped() {
        let long = "a".repeat(400);
        let candidates = vec![Candidate::new("x", 0.5)
            .with_title("Long")
            .with_description(long)];
        let prompt = build_prompt("ctx", &candidates, 1);

        let line = prompt
            .lines()
            .find(|l| l.starts_with("1. Long: "))
            .unwrap();
        assert_eq!(line.len(), "1. Long: ".len() + 150);
    }

    #[test]
    fn test_truncates_to_fifty() {
        let candidates: Vec<Candidate> = (0..60).map(item).collect();
        let prompt = build_prompt("ctx", &candidates, 10);

        assert!(prompt.contains("\n50. Item 49: Description 49\n"));
        assert!(!prompt.contains("51. "));
        assert!(!prompt.contains("Item 50"));
    }

    #[test]
    fn test_empty_candidates() {
        let prompt = build_prompt("ctx", &[], 5);
        assert!(prompt.contains("Here are the candidate items:\n\n"));
        assert!(prompt.contains("top 5"));
    }

    #[test]
    fn test_context_embedded_verbatim() {
        let context = "cozy \"mystery\" books, set in\nScotland";
        let prompt = build_prompt(context, &[item(0)], 1);
        assert!(prompt.contains(context));
    }

    #[test]
    fn test_deterministic() {
        let candidates: Vec<Candidate> = (0..5).map(item).collect();
        assert_eq!(
            build_prompt("ctx", &candidates, 3),
            build_prompt("ctx", &candidates, 3)
        );
    }

    #[test]
    fn test_custom_bounds() {
        let builder = PromptBuilder::new(2, 4);
        let candidates: Vec<Candidate> = (0..5).map(item).collect();
        assert_eq!(builder.subset(&candidates).len(), 2);

        let prompt = builder.build("ctx", &candidates, 2);
        assert!(prompt.contains("1. Item 0: Desc\n2. Item 1: Desc\n"));
        assert!(!prompt.contains("3. "));
    }
}
