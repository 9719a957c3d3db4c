//! E2E tests against a live OpenAI-compatible endpoint.
//!
//! These tests require:
//! - OPENAI_API_KEY environment variable set
//! - optionally OPENAI_MODEL / OPENAI_BASE_URL to target another server
//!
//! Run with: cargo test --test e2e_openai -- --ignored

use recsys_rerank::{
    Candidate, CompletionOptions, LlmReranker, OpenAICompatibleOracle, RankingOracle,
    RankingSource, RerankConfig,
};
use std::collections::HashSet;
use std::sync::Arc;

fn catalogue() -> Vec<Candidate> {
    vec![
        Candidate::new("b1", 0.81)
            .with_title("The Hobbit")
            .with_description("A reluctant hobbit joins a company of dwarves on a quest."),
        Candidate::new("b2", 0.79)
            .with_title("Gone Girl")
            .with_description("A wife disappears and her husband becomes the suspect."),
        Candidate::new("b3", 0.77)
            .with_title("Good Omens")
            .with_description("An angel and a demon team up to stop the apocalypse, comedically."),
        Candidate::new("b4", 0.74)
            .with_title("The Road")
            .with_description("A father and son walk through a bleak post-apocalyptic America."),
    ]
}

#[tokio::test]
#[ignore]
async fn test_live_generate() {
    let oracle = OpenAICompatibleOracle::from_env().expect("OPENAI_API_KEY required");

    let text = oracle
        .generate("Reply with the single word: ok", &CompletionOptions::ranking())
        .await
        .expect("live completion");
    assert!(!text.is_empty());
    println!("model={} reply={:?}", oracle.model(), text);
}

#[tokio::test]
#[ignore]
async fn test_live_rerank() {
    let oracle = OpenAICompatibleOracle::from_env().expect("OPENAI_API_KEY required");
    let reranker = LlmReranker::new(Arc::new(oracle), RerankConfig::default()).unwrap();
    let input = catalogue();

    let outcome = reranker
        .rerank_detailed(&input, "light-hearted fantasy with humour", 3)
        .await;

    println!("source={:?} ids={:?}", outcome.source, outcome.ids());
    assert_eq!(outcome.candidates.len(), 3);
    let unique: HashSet<&str> = outcome.ids().into_iter().collect();
    assert_eq!(unique.len(), 3);
    assert_ne!(outcome.source, RankingSource::OracleUnavailable);
}
