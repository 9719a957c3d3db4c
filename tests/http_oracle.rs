//! HTTP oracle tests against a mock OpenAI-compatible server.
//!
//! All tests use wiremock, so the real reqwest client is exercised without
//! any network access.
//!
//! Run with: cargo test --test http_oracle

use recsys_rerank::{
    Candidate, CompletionOptions, LlmReranker, OpenAICompatibleOracle, OracleConfig,
    RankingOracle, RankingSource, RerankConfig, RerankError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn make_oracle(server: &MockServer) -> OpenAICompatibleOracle {
    OpenAICompatibleOracle::new(
        OracleConfig::default()
            .with_base_url(format!("{}/v1", server.uri()))
            .with_api_key("test-key")
            .with_model("rank-model")
            .with_timeout(Duration::from_secs(2)),
    )
    .unwrap()
}

/// Mount a chat-completions responder that only matches well-formed requests.
async fn mount_chat(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "rank-model",
            "max_tokens": 150
        })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("a", 0.9).with_title("A"),
        Candidate::new("b", 0.8).with_title("B"),
        Candidate::new("c", 0.7).with_title("C"),
    ]
}

#[tokio::test]
async fn test_successful_completion() {
    let server = MockServer::start().await;
    mount_chat(
        &server,
        ResponseTemplate::new(200).set_body_json(chat_response(" 2,1 ")),
    )
    .await;

    let text = make_oracle(&server)
        .generate("rank please", &CompletionOptions::ranking())
        .await
        .unwrap();
    assert_eq!(text, "2,1");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"], json!([{"role": "user", "content": "rank please"}]));
    assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_error_status_maps_to_api_error() {
    let server = MockServer::start().await;
    mount_chat(
        &server,
        ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests"}
        })),
    )
    .await;

    let err = make_oracle(&server)
        .generate("p", &CompletionOptions::ranking())
        .await
        .unwrap_err();

    match err {
        RerankError::ApiError { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit reached");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_body_is_kept() {
    let server = MockServer::start().await;
    mount_chat(&server, ResponseTemplate::new(500).set_body_string("upstream exploded")).await;

    let err = make_oracle(&server)
        .generate("p", &CompletionOptions::ranking())
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    match err {
        RerankError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_content_maps_to_empty_response() {
    let server = MockServer::start().await;
    mount_chat(
        &server,
        ResponseTemplate::new(200).set_body_json(chat_response("")),
    )
    .await;

    let err = make_oracle(&server)
        .generate("p", &CompletionOptions::ranking())
        .await
        .unwrap_err();
    assert!(matches!(err, RerankError::EmptyResponse));
}

#[tokio::test]
async fn test_connection_refused_maps_to_network_error() {
    let server = MockServer::start().await;
    let base_url = format!("{}/v1", server.uri());
    drop(server);

    let oracle = OpenAICompatibleOracle::new(OracleConfig::default().with_base_url(base_url))
        .unwrap();
    let err = oracle
        .generate("p", &CompletionOptions::ranking())
        .await
        .unwrap_err();
    assert!(matches!(err, RerankError::NetworkError(_)), "{err:?}");
    assert!(err.is_oracle_failure());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("1"))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let oracle = OpenAICompatibleOracle::new(
        OracleConfig::default()
            .with_base_url(format!("{}/v1", server.uri()))
            .with_timeout(Duration::from_secs(1)),
    )
    .unwrap();

    let err = oracle
        .generate("p", &CompletionOptions::ranking())
        .await
        .unwrap_err();
    assert!(matches!(err, RerankError::Timeout), "{err:?}");
}

#[tokio::test]
async fn test_reranker_over_http() {
    let server = MockServer::start().await;
    mount_chat(
        &server,
        ResponseTemplate::new(200).set_body_json(chat_response("3, 1")),
    )
    .await;

    let reranker =
        LlmReranker::new(Arc::new(make_oracle(&server)), RerankConfig::default()).unwrap();
    let outcome = reranker.rerank_detailed(&candidates(), "ctx", 3).await;

    assert_eq!(outcome.source, RankingSource::Oracle);
    assert_eq!(outcome.ids(), vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_reranker_over_failing_http() {
    let server = MockServer::start().await;
    mount_chat(&server, ResponseTemplate::new(500).set_body_string("oops")).await;

    let reranker =
        LlmReranker::new(Arc::new(make_oracle(&server)), RerankConfig::default()).unwrap();
    let outcome = reranker.rerank_detailed(&candidates(), "ctx", 2).await;

    assert_eq!(outcome.source, RankingSource::OracleUnavailable);
    assert_eq!(outcome.ids(), vec!["a", "b"]);
}
