//! Ranking oracle backed by an OpenAI-compatible chat completions API.
//!
//! Works with any service that implements `POST {base_url}/chat/completions`:
//! OpenAI itself, Azure-style proxies, Ollama, LM Studio, vLLM and friends.
//!
//! Each [`RankingOracle::generate`] call sends one request with a single user
//! message and returns the trimmed content of the first choice. It never
//! retries. Every failure (connect error, timeout, non-2xx status, missing or
//! blank content) comes back as an `Err` so the reranker can fall back.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::error::{RerankError, Result};
use crate::traits::{CompletionOptions, RankingOracle};

// ============================================================================
// Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [MessageRequest<'a>; 1],
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ============================================================================
// Oracle Implementation
// ============================================================================

/// Ranking oracle for OpenAI-compatible APIs.
///
/// # Example
///
/// ```ignore
/// use recsys_rerank::{OpenAICompatibleOracle, OracleConfig};
///
/// let oracle = OpenAICompatibleOracle::new(OracleConfig::from_env()?)?;
/// ```
#[derive(Debug)]
pub struct OpenAICompatibleOracle {
    client: Client,
    config: OracleConfig,
}

impl OpenAICompatibleOracle {
    /// Create an oracle from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: OracleConfig) -> Result<Self> {
        config.validate()?;
        let client = Self::build_client(&config)?;

        debug!(
            model = config.model,
            base_url = config.base_url,
            timeout_secs = config.timeout_secs,
            "Created OpenAI-compatible oracle"
        );

        Ok(Self { client, config })
    }

    /// Create an oracle from `OPENAI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OracleConfig::from_env()?)
    }

    fn build_client(config: &OracleConfig) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| RerankError::ConfigError(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| RerankError::ConfigError(format!("Failed to build HTTP client: {}", e)))
    }

    /// Build the chat completions endpoint URL.
    fn chat_completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Pull the first choice's text out of a response body.
    fn extract_content(body: &str) -> Result<String> {
        let response: ChatResponse = serde_json::from_str(body)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(RerankError::EmptyResponse);
        }
        Ok(content)
    }
}

#[async_trait]
impl RankingOracle for OpenAICompatibleOracle {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        let url = self.chat_completions_url();
        let request = ChatRequest {
            model: &self.config.model,
            messages: [MessageRequest {
                role: "user",
                content: prompt,
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!(url = %url, model = %self.config.model, "Oracle request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Oracle request to {} failed: {}", url, e);
                RerankError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(RerankError::from)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Oracle returned non-success status");
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(500).collect());
            return Err(RerankError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        debug!(body_len = body.len(), "Oracle response received");
        Self::extract_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_chat_completions_url_trims_slash() {
        let oracle = OpenAICompatibleOracle::new(
            OracleConfig::default().with_base_url("http://localhost:1234/v1/"),
        )
        .unwrap();
        assert_eq!(
            oracle.chat_completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_new_rejects_zero_timeout() {
        let mut config = OracleConfig::default();
        config.timeout_secs = 0;
        assert!(matches!(
            OpenAICompatibleOracle::new(config),
            Err(RerankError::ConfigError(_))
        ));
    }

    #[test]
    fn test_name_and_model() {
        let oracle = OpenAICompatibleOracle::new(
            OracleConfig::default()
                .with_model("gpt-4o-mini")
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(oracle.name(), "openai-compatible");
        assert_eq!(oracle.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: [MessageRequest {
                role: "user",
                content: "rank these",
            }],
            temperature: 0.3,
            max_tokens: 150,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "rank these");
        assert_eq!(json["max_tokens"], 150);
    }

    #[test]
    fn test_extract_content_trims() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  3,1,2 \n"}}]}"#;
        assert_eq!(
            OpenAICompatibleOracle::extract_content(body).unwrap(),
            "3,1,2"
        );
    }

    #[test]
    fn test_extract_content_empty_variants() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
            r#"{}"#,
        ] {
            assert!(matches!(
                OpenAICompatibleOracle::extract_content(body),
                Err(RerankError::EmptyResponse)
            ));
        }
    }

    #[test]
    fn test_extract_content_invalid_json() {
        assert!(matches!(
            OpenAICompatibleOracle::extract_content("<html>oops</html>"),
            Err(RerankError::SerializationError(_))
        ));
    }
}
