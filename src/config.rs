//! Process-wide configuration.
//!
//! Configuration is read once at startup and is read-only afterwards. The
//! oracle client and the reranker are constructed from it and injected into
//! whatever serves requests.
//!
//! # Configuration File Location
//!
//! [`Settings::load`] looks in order at:
//! 1. `RECSYS_RERANK_CONFIG` environment variable (must exist when set)
//! 2. `./rerank.toml`
//! 3. `~/.recsys-rerank/rerank.toml`
//! 4. Built-in defaults
//!
//! Environment variables are applied on top of whatever was loaded.
//!
//! # Example Configuration
//!
//! ```toml
//! [oracle]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-3.5-turbo"
//! timeout_secs = 20
//!
//! [rerank]
//! max_candidates = 50
//! oracle_retries = 1
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `OPENAI_API_KEY` | `oracle.api_key` |
//! | `OPENAI_MODEL` | `oracle.model` |
//! | `OPENAI_BASE_URL` | `oracle.base_url` |
//! | `RERANK_ORACLE_TIMEOUT_SECS` | `oracle.timeout_secs` |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{RerankError, Result};
use crate::reranker::{whole_secs_rounded_up, RerankConfig};

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for ranking prompts.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default HTTP timeout for oracle requests, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the text-generation oracle.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    pub base_url: String,
    /// Bearer token; `None` for local servers that need none.
    pub api_key: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// HTTP timeout for one request, in seconds.
    pub timeout_secs: u64,
}

// Keeps the key out of logs.
impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OracleConfig {
    /// Build from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `OPENAI_API_KEY` is not set or the timeout
    /// override is not a positive integer.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        if config.api_key.is_none() {
            return Err(RerankError::ConfigError(
                "OPENAI_API_KEY not set. Please set it with: export OPENAI_API_KEY=your-api-key"
                    .to_string(),
            ));
        }
        Ok(config)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Rounded up to whole seconds, with a minimum of one second.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = whole_secs_rounded_up(timeout);
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Override fields from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.model = model;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(raw) = std::env::var("RERANK_ORACLE_TIMEOUT_SECS") {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                RerankError::ConfigError(format!(
                    "RERANK_ORACLE_TIMEOUT_SECS must be a positive integer, got '{}'",
                    raw
                ))
            })?;
        }
        Ok(())
    }

    /// Reject values the client cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(RerankError::ConfigError(
                "oracle timeout must be greater than zero".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(RerankError::ConfigError("oracle base_url is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(RerankError::ConfigError("oracle model is empty".to_string()));
        }
        Ok(())
    }
}

/// Root configuration structure for `rerank.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Oracle connection.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Reranking behaviour.
    #[serde(default)]
    pub rerank: RerankConfig,
}

impl Settings {
    /// Load from the first config file found, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `RECSYS_RERANK_CONFIG` names a file that does
    /// not exist, or if the loaded settings fail validation.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::find_config_file()? {
            Some(path) => {
                debug!(path = %path.display(), "Loading rerank configuration");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        settings.oracle.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a specific file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RerankError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let settings: Self = toml::from_str(toml_str)
            .map_err(|e| RerankError::ConfigError(format!("Failed to parse TOML config: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RerankError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Validate both sections.
    pub fn validate(&self) -> Result<()> {
        self.oracle.validate()?;
        self.rerank.validate()
    }

    /// User-level config path, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".recsys-rerank").join("rerank.toml"))
    }

    fn find_config_file() -> Result<Option<PathBuf>> {
        if let Ok(path) = std::env::var("RECSYS_RERANK_CONFIG") {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(RerankError::ConfigError(format!(
                    "RECSYS_RERANK_CONFIG points to {}, which does not exist",
                    path.display()
                )));
            }
            return Ok(Some(path));
        }

        let local = PathBuf::from("rerank.toml");
        if local.exists() {
            return Ok(Some(local));
        }

        Ok(Self::default_path().filter(|p| p.exists()))
    }
}
