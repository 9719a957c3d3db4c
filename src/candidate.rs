//! Candidate items produced by similarity search.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// A scored item returned by similarity search.
///
/// A candidate is read-only input to a rerank call. The order in which
/// candidates arrive (descending `score`) is the *prior* order, used for
/// truncation and for every fallback path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier in the vector index.
    pub id: String,

    /// Similarity score.
    pub score: f64,

    /// Display title, if the index stored one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Raw metadata as returned by the index.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, JsonValue>,
}

impl Candidate {
    /// Create a candidate with an id and score.
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
            title: None,
            description: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Build a candidate from a raw search hit.
    ///
    /// `title` and `description` are lifted out of the metadata when they are
    /// strings; the full metadata map is kept as `attributes`.
    pub fn from_search_hit(
        id: impl Into<String>,
        score: f64,
        metadata: Map<String, JsonValue>,
    ) -> Self {
        let title = metadata
            .get("title")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let description = metadata
            .get("description")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            id: id.into(),
            score,
            title,
            description,
            attributes: metadata.into_iter().collect(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a raw attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Title, or `default` when the index stored none.
    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(default)
    }

    /// First `max_chars` characters of the description.
    ///
    /// Counts characters, not bytes, so multi-byte text is never split.
    pub fn description_prefix(&self, max_chars: usize) -> &str {
        match self.description.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.description[..byte_idx],
            None => &self.description,
        }
    }
}
