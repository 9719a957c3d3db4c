//! Parsing oracle output into candidate indices.
//!
//! # Algorithm
//!
//! ```ascii
//!  raw text: " 3, 1,abc,,5 ,2"        subset_size = 3
//!        │  split on ','  +  trim
//!        ▼
//!  ["3", "1", "abc", "", "5", "2"]
//!        │  keep pure ASCII digit tokens
//!        ▼
//!  [3, 1, 5, 2]
//!        │  1-based → 0-based, drop out of range
//!        ▼
//!  [2, 0, 1]                          (5 → 4 is out of range)
//! ```
//!
//! Order is preserved and duplicates are kept; the reorder step enforces
//! at-most-once inclusion. If nothing survives, the result is the fallback
//! prefix `[0, 1, .., min(fallback_len, subset_size) - 1]`.
//!
//! Parsing never fails: malformed text degrades to the fallback.

use super::config::DEFAULT_PARSE_FALLBACK_LEN;

/// Outcome of parsing oracle text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRanking {
    /// At least one valid index was found.
    Ranked(Vec<usize>),
    /// Nothing usable was found; holds the default prefix.
    Fallback(Vec<usize>),
}

impl ParsedRanking {
    /// The zero-based indices, in oracle order.
    pub fn indices(&self) -> &[usize] {
        match self {
            ParsedRanking::Ranked(indices) | ParsedRanking::Fallback(indices) => indices,
        }
    }

    /// Consume into the indices.
    pub fn into_indices(self) -> Vec<usize> {
        match self {
            ParsedRanking::Ranked(indices) | ParsedRanking::Fallback(indices) => indices,
        }
    }

    /// Whether the fallback prefix was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParsedRanking::Fallback(_))
    }
}

/// Parser for comma-separated 1-based rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingParser {
    fallback_len: usize,
}

impl Default for RankingParser {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_FALLBACK_LEN)
    }
}

impl RankingParser {
    /// Create a parser whose fallback covers `fallback_len` leading positions.
    pub fn new(fallback_len: usize) -> Self {
        Self { fallback_len }
    }

    /// Parse `raw_text` against a subset of `subset_size` candidates.
    pub fn parse(&self, raw_text: &str, subset_size: usize) -> ParsedRanking {
        let indices: Vec<usize> = raw_text
            .split(',')
            .filter_map(|token| to_index(token.trim(), subset_size))
            .collect();

        if indices.is_empty() {
            ParsedRanking::Fallback((0..self.fallback_len.min(subset_size)).collect())
        } else {
            ParsedRanking::Ranked(indices)
        }
    }
}

/// Convert one trimmed token into an in-range zero-based index.
fn to_index(token: &str, subset_size: usize) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overflowing literals are out of range by definition.
    let position: usize = token.parse().ok()?;
    let index = position.checked_sub(1)?;
    (index < subset_size).then_some(index)
}

/// Parse with the default fallback length of 10.
pub fn parse_rankings(raw_text: &str, subset_size: usize) -> Vec<usize> {
    RankingParser::default()
        .parse(raw_text, subset_size)
        .into_indices()
}
