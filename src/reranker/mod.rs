//! Candidate re-ranking with a language model as the ranking oracle.
//!
//! Given prior-ordered candidates from similarity search and a free-text
//! context, produce an ordered top-K list. The oracle is unreliable by
//! assumption, so every path ends in a list: malformed output degrades to a
//! default order and an unavailable oracle degrades to the prior order.
//!
//! # Architecture
//!
//! ```ascii
//!        candidates (prior order) + context + top_k
//!                          │
//!                          ▼
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │PromptBuilder │──►│RankingOracle │──►│RankingParser │
//!   │ (≤50 items)  │   │ (HTTP / mock)│   │ (indices)    │
//!   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                │
//!                                                ▼
//!                                    reorder + fill-if-short
//!                                                │
//!                                                ▼
//!                                          RerankOutcome
//! ```
//!
//! # Module Structure
//!
//! ```ascii
//! reranker/
//! ├── mod.rs      ─► This file (re-exports)
//! ├── config.rs   ─► RerankConfig
//! ├── prompt.rs   ─► PromptBuilder, build_prompt
//! ├── parser.rs   ─► RankingParser, ParsedRanking, parse_rankings
//! ├── llm.rs      ─► LlmReranker, reorder
//! ├── prior.rs    ─► PriorOrderReranker
//! ├── result.rs   ─► RerankOutcome, RankingSource
//! ├── traits.rs   ─► Reranker trait
//! └── explain.rs  ─► Explainer
//! ```

mod config;
mod explain;
mod llm;
mod parser;
mod prior;
mod prompt;
mod result;
mod traits;

pub(crate) use config::whole_secs_rounded_up;
pub use config::{
    RerankConfig, DEFAULT_DESCRIPTION_CHARS, DEFAULT_MAX_CANDIDATES, DEFAULT_PARSE_FALLBACK_LEN,
};
pub use explain::{Explainer, FALLBACK_EXPLANATION};
pub use llm::{reorder, LlmReranker};
pub use parser::{parse_rankings, ParsedRanking, RankingParser};
pub use prior::{prior_order, PriorOrderReranker};
pub use prompt::{build_prompt, PromptBuilder, UNKNOWN_TITLE};
pub use result::{RankingSource, RerankOutcome};
pub use traits::Reranker;
