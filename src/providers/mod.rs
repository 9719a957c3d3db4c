//! Ranking oracle implementations.

pub mod mock;
pub use mock::{MockFailure, MockOracle, MockReply};

pub mod openai_compatible;
pub use openai_compatible::OpenAICompatibleOracle;
