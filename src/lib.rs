//! Revfeed - feedback on peer reviews from a pipeline of LLM agents
//!
//! An architecture string such as `Actor(2)->Aggregator->FeedbackCritic->Formatter`
//! selects the stages. Each stage reads from and writes to a shared state record,
//! and the run produces a `FeedbackReport`.

pub mod audit;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod prompt;

pub use error::{Result, RevfeedError};
