//! Feedback pipeline: architecture parsing, stages, shared state and the executor.
//!
//! ```text
//! "Actor(2)->Aggregator->FeedbackCritic->Formatter"
//!     -> [Generate, Generate, Aggregate, Refine, Format]
//!     -> FeedbackReport
//! ```

pub mod architecture;
mod executor;
mod observer;
pub mod stage;
mod state;

pub use architecture::{DEFAULT_ARCHITECTURE, MAX_SEQUENCE_LEN, MAX_STAGE_COUNT, StageToken, parse, parse_kinds, tokenize};
pub use executor::{FeedbackPipeline, PipelineBuilder};
pub use observer::{LogObserver, NoopObserver, PipelineObserver};
pub use stage::{Stage, StageInput, StageKind, Unmet, replace_quote_markers, tag_feedback_lists};
pub use state::{FeedbackReport, FeedbackState};
