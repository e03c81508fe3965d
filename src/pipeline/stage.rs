//! Pipeline stages.
//!
//! A stage is one LLM-backed step. [`StageKind`] is the closed set of
//! variants and owns the precondition each one places on the shared state;
//! [`Stage`] binds a kind to its role prompt and the LLM service.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::json;

use crate::error::{Result, RevfeedError};
use crate::llm::LlmClient;
use crate::prompt::{PromptRenderer, PromptRole, RolePrompt};

use super::state::FeedbackState;

/// Marker the LLM wraps verbatim paper quotes in.
pub const QUOTE_OPEN: &str = "<quote>";
/// Closing quote marker.
pub const QUOTE_CLOSE: &str = "</quote>";
/// What both quote markers become in formatted feedback.
pub const PLAIN_QUOTE: &str = "'";

/// The four stage variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Writes one feedback list from the paper and review.
    Generate,
    /// Merges the generated feedback lists.
    Aggregate,
    /// Edits feedback for correctness and clarity.
    Refine,
    /// Lays feedback out for the reviewer.
    Format,
}

impl StageKind {
    pub const ALL: [StageKind; 4] = [
        StageKind::Generate,
        StageKind::Aggregate,
        StageKind::Refine,
        StageKind::Format,
    ];

    /// Name used for this stage in architecture strings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate => "Actor",
            Self::Aggregate => "Aggregator",
            Self::Refine => "FeedbackCritic",
            Self::Format => "Formatter",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Prompt role the stage speaks as.
    pub fn role(&self) -> PromptRole {
        match self {
            Self::Generate => PromptRole::Actor,
            Self::Aggregate => PromptRole::Aggregator,
            Self::Refine => PromptRole::Critic,
            Self::Format => PromptRole::Formatter,
        }
    }

    /// Name -> kind map of every known stage.
    pub fn registry() -> HashMap<String, StageKind> {
        Self::ALL.into_iter().map(|kind| (kind.name().to_string(), kind)).collect()
    }

    /// Evaluate this stage's precondition against the state and pick its input.
    pub fn check<'a>(&self, state: &'a FeedbackState) -> std::result::Result<StageInput<'a>, Unmet> {
        match self {
            Self::Generate => Ok(StageInput::Source),
            Self::Aggregate => match state.feedback_list() {
                [] => Err(Unmet::Insufficient { found: 0 }),
                [only] => Ok(StageInput::PassThrough(only)),
                many => Ok(StageInput::FeedbackLists(many)),
            },
            Self::Refine => state
                .feedback_to_critique()
                .map(StageInput::Feedback)
                .ok_or(Unmet::Missing(
                    "no feedback to critique, run Aggregator first or generate exactly one feedback",
                )),
            Self::Format => state
                .feedback_to_format()
                .map(StageInput::Feedback)
                .ok_or(Unmet::Missing(
                    "no feedback to format, run FeedbackCritic or Aggregator first",
                )),
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a stage consumes once its precondition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageInput<'a> {
    /// Only the paper and review.
    Source,
    /// Two or more generated feedback lists to merge.
    FeedbackLists(&'a [String]),
    /// A lone feedback copied through without calling the LLM.
    PassThrough(&'a str),
    /// One feedback to critique or format.
    Feedback(&'a str),
}

/// An unmet precondition, before the executor attaches the step it happened at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unmet {
    Insufficient { found: usize },
    Missing(&'static str),
}

impl Unmet {
    /// Turn into an error naming the 1-based step and stage.
    pub fn at(self, step: usize, kind: StageKind) -> RevfeedError {
        match self {
            Unmet::Insufficient { found } => RevfeedError::InsufficientInput {
                step,
                stage: kind.name().to_string(),
                found,
            },
            Unmet::Missing(reason) => RevfeedError::MissingInput {
                step,
                stage: kind.name().to_string(),
                reason: reason.to_string(),
            },
        }
    }
}

/// Wrap each feedback list in an indexed tag pair, one per line.
pub fn tag_feedback_lists(feedbacks: &[String]) -> String {
    feedbacks
        .iter()
        .enumerate()
        .map(|(i, feedback)| format!("<feedback_list-{i}>{feedback}</feedback_list-{i}>\n"))
        .collect()
}

/// Replace both quote markers with a plain quote.
pub fn replace_quote_markers(text: &str) -> String {
    text.replace(QUOTE_OPEN, PLAIN_QUOTE).replace(QUOTE_CLOSE, PLAIN_QUOTE)
}

/// A stage bound to its prompt and the LLM service. Immutable; shared by
/// every occurrence of its name in a stage sequence.
pub struct Stage<L: LlmClient> {
    kind: StageKind,
    prompt: RolePrompt,
    llm: Arc<L>,
    renderer: Arc<PromptRenderer>,
}

impl<L: LlmClient> Stage<L> {
    pub fn new(kind: StageKind, prompt: RolePrompt, llm: Arc<L>, renderer: Arc<PromptRenderer>) -> Self {
        Self {
            kind,
            prompt,
            llm,
            renderer,
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn prompt(&self) -> &RolePrompt {
        &self.prompt
    }

    /// Render the user message for `input`, or `None` for a pass-through.
    pub fn render_message(&self, input: StageInput<'_>, state: &FeedbackState) -> Result<Option<String>> {
        let context = match input {
            StageInput::PassThrough(_) => return Ok(None),
            StageInput::Source => json!({
                "paper": state.paper(),
                "review": state.review(),
            }),
            StageInput::FeedbackLists(feedbacks) => json!({
                "feedbacks": tag_feedback_lists(feedbacks),
                "paper": state.paper(),
                "review": state.review(),
            }),
            StageInput::Feedback(feedback) => json!({
                "feedback": feedback,
                "paper": state.paper(),
                "review": state.review(),
            }),
        };

        self.renderer.render_with(&self.prompt.user_template, &context).map(Some)
    }

    /// Produce this stage's output. Calls the LLM at most once; LLM errors
    /// are returned unchanged.
    pub async fn execute(&self, input: StageInput<'_>, state: &FeedbackState) -> Result<String> {
        let output = match (input, self.render_message(input, state)?) {
            (StageInput::PassThrough(feedback), _) => feedback.to_string(),
            (_, Some(message)) => self.llm.invoke(&message, &self.prompt.system).await?,
            (_, None) => return Err(RevfeedError::Template(format!("{} rendered no message", self.kind))),
        };

        Ok(match self.kind {
            StageKind::Format => replace_quote_markers(&output),
            _ => output,
        })
    }
}

impl<L: LlmClient> fmt::Debug for Stage<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage").field("kind", &self.kind).finish()
    }
}
