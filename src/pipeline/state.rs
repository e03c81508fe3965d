//! Shared state threaded through one pipeline run, and the report it leaves behind.

use serde::{Deserialize, Serialize};

/// Per-invocation state. Created fresh by the executor for every run and
/// only ever written by it, one stage at a time.
#[derive(Debug, Clone, Default)]
pub struct FeedbackState {
    paper: String,
    review: String,
    feedback_list: Vec<String>,
    aggregated_feedback: Option<String>,
    critiqued_feedback: Option<String>,
    formatted_feedback: Option<String>,
}

impl FeedbackState {
    pub fn new(paper: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            paper: paper.into(),
            review: review.into(),
            ..Default::default()
        }
    }

    pub fn paper(&self) -> &str {
        &self.paper
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    /// Generated feedback, in the order the Generate stages ran.
    pub fn feedback_list(&self) -> &[String] {
        &self.feedback_list
    }

    pub fn aggregated_feedback(&self) -> Option<&str> {
        self.aggregated_feedback.as_deref()
    }

    pub fn critiqued_feedback(&self) -> Option<&str> {
        self.critiqued_feedback.as_deref()
    }

    pub fn formatted_feedback(&self) -> Option<&str> {
        self.formatted_feedback.as_deref()
    }

    /// The generated feedback, if exactly one was produced.
    pub fn sole_feedback(&self) -> Option<&str> {
        match self.feedback_list.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Input for the critic: aggregated feedback, else the sole generated one.
    pub fn feedback_to_critique(&self) -> Option<&str> {
        self.aggregated_feedback().or_else(|| self.sole_feedback())
    }

    /// Input for the formatter: critiqued, else aggregated, else the sole generated feedback.
    pub fn feedback_to_format(&self) -> Option<&str> {
        self.critiqued_feedback()
            .or_else(|| self.aggregated_feedback())
            .or_else(|| self.sole_feedback())
    }

    pub(crate) fn push_feedback(&mut self, feedback: String) {
        self.feedback_list.push(feedback);
    }

    pub(crate) fn set_aggregated(&mut self, feedback: String) {
        self.aggregated_feedback = Some(feedback);
    }

    pub(crate) fn set_critiqued(&mut self, feedback: String) {
        self.critiqued_feedback = Some(feedback);
    }

    pub(crate) fn set_formatted(&mut self, feedback: String) {
        self.formatted_feedback = Some(feedback);
    }

    /// Snapshot of the four output fields. Consumes the state.
    pub fn into_report(self) -> FeedbackReport {
        FeedbackReport {
            initial_feedback: self.feedback_list,
            aggregated_feedback: self.aggregated_feedback,
            critiqued_feedback: self.critiqued_feedback,
            formatted_feedback: self.formatted_feedback,
        }
    }
}

/// Result of a completed pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub initial_feedback: Vec<String>,
    pub aggregated_feedback: Option<String>,
    pub critiqued_feedback: Option<String>,
    pub formatted_feedback: Option<String>,
}

impl FeedbackReport {
    /// The most processed feedback the run produced.
    pub fn final_feedback(&self) -> Option<&str> {
        self.formatted_feedback
            .as_deref()
            .or(self.critiqued_feedback.as_deref())
            .or(self.aggregated_feedback.as_deref())
            .or_else(|| self.initial_feedback.last().map(String::as_str))
    }
}
