//! LLM-as-judge audit of generated feedback.
//!
//! Each property is a binary check. The judge sees the review and the
//! final feedback and answers `PASS` or `FAIL: <reason>`.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, RevfeedError};
use crate::llm::{CompletionRequest, LlmClient};

const JUDGE_SYSTEM_PROMPT: &str =
    "You are a strict evaluator of feedback written for peer reviewers. Give binary PASS/FAIL judgments with specific reasons.";

const JUDGE_MAX_TOKENS: u32 = 500;

/// A property the final feedback must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditProperty {
    /// Feedback must not praise the reviewer
    PraiseFeedback,
    /// Feedback speaks to the reviewer, not to the paper's authors
    AddressedToAuthor,
    /// Feedback adds something beyond restating the reviewer's comment
    RestateReviewer,
    /// Every quoted reviewer comment appears in the review
    CommentsInReview,
}

impl AuditProperty {
    pub const ALL: [AuditProperty; 4] = [
        AuditProperty::PraiseFeedback,
        AuditProperty::AddressedToAuthor,
        AuditProperty::RestateReviewer,
        AuditProperty::CommentsInReview,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AuditProperty::PraiseFeedback => "praise_feedback",
            AuditProperty::AddressedToAuthor => "addressed_to_author",
            AuditProperty::RestateReviewer => "restate_reviewer",
            AuditProperty::CommentsInReview => "comments_in_review",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| RevfeedError::Config(format!("Unknown audit property: {}", name)))
    }

    fn question(&self) -> &'static str {
        match self {
            AuditProperty::PraiseFeedback => {
                "Does the feedback avoid praising the reviewer or simply agreeing with their comments? \
                 Every item must push the reviewer to change something."
            }
            AuditProperty::AddressedToAuthor => {
                "Is the feedback addressed to the reviewer? It fails if any item is written as advice \
                 to the authors of the paper."
            }
            AuditProperty::RestateReviewer => {
                "Does each feedback item add a suggestion of its own? It fails if an item only restates \
                 what the reviewer already wrote."
            }
            AuditProperty::CommentsInReview => {
                "Does every reviewer comment quoted in the feedback actually appear in the review? \
                 Minor whitespace or punctuation differences are acceptable."
            }
        }
    }

    /// Judge prompt for this property.
    pub fn build_prompt(&self, feedback: &str, review: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Criterion\n\n");
        prompt.push_str(self.question());
        prompt.push_str("\n\n## Peer Review\n\n```\n");
        prompt.push_str(review);
        prompt.push_str("\n```\n\n## Feedback to Evaluate\n\n```\n");
        prompt.push_str(feedback);
        prompt.push_str("\n```\n\n## Your Response\n\n");
        prompt.push_str("Respond with EXACTLY one of:\n");
        prompt.push_str("- `PASS` if the criterion is met\n");
        prompt.push_str("- `FAIL: <reason>` if it is not\n\n");
        prompt.push_str("Your response (PASS or FAIL: <reason>):");

        prompt
    }
}

impl fmt::Display for AuditProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The judge's decision on one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub reasoning: String,
}

impl Verdict {
    pub fn pass(reasoning: impl Into<String>) -> Self {
        Self {
            passed: true,
            reasoning: reasoning.into(),
        }
    }

    pub fn fail(reasoning: impl Into<String>) -> Self {
        Self {
            passed: false,
            reasoning: reasoning.into(),
        }
    }
}

/// Parse a judge answer into a verdict.
pub fn parse_verdict(response: &str) -> Result<Verdict> {
    let response = response.trim();

    if response.starts_with("PASS") || response.eq_ignore_ascii_case("pass") {
        return Ok(Verdict::pass(response));
    }

    if let Some(reason) = response.strip_prefix("FAIL:").or_else(|| response.strip_prefix("FAIL ")) {
        return Ok(Verdict::fail(reason.trim()));
    }
    if response == "FAIL" {
        return Ok(Verdict::fail(""));
    }

    // Keywords decide only when the reply leans one way
    let lower = response.to_lowercase();
    let says_fail = lower.contains("fail") || lower.contains("does not meet");
    let says_pass = lower.contains("pass") || lower.contains("meets the criterion");
    match (says_pass, says_fail) {
        (true, false) => return Ok(Verdict::pass(response)),
        (false, true) => return Ok(Verdict::fail(response)),
        _ => {}
    }

    Err(RevfeedError::Llm(format!(
        "Could not parse judge response as PASS or FAIL: {}",
        truncate_for_error(response, 100)
    )))
}

fn truncate_for_error(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Runs the property checks against final feedback
pub struct FeedbackAuditor<L: LlmClient> {
    llm: Arc<L>,
    properties: Vec<AuditProperty>,
}

impl<L: LlmClient> FeedbackAuditor<L> {
    /// Auditor checking every property
    pub fn new(llm: Arc<L>) -> Self {
        Self {
            llm,
            properties: AuditProperty::ALL.to_vec(),
        }
    }

    pub fn with_properties(mut self, properties: Vec<AuditProperty>) -> Self {
        self.properties = properties;
        self
    }

    pub fn properties(&self) -> &[AuditProperty] {
        &self.properties
    }

    /// Ask the judge about a single property.
    pub async fn judge(&self, property: AuditProperty, feedback: &str, review: &str) -> Result<Verdict> {
        let request = CompletionRequest::new(JUDGE_SYSTEM_PROMPT)
            .with_user_message(property.build_prompt(feedback, review))
            .with_max_tokens(JUDGE_MAX_TOKENS);

        let response = self.llm.complete(request).await?;
        let verdict = parse_verdict(&response.content)?;

        if verdict.passed {
            log::debug!("Audit {} passed", property);
        } else {
            log::warn!("Audit {} failed: {}", property, verdict.reasoning);
        }
        Ok(verdict)
    }

    /// Check every configured property, in order.
    ///
    /// Returns whether all passed and the names of those that failed.
    pub async fn audit(&self, feedback: &str, review: &str) -> Result<(bool, Vec<String>)> {
        let mut failed = Vec::new();

        for property in &self.properties {
            if !self.judge(*property, feedback, review).await?.passed {
                failed.push(property.name().to_string());
            }
        }

        Ok((failed.is_empty(), failed))
    }
}
