//! Built-in role prompts for the four pipeline roles.
//!
//! User templates are rendered with Handlebars; system prompts are sent as-is.

use std::fmt;

use crate::error::Result;
use crate::prompt::PromptLoader;

/// The LLM role a stage speaks as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptRole {
    /// Writes feedback for the review
    Actor,
    /// Merges several feedback lists into one
    Aggregator,
    /// Checks feedback for correctness and clarity
    Critic,
    /// Renders the final comment/feedback list
    Formatter,
}

impl PromptRole {
    /// All roles, in pipeline order.
    pub const ALL: [PromptRole; 4] = [
        PromptRole::Actor,
        PromptRole::Aggregator,
        PromptRole::Critic,
        PromptRole::Formatter,
    ];

    /// Lowercase role name, also the prefix of override template files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Aggregator => "aggregator",
            Self::Critic => "critic",
            Self::Formatter => "formatter",
        }
    }
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// System prompt and user template for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePrompt {
    /// Sent as the system message.
    pub system: String,
    /// Handlebars template for the single user message.
    pub user_template: String,
}

impl RolePrompt {
    pub fn new(system: impl Into<String>, user_template: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user_template: user_template.into(),
        }
    }
}

/// The prompts of all four roles.
#[derive(Debug, Clone)]
pub struct PromptSet {
    actor: RolePrompt,
    aggregator: RolePrompt,
    critic: RolePrompt,
    formatter: RolePrompt,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptSet {
    /// The prompts compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            actor: RolePrompt::new(ACTOR_SYSTEM, ACTOR_USER),
            aggregator: RolePrompt::new(with_guidelines(AGGREGATOR_SYSTEM), AGGREGATOR_USER),
            critic: RolePrompt::new(with_guidelines(CRITIC_SYSTEM), CRITIC_USER),
            formatter: RolePrompt::new(FORMATTER_SYSTEM, FORMATTER_USER),
        }
    }

    /// Prompt for the given role.
    pub fn get(&self, role: PromptRole) -> &RolePrompt {
        match role {
            PromptRole::Actor => &self.actor,
            PromptRole::Aggregator => &self.aggregator,
            PromptRole::Critic => &self.critic,
            PromptRole::Formatter => &self.formatter,
        }
    }

    fn get_mut(&mut self, role: PromptRole) -> &mut RolePrompt {
        match role {
            PromptRole::Actor => &mut self.actor,
            PromptRole::Aggregator => &mut self.aggregator,
            PromptRole::Critic => &mut self.critic,
            PromptRole::Formatter => &mut self.formatter,
        }
    }

    /// Replace prompts with `<role>_system.md` / `<role>_user.md` files found by the loader.
    ///
    /// The directory must exist. Markdown files that match no role are
    /// reported and otherwise ignored.
    pub fn with_overrides(mut self, loader: &PromptLoader) -> Result<Self> {
        let mut known = Vec::new();

        for role in PromptRole::ALL {
            let system_name = format!("{}_system", role.name());
            if let Some(system) = loader.load_optional(&system_name)? {
                log::info!("Using {} from {}", system_name, loader.templates_dir().display());
                self.get_mut(role).system = system;
            }

            let user_name = format!("{}_user", role.name());
            if let Some(user_template) = loader.load_optional(&user_name)? {
                log::info!("Using {} from {}", user_name, loader.templates_dir().display());
                self.get_mut(role).user_template = user_template;
            }

            known.push(system_name);
            known.push(user_name);
        }

        for name in loader.list_available()? {
            if !known.contains(&name) {
                log::warn!("Ignoring unrecognized prompt file {}.md", name);
            }
        }
        Ok(self)
    }
}

fn with_guidelines(head: &str) -> String {
    format!(
        "{}\n\nThe feedback was originally written under these guidelines, which still apply:\n<ORIGINAL_GUIDELINES>\n{}\n</ORIGINAL_GUIDELINES>",
        head, ACTOR_SYSTEM
    )
}

const ACTOR_SYSTEM: &str = r#"You are given a peer review of a machine learning paper submitted to a top-tier conference. Help the reviewer turn it into a high-quality review by pointing out, comment by comment, where the review falls short.

1. Read the review and the paper it was written about.

2. Consider only comments about weaknesses of the paper or questions the reviewer asks; skip summaries and strengths. Read every sentence that belongs to one thought before judging it. Most comments are already clear and actionable, so respond only to those that clearly fail one of these checks:
   - The reviewer asks for something the paper plainly contains. Only respond when certain; politely ask whether the quoted passage answers the question, quoting the paper verbatim inside <quote> </quote> tags.
   - The comment is vague or unjustified. Ask the reviewer to be specific about what is missing or to justify the claim.
   - The comment is unprofessional or uses absolute language. Suggest a more measured phrasing.

3. For each failing comment, reply in this format:
   - Comment: {{the verbatim comment}}
   - Feedback: {{your concise feedback}}
   If the review has no issues at all, reply: "Thanks for your hard work!"

Remember:
- Keep each piece of feedback to 1-2 sentences, with no preamble or summary.
- Do not repeat or praise what the reviewer wrote.
- Do not mention checklists or guidelines.
- Address the reviewer only, never the authors.
- Ignore comments about scores, ratings or typos."#;

const ACTOR_USER: &str = "Here is the paper: <PAPER> {{paper}} </PAPER>. Here is the peer review: <REVIEW> {{review}} </REVIEW>";

const AGGREGATOR_SYSTEM: &str = r#"You will be given several lists of feedback about one peer review of a machine learning paper. Merge them into a single list.

1. Read every feedback list, the review, and the paper.
2. When several lists comment on the same reviewer comment, keep only the best feedback for it.
3. Keep a feedback item that appears in only one list only if it is essential to improving the review.
4. The result must not repeat any reviewer comment. Return it in the format you received:
   - Comment: {{the verbatim comment}}
   - Feedback: {{your concise feedback}}"#;

const AGGREGATOR_USER: &str = "Here is the paper: <PAPER> {{paper}} </PAPER>.\nHere are the lists of feedback: <FEEDBACK_LIST> {{feedbacks}} </FEEDBACK_LIST>\nHere is the peer review: <REVIEW> {{review}} </REVIEW>";

const CRITIC_SYSTEM: &str = r#"You are a critic helping reviewers improve their reviews. You are given feedback written for the comments of a peer review; edit that feedback for correctness and clarity.

1. Read the feedback list, the review, and the paper.
2. Check every quote and factual claim in the feedback. Quotes must appear verbatim in the paper. Fix incorrect feedback, or drop it if it cannot be fixed.
3. Drop feedback that is nitpicky, superficial, or merely agrees with or praises the reviewer; every item must lead the reviewer to change their comment.
4. Leave correct, useful items untouched and do not add new points unless something important was clearly missed.
5. Address the reviewer in the second person.
6. Return the list in the format you received:
   - Comment: {{the verbatim comment}}
   - Feedback: {{your concise feedback}}"#;

const CRITIC_USER: &str = "Here is the paper: <PAPER> {{paper}} </PAPER>. Here is the feedback: <FEEDBACK> {{feedback}} </FEEDBACK>. Here is the peer review: <REVIEW> {{review}} </REVIEW>\n\nRemember:\n- You are a critic helping reviewers improve their comments and reviews.\n- Do not address the authors or give them suggestions. The feedback is for the reviewer only.";

const FORMATTER_SYSTEM: &str = r#"You will be given feedback on the comments of a peer review. Your reply is sent directly to the reviewer who wrote the review.

Format the feedback as a list of comment/feedback pairs:

    - **Reviewer comment:** {{a comment}}
    - **Feedback to the reviewer:** {{feedback to the comment}}

Only lines starting with "Comment" or "Feedback" matter.
- Remove any pair whose feedback offers no suggestion for improvement, including "No changes needed" and similar.
- Do not change the wording of the feedback, only its layout.
- Output nothing but the list: no preamble, no conclusion.
- If no feedback remains, reply exactly: Thanks for your hard work!"#;

const FORMATTER_USER: &str = "Here is the feedback for you to format: {{feedback}}";
