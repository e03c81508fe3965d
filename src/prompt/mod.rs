//! Prompt System - role templates, loading and rendering
//!
//! Each pipeline role has a system prompt and a Handlebars user template.
//! Built-in templates can be overridden per file from a prompts directory.

mod loader;
mod render;
mod templates;

pub use loader::PromptLoader;
pub use render::PromptRenderer;
pub use templates::{PromptRole, PromptSet, RolePrompt};
