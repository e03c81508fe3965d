//! Prompt Renderer - Render templates with context variables using Handlebars

use std::collections::HashMap;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Result, RevfeedError};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Create a new PromptRenderer with default settings
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Paper and review text must reach the model verbatim
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render a template string with the given context
    ///
    /// # Arguments
    /// * `template` - The template string containing {{variable}} placeholders
    /// * `context` - A HashMap of variable names to values
    pub fn render(&self, template: &str, context: &HashMap<String, String>) -> Result<String> {
        self.render_with(template, context)
    }

    /// Render a template string with any serializable context
    pub fn render_with<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| RevfeedError::Template(format!("Failed to render template: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple() {
        let renderer = PromptRenderer::new();
        let mut context = HashMap::new();
        context.insert("review".to_string(), "Weak baselines.".to_string());

        let result = renderer.render("Review: {{review}}", &context).unwrap();
        assert_eq!(result, "Review: Weak baselines.");
    }

    #[test]
    fn test_render_missing_variable_empty_string() {
        let renderer = PromptRenderer::default();
        let context: HashMap<String, String> = HashMap::new();

        let result = renderer.render("Feedback: {{feedback}}!", &context).unwrap();
        assert_eq!(result, "Feedback: !");
    }

    #[test]
    fn test_render_no_escape_html() {
        let renderer = PromptRenderer::new();
        let mut context = HashMap::new();
        context.insert(
            "feedbacks".to_string(),
            "<feedback_list-0>a & b</feedback_list-0>".to_string(),
        );

        let result = renderer.render("{{feedbacks}}", &context).unwrap();
        assert_eq!(result, "<feedback_list-0>a & b</feedback_list-0>");
    }

    #[test]
    fn test_render_value_with_braces_is_not_expanded() {
        let renderer = PromptRenderer::new();
        let mut context = HashMap::new();
        context.insert("paper".to_string(), "set {{x}} = 1".to_string());

        let result = renderer.render("<PAPER>{{paper}}</PAPER>", &context).unwrap();
        assert_eq!(result, "<PAPER>set {{x}} = 1</PAPER>");
    }

    #[test]
    fn test_render_with_serializable() {
        #[derive(Serialize)]
        struct Context {
            paper: String,
            review: String,
        }

        let renderer = PromptRenderer::new();
        let context = Context {
            paper: "paper text".to_string(),
            review: "review text".to_string(),
        };

        let result = renderer.render_with("{{paper}} / {{review}}", &context).unwrap();
        assert_eq!(result, "paper text / review text");
    }

    #[test]
    fn test_render_invalid_template() {
        let renderer = PromptRenderer::new();
        let context: HashMap<String, String> = HashMap::new();

        let result = renderer.render("{{#if}}unclosed", &context);
        assert!(matches!(result, Err(RevfeedError::Template(_))));
    }

    #[test]
    fn test_render_preserves_whitespace() {
        let renderer = PromptRenderer::new();
        let context: HashMap<String, String> = HashMap::new();

        let result = renderer.render("Line 1\n\nLine 3\n\n\nLine 6", &context).unwrap();
        assert_eq!(result, "Line 1\n\nLine 3\n\n\nLine 6");
    }
}
