//! LLM Client Layer - opaque text-in/text-out service used by every stage
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - AnthropicClient implementation
//! - MockLlmClient for scripted tests

pub mod anthropic;
pub mod client;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, MockLlmClient};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, Usage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _role = Role::User;
        let _stop = StopReason::EndTurn;
        let _mock = MockLlmClient::new(vec![]);
    }
}
