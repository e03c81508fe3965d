//! Core LLM client trait and the scripted mock used in tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, RevfeedError};
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request, resolved once the full response arrives
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Check if the client can issue requests
    fn is_ready(&self) -> bool;

    /// Send one user message under the given role prompt and return the text
    async fn invoke(&self, message: &str, role_prompt: &str) -> Result<String> {
        let request = CompletionRequest::new(role_prompt).with_user_message(message);
        let response = self.complete(request).await?;
        Ok(response.content)
    }
}

/// Mock client that replays scripted responses in order and records requests
pub struct MockLlmClient {
    responses: Mutex<VecDeque<CompletionResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    /// Create a mock that returns the given responses in order
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock from plain response texts
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(CompletionResponse::text).collect())
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of completed calls
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .map_err(|e| RevfeedError::Llm(format!("Mock request log poisoned: {}", e)))?
            .push(request);

        self.responses
            .lock()
            .map_err(|e| RevfeedError::Llm(format!("Mock response queue poisoned: {}", e)))?
            .pop_front()
            .ok_or_else(|| RevfeedError::Llm("Mock client has no scripted response left".to_string()))
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
