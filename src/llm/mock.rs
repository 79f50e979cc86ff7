//! Scripted model for tests
//!
//! Answers are consumed in order, one per call, and every request is kept so
//! tests can inspect exactly which prompts each stage sent.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Failure(BackendError),
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        MockResponse::Text(content.into())
    }

    pub fn error(error: BackendError) -> Self {
        MockResponse::Failure(error)
    }
}

#[derive(Default)]
struct Script {
    pending: VecDeque<MockResponse>,
    seen: Vec<LLMRequest>,
}

#[derive(Default)]
pub struct MockLLMClient {
    script: Mutex<Script>,
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_response(&self, response: MockResponse) {
        self.script().pending.push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        self.script().pending.extend(responses);
    }

    pub fn remaining_responses(&self) -> usize {
        self.script().pending.len()
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<LLMRequest> {
        self.script().seen.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script().seen.len()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let mut script = self.script();
        let call = script.seen.len() + 1;
        script.seen.push(request);

        match script.pending.pop_front() {
            Some(MockResponse::Text(content)) => {
                Ok(LLMResponse::text(content, Duration::from_millis(10)))
            }
            Some(MockResponse::Failure(error)) => Err(error),
            None => Err(BackendError::Other {
                message: format!("MockLLMClient: no scripted answer for call {}", call),
            }),
        }
    }

    fn name(&self) -> &str {
        "MockLLM"
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockLLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let script = self.script();
        f.debug_struct("MockLLMClient")
            .field("pending", &script.pending.len())
            .field("seen", &script.seen.len())
            .finish()
    }
}
