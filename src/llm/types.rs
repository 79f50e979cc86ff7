//! Messages exchanged with a model
//!
//! Every call the pipeline makes is a plain list of role-tagged text messages:
//! either the growing planning conversation or a fresh system + user pair.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    fn with_role(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content)
    }

    /// A model answer fed back into a conversation
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }
}

/// Messages for one model call, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LLMRequest {
    pub messages: Vec<ChatMessage>,
}

impl LLMRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Standalone call with no history: system prompt plus one instruction
    pub fn exchange(system: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(instruction),
        ])
    }
}

/// Completion text and how long the backend took to produce it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub response_time: Duration,
}

impl LLMResponse {
    pub fn text(content: impl Into<String>, response_time: Duration) -> Self {
        Self {
            content: content.into(),
            response_time,
        }
    }
}
