//! LLM client abstraction layer
//!
//! This module provides a trait-based abstraction for LLM communication,
//! allowing different backends (GenAI, Mock, Recording) to be used interchangeably.
//! The pipeline only ever sees [`LLMClient`]; what sits behind it is opaque.

mod client;
mod error;
mod genai;
mod mock;
mod recording;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use recording::{RecordedExchange, RecordedRequest, RecordingLLMClient, RecordingMode};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
