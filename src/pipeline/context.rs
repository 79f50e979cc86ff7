//! Pipeline context for managing dependencies

use std::sync::Arc;
use std::time::Instant;

use crate::artifacts::ArtifactStore;
use crate::llm::{LLMClient, LLMRequest};
use crate::progress::{ProgressEvent, ProgressHandler};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::stage::StageKind;

/// Context that owns all long-lived pipeline dependencies
pub struct PipelineContext {
    /// LLM client for communication
    pub llm_client: Arc<dyn LLMClient>,

    /// Where every stage reads and writes its artifacts
    pub store: ArtifactStore,

    /// Prompt fragments and naming
    pub config: PipelineConfig,

    progress: Option<Arc<dyn ProgressHandler>>,
}

impl PipelineContext {
    pub fn new(llm_client: Arc<dyn LLMClient>, store: ArtifactStore, config: PipelineConfig) -> Self {
        Self {
            llm_client,
            store,
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress = Some(handler);
        self
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress {
            handler.on_progress(&event);
        }
    }

    /// Sends one request and returns the response text.
    ///
    /// Backend failures are tagged with `stage`; nothing is retried.
    pub async fn chat(
        &self,
        stage: StageKind,
        request: LLMRequest,
    ) -> Result<String, PipelineError> {
        self.emit(ProgressEvent::LlmRequestStarted {
            stage,
            messages: request.messages.len(),
        });

        let start = Instant::now();
        let response = self
            .llm_client
            .chat(request)
            .await
            .map_err(|source| PipelineError::Model { stage, source })?;

        self.emit(ProgressEvent::LlmResponseReceived {
            stage,
            response_chars: response.content.len(),
            response_time: start.elapsed(),
        });

        Ok(response.content)
    }
}
