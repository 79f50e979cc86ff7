//! LLM request-response recording for deterministic reruns

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Recording mode for LLM interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// Record new exchanges and save to disk
    Record,
    /// Replay from recorded exchanges, fail if not found
    Replay,
    /// Replay if recording exists, otherwise record
    Auto,
}

impl RecordingMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "record" => Ok(RecordingMode::Record),
            "replay" => Ok(RecordingMode::Replay),
            "auto" => Ok(RecordingMode::Auto),
            _ => anyhow::bail!("Invalid recording mode: {}", s),
        }
    }

    /// Reads `REPROKIT_RECORDING_MODE`, falling back to `default`
    pub fn from_env(default: RecordingMode) -> RecordingMode {
        std::env::var("REPROKIT_RECORDING_MODE")
            .ok()
            .and_then(|s| Self::parse(&s).ok())
            .unwrap_or(default)
    }
}

/// A recorded request-response exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedExchange {
    pub request_hash: String,
    pub request: RecordedRequest,
    pub response: LLMResponse,
    /// ISO 8601
    pub recorded_at: String,
}

/// Request shape used for hashing and storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
}

impl RecordedRequest {
    pub fn from_llm_request(req: &LLMRequest, model: Option<String>) -> Self {
        Self {
            messages: req.messages.clone(),
            model,
        }
    }

    /// MD5 of the canonical JSON form
    pub fn canonical_hash(&self) -> Result<String> {
        let canonical_json =
            serde_json::to_string(self).context("Failed to serialize request for hashing")?;
        Ok(format!("{:x}", md5::compute(canonical_json.as_bytes())))
    }
}

/// LLM client that records or replays interactions
pub struct RecordingLLMClient {
    inner: Arc<dyn LLMClient>,
    mode: RecordingMode,
    recordings_dir: PathBuf,
}

impl RecordingLLMClient {
    pub fn new(
        inner: Arc<dyn LLMClient>,
        mode: RecordingMode,
        recordings_dir: PathBuf,
    ) -> Result<Self> {
        std::fs::create_dir_all(&recordings_dir)
            .context("Failed to create recordings directory")?;

        Ok(Self {
            inner,
            mode,
            recordings_dir,
        })
    }

    pub fn mode(&self) -> RecordingMode {
        self.mode
    }

    fn recording_path(&self, request_hash: &str) -> PathBuf {
        self.recordings_dir.join(format!("{}.json", request_hash))
    }

    async fn load_recording(&self, request_hash: &str) -> Result<Option<LLMResponse>> {
        let path = self.recording_path(request_hash);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read recording: {}", path.display()))?;

        let exchange: RecordedExchange = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse recording: {}", path.display()))?;

        Ok(Some(exchange.response))
    }

    async fn save_recording(
        &self,
        request: &RecordedRequest,
        request_hash: &str,
        response: &LLMResponse,
    ) -> Result<()> {
        let exchange = RecordedExchange {
            request_hash: request_hash.to_string(),
            request: request.clone(),
            response: response.clone(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
        };

        let path = self.recording_path(request_hash);
        let contents =
            serde_json::to_string_pretty(&exchange).context("Failed to serialize recording")?;
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write recording: {}", path.display()))?;

        debug!("Recorded exchange {}", path.display());
        Ok(())
    }

    async fn call_and_record(
        &self,
        request: LLMRequest,
        recorded_request: &RecordedRequest,
        request_hash: &str,
    ) -> Result<LLMResponse, BackendError> {
        let response = self.inner.chat(request).await?;

        self.save_recording(recorded_request, request_hash, &response)
            .await
            .map_err(|e| BackendError::RecordingError {
                message: format!("Failed to save recording: {:#}", e),
            })?;

        Ok(response)
    }
}

#[async_trait]
impl LLMClient for RecordingLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let recorded_request = RecordedRequest::from_llm_request(&request, self.inner.model_info());
        let request_hash =
            recorded_request
                .canonical_hash()
                .map_err(|e| BackendError::RecordingError {
                    message: format!("{:#}", e),
                })?;

        if self.mode == RecordingMode::Record {
            return self
                .call_and_record(request, &recorded_request, &request_hash)
                .await;
        }

        let replayed =
            self.load_recording(&request_hash)
                .await
                .map_err(|e| BackendError::RecordingError {
                    message: format!("Failed to load recording: {:#}", e),
                })?;

        match (replayed, self.mode) {
            (Some(response), _) => {
                debug!("Replaying recorded exchange {}", request_hash);
                Ok(response)
            }
            (None, RecordingMode::Replay) => Err(BackendError::RecordingError {
                message: format!(
                    "No recording found for request hash: {} (mode: Replay) in {}",
                    request_hash,
                    self.recordings_dir.display()
                ),
            }),
            (None, _) => {
                self.call_and_record(request, &recorded_request, &request_hash)
                    .await
            }
        }
    }

    fn name(&self) -> &str {
        "RecordingLLMClient"
    }

    fn model_info(&self) -> Option<String> {
        self.inner.model_info()
    }
}
