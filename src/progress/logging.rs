//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { input } => {
                info!(input = %input, "Starting paper reproduction");
            }
            ProgressEvent::StageStarted { stage } => {
                info!(stage = %stage, "Starting stage");
            }
            ProgressEvent::StepStarted {
                stage,
                index,
                total,
                item,
            } => {
                debug!(
                    stage = %stage,
                    progress = format!("{}/{}", index, total),
                    item = %item,
                    "Step started"
                );
            }
            ProgressEvent::LlmRequestStarted { stage, messages } => {
                debug!(stage = %stage, messages, "Sending request to LLM");
            }
            ProgressEvent::LlmResponseReceived {
                stage,
                response_chars,
                response_time,
            } => {
                debug!(
                    stage = %stage,
                    response_chars,
                    response_time_ms = response_time.as_millis(),
                    "Received LLM response"
                );
            }
            ProgressEvent::ArtifactWritten { path } => {
                debug!(path = %path.display(), "Artifact written");
            }
            ProgressEvent::StageComplete { stage, duration } => {
                info!(
                    stage = %stage,
                    duration_ms = duration.as_millis(),
                    "Stage complete"
                );
            }
            ProgressEvent::Completed { total_time } => {
                info!(total_time_ms = total_time.as_millis(), "Reproduction complete");
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Reproduction failed");
            }
        }
    }
}
