//! Progress handler trait and events

use crate::pipeline::StageKind;
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a paper is being reproduced
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { input: String },

    /// Stage started
    StageStarted { stage: StageKind },

    /// One unit of work inside a stage (a planning step or a task-list file)
    StepStarted {
        stage: StageKind,
        index: usize,
        total: usize,
        item: String,
    },

    /// LLM request started
    LlmRequestStarted { stage: StageKind, messages: usize },

    /// LLM response received
    LlmResponseReceived {
        stage: StageKind,
        response_chars: usize,
        response_time: Duration,
    },

    /// Artifact persisted to the output directory
    ArtifactWritten { path: PathBuf },

    /// Stage completed
    StageComplete { stage: StageKind, duration: Duration },

    /// Run completed successfully
    Completed { total_time: Duration },

    /// Run failed
    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
