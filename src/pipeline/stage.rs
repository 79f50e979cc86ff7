use super::context::PipelineContext;
use super::error::PipelineError;
use crate::paper::PaperContent;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Planning,
    Analysis,
    Coding,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [StageKind::Planning, StageKind::Analysis, StageKind::Coding];

    /// Upper-case tag used in step log lines, e.g. `[PLANNING] (1/4) ...`
    pub fn tag(self) -> &'static str {
        match self {
            StageKind::Planning => "PLANNING",
            StageKind::Analysis => "ANALYSIS",
            StageKind::Coding => "CODING",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Planning => "planning",
            StageKind::Analysis => "analysis",
            StageKind::Coding => "coding",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Runs the stage and returns a one-line summary
    async fn execute(
        &self,
        context: &PipelineContext,
        paper: &PaperContent,
    ) -> Result<String, PipelineError>;
}
