use super::analysis::AnalysisStage;
use super::coding::CodingStage;
use super::context::PipelineContext;
use super::error::PipelineError;
use super::planning::PlanningStage;
use super::stage::{Stage, StageKind};
use crate::paper::PaperContent;
use crate::progress::ProgressEvent;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Runs Planning → Analysis → Coding against one output directory
pub struct PipelineOrchestrator {
    context: PipelineContext,
}

fn stage_for(kind: StageKind) -> &'static dyn Stage {
    match kind {
        StageKind::Planning => &PlanningStage,
        StageKind::Analysis => &AnalysisStage,
        StageKind::Coding => &CodingStage,
    }
}

impl PipelineOrchestrator {
    pub fn new(context: PipelineContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Full run; returns the coding stage's status line.
    ///
    /// Every artifact is regenerated, even when a previous run left one behind.
    pub async fn run(&self, input: &Path) -> Result<String, PipelineError> {
        self.run_stages(input, &StageKind::ALL).await
    }

    /// Runs the given stages in order against an existing output directory
    pub async fn run_stages(
        &self,
        input: &Path,
        stages: &[StageKind],
    ) -> Result<String, PipelineError> {
        let start = Instant::now();
        info!("Starting paper reproduction for: {}", input.display());
        self.context.emit(ProgressEvent::Started {
            input: input.display().to_string(),
        });

        let result = self.execute(input, stages).await;

        match &result {
            Ok(_) => self.context.emit(ProgressEvent::Completed {
                total_time: start.elapsed(),
            }),
            Err(e) => self.context.emit(ProgressEvent::Failed {
                error: e.to_string(),
            }),
        }
        result
    }

    async fn execute(&self, input: &Path, stages: &[StageKind]) -> Result<String, PipelineError> {
        let paper = PaperContent::load(input).await?;
        self.context.store.ensure_root().await?;

        let mut status = String::new();
        for &kind in stages {
            info!("Stage: {}", kind);
            self.context.emit(ProgressEvent::StageStarted { stage: kind });

            let stage_start = Instant::now();
            status = stage_for(kind).execute(&self.context, &paper).await?;

            self.context.emit(ProgressEvent::StageComplete {
                stage: kind,
                duration: stage_start.elapsed(),
            });
            debug!("Stage {} complete: {}", kind, status);
        }

        Ok(status)
    }
}
