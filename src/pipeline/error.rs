use super::stage::StageKind;
use crate::artifacts::ArtifactError;
use crate::llm::BackendError;
use crate::paper::PaperError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported input file '{}': expected a .tex or .json document", path.display())]
    UnsupportedInput { path: PathBuf },

    #[error(transparent)]
    Paper(PaperError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Model call failed during {stage} stage: {source}")]
    Model {
        stage: StageKind,
        #[source]
        source: BackendError,
    },
}

impl From<PaperError> for PipelineError {
    fn from(err: PaperError) -> Self {
        match err {
            PaperError::UnsupportedFormat { path } => PipelineError::UnsupportedInput { path },
            other => PipelineError::Paper(other),
        }
    }
}
