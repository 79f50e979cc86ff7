pub mod analysis;
pub mod coding;
pub mod config;
pub mod context;
pub mod conversation;
pub mod error;
pub mod orchestrator;
pub mod planning;
pub mod stage;

pub use analysis::AnalysisStage;
pub use coding::{CodingStage, DoneFiles};
pub use config::PipelineConfig;
pub use context::PipelineContext;
pub use conversation::Conversation;
pub use error::PipelineError;
pub use orchestrator::PipelineOrchestrator;
pub use planning::PlanningStage;
pub use stage::{Stage, StageKind};
