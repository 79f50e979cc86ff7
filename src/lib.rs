//! reprokit - reproduce research papers with an LLM
//!
//! A paper (TeX source or JSON) goes through three sequential stages, each
//! handing its results to the next through files in one output directory:
//!
//! 1. **Planning**: a four-turn conversation producing an overall plan, an
//!    architecture design, a task list with per-file notes, and a YAML config.
//! 2. **Analysis**: one logic-analysis note per task-list file.
//! 3. **Coding**: one source file per task-list file, each prompt carrying the
//!    code generated before it.
//!
//! # Example
//!
//! ```no_run
//! use reprokit::{ArtifactStore, PipelineConfig, PipelineContext, PipelineOrchestrator, ReprokitConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReprokitConfig::load(None)?;
//! let client = config.create_client()?;
//!
//! let context = PipelineContext::new(
//!     client,
//!     ArtifactStore::new(&config.output_directory),
//!     PipelineConfig::default(),
//! );
//! let status = PipelineOrchestrator::new(context)
//!     .run(Path::new("paper.json"))
//!     .await?;
//! println!("{}", status);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod paper;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod util;

pub use artifacts::{ArtifactError, ArtifactStore, PlanningArtifact, PlanningArtifacts, TaskPlan};
pub use config::{ConfigError, Provider, ReprokitConfig};
pub use extract::Extracted;
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient, RecordingLLMClient};
pub use paper::{extract_sections, InputFormat, PaperContent, PaperError, Section};
pub use pipeline::{
    PipelineConfig, PipelineContext, PipelineError, PipelineOrchestrator, StageKind,
};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use util::{init_logging, init_with, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
