//! Coding stage
//!
//! Generates one source file per task-list entry, in order. The prompt for each
//! file embeds the code produced earlier in the same run.

use super::context::PipelineContext;
use super::error::PipelineError;
use super::stage::{Stage, StageKind};
use crate::extract::code_block;
use crate::llm::LLMRequest;
use crate::paper::PaperContent;
use crate::progress::ProgressEvent;
use crate::prompts::{self, CodingPrompt};
use async_trait::async_trait;
use tracing::{debug, info};

/// Files completed during one coding run, in completion order.
///
/// Starts with the configuration file, which has a name but no generated content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoneFiles {
    entries: Vec<(String, Option<String>)>,
}

impl DoneFiles {
    pub fn new(config_file_name: impl Into<String>) -> Self {
        Self {
            entries: vec![(config_file_name.into(), None)],
        }
    }

    pub fn push(&mut self, file: impl Into<String>, code: impl Into<String>) {
        self.entries.push((file.into(), Some(code.into())));
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Generated `(file, code)` pairs, config file excluded
    pub fn sources(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(name, code)| code.as_deref().map(|code| (name.as_str(), code)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CodingStage;

impl CodingStage {
    /// Generates every non-config task-list file and returns the status line
    pub async fn run(
        &self,
        context: &PipelineContext,
        paper: &PaperContent,
    ) -> Result<String, PipelineError> {
        let config = &context.config;
        let config_file_name = config.config_file_name.as_str();
        let plan = context.store.read_task_plan().await?;
        let planning = context.store.read_planning().await?;

        let rendered = paper.render();
        let system = prompts::coding_system(prompts::PAPER_FORMAT, config_file_name);
        let files: Vec<&str> = plan.work_items(config_file_name).collect();
        let total = files.len();
        let mut done = DoneFiles::new(config_file_name);

        for (index, file) in files.iter().copied().enumerate() {
            info!("[{}] ({}/{}) {}", StageKind::Coding.tag(), index + 1, total, file);
            context.emit(ProgressEvent::StepStarted {
                stage: StageKind::Coding,
                index: index + 1,
                total,
                item: file.to_string(),
            });

            let analysis = context.store.read_analysis_note(file).await?;

            let instruction = {
                let done_names = done.names();
                let done_sources = done.sources();
                prompts::coding_instruction(&CodingPrompt {
                    paper: &rendered,
                    planning: &planning,
                    done_names: &done_names,
                    done_sources: &done_sources,
                    file,
                    analysis: &analysis,
                    language: &config.code_language,
                    config_file_name,
                })
            };
            let request = LLMRequest::exchange(system.as_str(), instruction);

            let response = context.chat(StageKind::Coding, request).await?;
            let extracted = code_block(&response, &config.code_language);
            if !extracted.is_found() {
                debug!("No {} block in response for {}; using it verbatim", config.code_language, file);
            }
            let code = extracted.into_string();

            done.push(file, code.as_str());
            let path = context.store.write_source(file, &code).await?;
            context.emit(ProgressEvent::ArtifactWritten { path });
        }

        Ok(format!(
            "Source code generated successfully in path: {}.",
            context.store.code_dir().display()
        ))
    }
}

#[async_trait]
impl Stage for CodingStage {
    fn kind(&self) -> StageKind {
        StageKind::Coding
    }

    async fn execute(
        &self,
        context: &PipelineContext,
        paper: &PaperContent,
    ) -> Result<String, PipelineError> {
        self.run(context, paper).await
    }
}
