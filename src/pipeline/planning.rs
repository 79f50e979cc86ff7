//! Planning stage
//!
//! Four round-trips over one growing conversation: overall plan, architecture
//! design, task breakdown, configuration file. Each step sees every earlier
//! request and the post-processed earlier answers.

use super::context::PipelineContext;
use super::conversation::Conversation;
use super::error::PipelineError;
use super::stage::{Stage, StageKind};
use crate::artifacts::{PlanningArtifact, PlanningArtifacts};
use crate::extract::{fenced_block, tagged_content};
use crate::paper::PaperContent;
use crate::progress::ProgressEvent;
use crate::prompts;
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Default, Clone, Copy)]
pub struct PlanningStage;

struct PlanStep {
    title: &'static str,
    artifact: PlanningArtifact,
    prompt: String,
}

/// Post-processing applied to a step's response before it is stored
fn process_response(artifact: PlanningArtifact, response: &str) -> String {
    let extracted = match artifact {
        PlanningArtifact::Overview | PlanningArtifact::Design => return response.to_string(),
        PlanningArtifact::Task => tagged_content(response),
        PlanningArtifact::Config => fenced_block(response, "yaml"),
    };

    if !extracted.is_found() {
        debug!(
            "No delimited payload in {} response; storing it verbatim",
            artifact.file_name()
        );
    }
    extracted.into_string()
}

impl PlanningStage {
    pub async fn run(
        &self,
        context: &PipelineContext,
        paper: &PaperContent,
    ) -> Result<PlanningArtifacts, PipelineError> {
        let config = &context.config;
        let steps = [
            PlanStep {
                title: "Overall plan",
                artifact: PlanningArtifact::Overview,
                prompt: prompts::overall_plan(&paper.render()),
            },
            PlanStep {
                title: "Architecture design",
                artifact: PlanningArtifact::Design,
                prompt: config.file_list_msg.clone(),
            },
            PlanStep {
                title: "Logic design",
                artifact: PlanningArtifact::Task,
                prompt: config.task_list_msg.clone(),
            },
            PlanStep {
                title: "Configuration file generation",
                artifact: PlanningArtifact::Config,
                prompt: config.config_msg.clone(),
            },
        ];

        let total = steps.len();
        let mut conversation = Conversation::new(prompts::planning_system(prompts::PAPER_FORMAT));
        let mut output = PlanningArtifacts::default();

        for (index, step) in steps.into_iter().enumerate() {
            info!("[{}] ({}/{}) {}", StageKind::Planning.tag(), index + 1, total, step.title);
            context.emit(ProgressEvent::StepStarted {
                stage: StageKind::Planning,
                index: index + 1,
                total,
                item: step.title.to_string(),
            });

            conversation.push_user(step.prompt);
            let response = context
                .chat(StageKind::Planning, conversation.to_request())
                .await?;

            let processed = process_response(step.artifact, &response);
            let path = context.store.write(step.artifact, &processed).await?;
            context.emit(ProgressEvent::ArtifactWritten { path });

            match step.artifact {
                PlanningArtifact::Overview => output.overview = processed.clone(),
                PlanningArtifact::Design => output.design = processed.clone(),
                PlanningArtifact::Task => output.task = processed.clone(),
                PlanningArtifact::Config => output.config = processed.clone(),
            }
            conversation.push_assistant(processed);
        }

        Ok(output)
    }
}

#[async_trait]
impl Stage for PlanningStage {
    fn kind(&self) -> StageKind {
        StageKind::Planning
    }

    async fn execute(
        &self,
        context: &PipelineContext,
        paper: &PaperContent,
    ) -> Result<String, PipelineError> {
        self.run(context, paper).await?;
        Ok(format!(
            "Planning artifacts written to {}",
            context.store.root().display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactStore;
    use crate::llm::{MessageRole, MockLLMClient, MockResponse};
    use crate::pipeline::PipelineConfig;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(dir: &TempDir, client: Arc<MockLLMClient>) -> PipelineContext {
        PipelineContext::new(
            client,
            ArtifactStore::new(dir.path()),
            PipelineConfig::new().with_planning_messages("FILES?", "TASKS?", "CONFIG?"),
        )
    }

    #[test]
    fn test_process_response() {
        assert_eq!(
            process_response(PlanningArtifact::Overview, "  raw  "),
            "  raw  "
        );
        assert_eq!(
            process_response(PlanningArtifact::Task, "x\n[CONTENT]\n{}\n[/CONTENT]"),
            "{}"
        );
        assert_eq!(
            process_response(PlanningArtifact::Config, "```yaml\na: 1\n```"),
            "a: 1"
        );
        assert_eq!(
            process_response(PlanningArtifact::Config, "a: 1"),
            "a: 1"
        );
    }

    #[tokio::test]
    async fn test_conversation_carries_processed_answers() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockLLMClient::new());
        client.add_responses([
            MockResponse::text("PLAN"),
            MockResponse::text("DESIGN"),
            MockResponse::text("noise\n[CONTENT]\nTASK\n[/CONTENT]\ntrailer"),
            MockResponse::text("```yaml\nlr: 1\n```"),
        ]);

        let paper = PaperContent::new(json!({"title": "T"}));
        let output = PlanningStage
            .run(&context(&dir, client.clone()), &paper)
            .await
            .unwrap();

        assert_eq!(output.task, "TASK");
        assert_eq!(output.config, "lr: 1");

        let requests = client.requests();
        assert_eq!(requests.len(), 4);
        let sizes: Vec<usize> = requests.iter().map(|r| r.messages.len()).collect();
        assert_eq!(sizes, vec![2, 4, 6, 8]);

        let last = &requests[3].messages;
        assert_eq!(last[0].role, MessageRole::System);
        assert!(last[1].content.contains("\"title\": \"T\""));
        assert_eq!(last[2].content, "PLAN");
        assert_eq!(last[3].content, "FILES?");
        assert_eq!(last[5].content, "TASKS?");
        assert_eq!(last[6].role, MessageRole::Assistant);
        assert_eq!(last[6].content, "TASK");
        assert_eq!(last[7].content, "CONFIG?");
    }

    #[tokio::test]
    async fn test_failure_stops_after_completed_steps() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::text("PLAN"));

        let paper = PaperContent::new(json!({}));
        let result = PlanningStage.run(&context(&dir, client), &paper).await;

        assert!(matches!(result, Err(PipelineError::Model { .. })));
        assert!(dir.path().join("planning_overview.txt").exists());
        assert!(!dir.path().join("planning_design.txt").exists());
    }
}
