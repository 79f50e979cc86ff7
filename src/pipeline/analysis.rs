//! Analysis stage: one logic-analysis note per task-list file

use super::context::PipelineContext;
use super::error::PipelineError;
use super::stage::{Stage, StageKind};
use crate::llm::LLMRequest;
use crate::paper::PaperContent;
use crate::progress::ProgressEvent;
use crate::prompts;
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct AnalysisStage;

impl AnalysisStage {
    /// Writes a note for every non-config task-list file and returns their names
    pub async fn run(
        &self,
        context: &PipelineContext,
        paper: &PaperContent,
    ) -> Result<Vec<String>, PipelineError> {
        let config_file_name = context.config.config_file_name.as_str();
        let plan = context.store.read_task_plan().await?;
        let planning = context.store.read_planning().await?;

        let rendered = paper.render();
        let system = prompts::analysis_system(prompts::PAPER_FORMAT, config_file_name);
        let files: Vec<&str> = plan.work_items(config_file_name).collect();
        let total = files.len();

        for (index, file) in files.iter().enumerate() {
            info!("[{}] ({}/{}) {}", StageKind::Analysis.tag(), index + 1, total, file);
            context.emit(ProgressEvent::StepStarted {
                stage: StageKind::Analysis,
                index: index + 1,
                total,
                item: file.to_string(),
            });

            let instruction = prompts::analysis_instruction(
                &rendered,
                &planning,
                file,
                plan.seed_for(file),
                config_file_name,
            );
            let request = LLMRequest::exchange(system.as_str(), instruction);

            let note = context.chat(StageKind::Analysis, request).await?;
            let path = context.store.write_analysis_note(file, &note).await?;
            context.emit(ProgressEvent::ArtifactWritten { path });
        }

        Ok(files.into_iter().map(str::to_string).collect())
    }
}

#[async_trait]
impl Stage for AnalysisStage {
    fn kind(&self) -> StageKind {
        StageKind::Analysis
    }

    async fn execute(
        &self,
        context: &PipelineContext,
        paper: &PaperContent,
    ) -> Result<String, PipelineError> {
        let files = self.run(context, paper).await?;
        Ok(format!("Analysed {} file(s)", files.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{ArtifactStore, PlanningArtifact};
    use crate::llm::{MessageRole, MockLLMClient, MockResponse};
    use crate::pipeline::PipelineConfig;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn seed_planning(store: &ArtifactStore, task: &str) {
        store.write(PlanningArtifact::Overview, "OVERVIEW").await.unwrap();
        store.write(PlanningArtifact::Design, "DESIGN").await.unwrap();
        store.write(PlanningArtifact::Task, task).await.unwrap();
        store.write(PlanningArtifact::Config, "lr: 0.1").await.unwrap();
    }

    #[tokio::test]
    async fn test_each_file_gets_fresh_two_message_call() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        seed_planning(
            &store,
            r#"{"Task list": ["config.yaml", "model.py", "utils.py"],
                "Logic Analysis": [["model.py", "builds the network"]]}"#,
        )
        .await;

        let client = Arc::new(MockLLMClient::new());
        client.add_responses([MockResponse::text("NOTE A"), MockResponse::text("NOTE B")]);
        let context = PipelineContext::new(client.clone(), store.clone(), PipelineConfig::default());

        let files = AnalysisStage
            .run(&context, &PaperContent::new(json!({"title": "T"})))
            .await
            .unwrap();

        assert_eq!(files, vec!["model.py", "utils.py"]);
        assert_eq!(store.read_analysis_note("model.py").await.unwrap(), "NOTE A");
        assert_eq!(store.read_analysis_note("utils.py").await.unwrap(), "NOTE B");
        assert!(!store.analysis_note_path("config.yaml").unwrap().exists());

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert_eq!(request.messages.len(), 2);
            assert_eq!(request.messages[0].role, MessageRole::System);
        }
        assert!(requests[0].messages[1].content.contains("intended for 'builds the network'"));
        assert!(requests[1].messages[1]
            .content
            .contains("Write the logic analysis in 'utils.py'."));
    }

    #[tokio::test]
    async fn test_missing_task_artifact_is_fatal() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockLLMClient::new());
        let context = PipelineContext::new(
            client.clone(),
            ArtifactStore::new(dir.path()),
            PipelineConfig::default(),
        );

        let result = AnalysisStage.run(&context, &PaperContent::new(json!({}))).await;

        assert!(matches!(result, Err(PipelineError::Artifact(_))));
        assert_eq!(client.request_count(), 0);
    }
}
