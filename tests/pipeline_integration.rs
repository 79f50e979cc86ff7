//! Pipeline integration tests
//!
//! Drive all three stages with a scripted model and check the files left in the
//! output directory, plus the prompts the model received.

mod support;

use reprokit::llm::{MessageRole, MockLLMClient, MockResponse, RecordingLLMClient, RecordingMode};
use reprokit::pipeline::{PipelineError, StageKind};
use reprokit::{ArtifactStore, PipelineConfig, PipelineContext, PipelineOrchestrator};
use std::fs;
use std::sync::Arc;
use support::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_full_run_writes_every_artifact() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let client = full_run_client();

    let status = orchestrator(&out, client.clone())
        .run(&fixture("tiny_transformer.json"))
        .await
        .unwrap();

    assert_eq!(
        status,
        format!(
            "Source code generated successfully in path: {}.",
            out.join("code").display()
        )
    );
    assert_eq!(client.request_count(), 8);
    assert_eq!(client.remaining_responses(), 0);

    assert_eq!(
        fs::read_to_string(out.join("planning_overview.txt")).unwrap(),
        "Overall plan: implement the model, then train it."
    );
    // Design is stored verbatim, delimiters included
    assert!(fs::read_to_string(out.join("planning_design.txt"))
        .unwrap()
        .starts_with("[CONTENT]\n"));
    assert_eq!(
        fs::read_to_string(out.join("planning_task.json")).unwrap(),
        TASK_JSON
    );
    assert_eq!(
        fs::read_to_string(out.join("planning_config.yaml")).unwrap(),
        CONFIG_YAML
    );

    assert!(out.join("model.py_simple_analysis.txt").is_file());
    assert!(out.join("train.py_simple_analysis.txt").is_file());
    assert!(!out.join("config.yaml_simple_analysis.txt").exists());

    assert_eq!(fs::read_to_string(out.join("code/model.py")).unwrap(), MODEL_CODE);
    assert_eq!(fs::read_to_string(out.join("code/train.py")).unwrap(), TRAIN_CODE);
    assert!(!out.join("code/config.yaml").exists());
}

#[tokio::test]
async fn test_coding_prompts_accumulate_done_files() {
    let dir = TempDir::new().unwrap();
    let client = full_run_client();

    orchestrator(dir.path(), client.clone())
        .run(&fixture("tiny_transformer.json"))
        .await
        .unwrap();

    let requests = client.requests();
    let model_prompt = &requests[6].messages[1].content;
    let train_prompt = &requests[7].messages[1].content;

    assert!(model_prompt.contains("We have ['config.yaml']."));
    assert!(model_prompt.contains("you must write only the \"model.py\""));
    assert!(!model_prompt.contains("class TinyTransformer"));
    assert!(!model_prompt.contains(TRAIN_CODE));
    assert!(model_prompt.contains("model.py: define TinyTransformer(d=64)."));

    assert!(train_prompt.contains("We have ['config.yaml', 'model.py']."));
    assert!(train_prompt.contains(&format!("```python\n{}\n```", MODEL_CODE)));
    assert!(train_prompt.contains("train.py: loop over epochs with Adam."));

    // Config content reaches coding prompts only through the configuration section
    assert!(train_prompt.contains(&format!("```yaml\n{}\n```", CONFIG_YAML)));
}

#[tokio::test]
async fn test_planning_conversation_and_stage_isolation() {
    let dir = TempDir::new().unwrap();
    let client = full_run_client();

    orchestrator(dir.path(), client.clone())
        .run(&fixture("tiny_transformer.json"))
        .await
        .unwrap();

    let requests = client.requests();

    let planning_sizes: Vec<usize> = requests[..4].iter().map(|r| r.messages.len()).collect();
    assert_eq!(planning_sizes, vec![2, 4, 6, 8]);
    let config_step = &requests[3].messages;
    assert_eq!(config_step[6].role, MessageRole::Assistant);
    assert_eq!(config_step[6].content, TASK_JSON);
    assert!(config_step[1].content.contains("\"title\": \"A Tiny Transformer\""));

    // Analysis and coding calls are fresh two-message exchanges
    for request in &requests[4..] {
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
    }
    assert!(requests[4].messages[1]
        .content
        .contains("which is intended for 'TinyTransformer with one attention layer'"));
    assert!(requests[4].messages[1]
        .content
        .ends_with("## Logic Analysis: model.py"));
}

#[tokio::test]
async fn test_tex_input_is_split_into_sections() {
    let dir = TempDir::new().unwrap();
    let client = full_run_client();

    orchestrator(dir.path(), client.clone())
        .run(&fixture("tiny_transformer.tex"))
        .await
        .unwrap();

    let first = &client.requests()[0].messages[1].content;
    assert!(first.contains("\"type\": \"\\\\section\""));
    assert!(first.contains("\"label\": \"sec:method\""));
    assert!(first.contains("\"title\": \"Training details\""));
}

#[tokio::test]
async fn test_rerun_regenerates_everything() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("planning_overview.txt"), "stale plan").unwrap();

    let client = full_run_client();
    orchestrator(dir.path(), client.clone())
        .run(&fixture("tiny_transformer.json"))
        .await
        .unwrap();

    assert_eq!(client.request_count(), 8);
    assert_ne!(
        fs::read_to_string(dir.path().join("planning_overview.txt")).unwrap(),
        "stale plan"
    );
}

#[tokio::test]
async fn test_unsupported_input_makes_no_model_calls() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("paper.docx");
    fs::write(&input, "binary").unwrap();

    let client = Arc::new(MockLLMClient::new());
    let result = orchestrator(dir.path().join("out"), client.clone())
        .run(&input)
        .await;

    assert!(matches!(result, Err(PipelineError::UnsupportedInput { .. })));
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_model_failure_stops_pipeline() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(MockLLMClient::new());
    client.add_responses(planning_responses());
    client.add_response(MockResponse::text("model.py analysis"));
    // Queue runs dry on the second analysis call

    let result = orchestrator(dir.path(), client.clone())
        .run(&fixture("tiny_transformer.json"))
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::Model {
            stage: StageKind::Analysis,
            ..
        })
    ));
    assert!(dir.path().join("model.py_simple_analysis.txt").exists());
    assert!(!dir.path().join("train.py_simple_analysis.txt").exists());
    assert!(!dir.path().join("code").exists());
}

#[tokio::test]
async fn test_coding_alone_needs_analysis_notes() {
    let dir = TempDir::new().unwrap();
    let planner = Arc::new(MockLLMClient::new());
    planner.add_responses(planning_responses());
    orchestrator(dir.path(), planner)
        .run_stages(&fixture("tiny_transformer.json"), &[StageKind::Planning])
        .await
        .unwrap();

    let coder = Arc::new(MockLLMClient::new());
    coder.add_responses(coding_responses());
    let result = orchestrator(dir.path(), coder.clone())
        .run_stages(&fixture("tiny_transformer.json"), &[StageKind::Coding])
        .await;

    assert!(matches!(result, Err(PipelineError::Artifact(_))));
    assert_eq!(coder.request_count(), 0);
}

#[tokio::test]
async fn test_stages_can_run_separately() {
    let dir = TempDir::new().unwrap();
    let paper = fixture("tiny_transformer.json");

    for (stage, responses) in [
        (StageKind::Planning, planning_responses()),
        (StageKind::Analysis, analysis_responses()),
        (StageKind::Coding, coding_responses()),
    ] {
        let client = Arc::new(MockLLMClient::new());
        client.add_responses(responses);
        orchestrator(dir.path(), client)
            .run_stages(&paper, &[stage])
            .await
            .unwrap();
    }

    assert_eq!(
        fs::read_to_string(dir.path().join("code/train.py")).unwrap(),
        TRAIN_CODE
    );
}

#[tokio::test]
async fn test_custom_config_file_name_is_skipped() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(MockLLMClient::new());
    client.add_responses([
        MockResponse::text("plan"),
        MockResponse::text("design"),
        MockResponse::text("[CONTENT]\n{\"Task list\": [\"settings.yaml\", \"main.py\"]}\n[/CONTENT]"),
        MockResponse::text("```yaml\nseed: 1\n```"),
        MockResponse::text("main.py analysis"),
        MockResponse::text("```python\nprint('hi')\n```"),
    ]);

    let context = PipelineContext::new(
        client.clone(),
        ArtifactStore::new(dir.path()),
        PipelineConfig::new().with_config_file_name("settings.yaml"),
    );
    PipelineOrchestrator::new(context)
        .run(&fixture("tiny_transformer.json"))
        .await
        .unwrap();

    assert_eq!(client.request_count(), 6);
    assert!(!dir.path().join("settings.yaml_simple_analysis.txt").exists());
    assert!(client.requests()[5].messages[1]
        .content
        .contains("We have ['settings.yaml']."));
}

#[tokio::test]
async fn test_recorded_run_replays_without_model() {
    let dir = TempDir::new().unwrap();
    let recordings = dir.path().join("recordings");

    let live = full_run_client();
    let recorder =
        RecordingLLMClient::new(live, RecordingMode::Record, recordings.clone()).unwrap();
    PipelineOrchestrator::new(PipelineContext::new(
        Arc::new(recorder),
        ArtifactStore::new(dir.path().join("first")),
        PipelineConfig::default(),
    ))
    .run(&fixture("tiny_transformer.json"))
    .await
    .unwrap();

    let empty = Arc::new(MockLLMClient::new());
    let replayer =
        RecordingLLMClient::new(empty.clone(), RecordingMode::Replay, recordings).unwrap();
    PipelineOrchestrator::new(PipelineContext::new(
        Arc::new(replayer),
        ArtifactStore::new(dir.path().join("second")),
        PipelineConfig::default(),
    ))
    .run(&fixture("tiny_transformer.json"))
    .await
    .unwrap();

    assert_eq!(empty.request_count(), 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("second/code/train.py")).unwrap(),
        TRAIN_CODE
    );
}

#[tokio::test]
async fn test_nested_and_flat_task_entries_keep_their_own_notes() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(MockLLMClient::new());
    client.add_responses([
        MockResponse::text("plan"),
        MockResponse::text("design"),
        MockResponse::text("[CONTENT]\n{\"Task list\": [\"a/b.py\", \"a_b.py\"]}\n[/CONTENT]"),
        MockResponse::text("```yaml\nseed: 1\n```"),
        MockResponse::text("NOTE FOR a/b.py"),
        MockResponse::text("NOTE FOR a_b.py"),
        MockResponse::text("```python\nnested = True\n```"),
        MockResponse::text("```python\nflat = True\n```"),
    ]);

    orchestrator(dir.path(), client.clone())
        .run(&fixture("tiny_transformer.json"))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("a/b.py_simple_analysis.txt")).unwrap(),
        "NOTE FOR a/b.py"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("a_b.py_simple_analysis.txt")).unwrap(),
        "NOTE FOR a_b.py"
    );

    let requests = client.requests();
    let nested_prompt = &requests[6].messages[1].content;
    assert!(nested_prompt.contains("NOTE FOR a/b.py"));
    assert!(!nested_prompt.contains("NOTE FOR a_b.py"));
    assert_eq!(
        fs::read_to_string(dir.path().join("code/a/b.py")).unwrap(),
        "nested = True"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("code/a_b.py")).unwrap(),
        "flat = True"
    );
}
