//! Shared helpers for integration tests

#![allow(dead_code)]

use reprokit::llm::{MockLLMClient, MockResponse};
use reprokit::{ArtifactStore, PipelineConfig, PipelineContext, PipelineOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;

pub const MODEL_CODE: &str = "import torch\n\nclass TinyTransformer(torch.nn.Module):\n    pass";
pub const TRAIN_CODE: &str = "from model import TinyTransformer\n\ndef train():\n    model = TinyTransformer()";

pub const TASK_JSON: &str = r#"{
    "Required packages": ["torch==2.1.0"],
    "Required Other language third-party packages": ["No third-party dependencies required"],
    "Logic Analysis": [
        ["model.py", "TinyTransformer with one attention layer"],
        ["train.py", "Training loop using Adam"]
    ],
    "Task list": ["config.yaml", "model.py", "train.py"],
    "Full API spec": "",
    "Shared Knowledge": "Hyperparameters come from config.yaml",
    "Anything UNCLEAR": "Dataset version"
}"#;

pub const CONFIG_YAML: &str = "training:\n  learning_rate: 0.0003\n  batch_size: 32\n  epochs: 10";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/papers")
        .join(name)
}

pub fn planning_responses() -> Vec<MockResponse> {
    vec![
        MockResponse::text("Overall plan: implement the model, then train it."),
        MockResponse::text("[CONTENT]\n{\"File list\": [\"model.py\", \"train.py\"]}\n[/CONTENT]"),
        MockResponse::text(format!("Here is the breakdown.\n[CONTENT]\n{}\n[/CONTENT]\n", TASK_JSON)),
        MockResponse::text(format!("## Code: config.yaml\n```yaml\n{}\n```\n", CONFIG_YAML)),
    ]
}

pub fn analysis_responses() -> Vec<MockResponse> {
    vec![
        MockResponse::text("model.py: define TinyTransformer(d=64)."),
        MockResponse::text("train.py: loop over epochs with Adam."),
    ]
}

pub fn coding_responses() -> Vec<MockResponse> {
    vec![
        MockResponse::text(format!("## Code: model.py\n```python\n{}\n```\n", MODEL_CODE)),
        MockResponse::text(format!("## Code: train.py\n```python\n{}\n```\n", TRAIN_CODE)),
    ]
}

pub fn full_run_client() -> Arc<MockLLMClient> {
    let client = Arc::new(MockLLMClient::new());
    client.add_responses(planning_responses());
    client.add_responses(analysis_responses());
    client.add_responses(coding_responses());
    client
}

pub fn orchestrator(output: impl Into<PathBuf>, client: Arc<MockLLMClient>) -> PipelineOrchestrator {
    PipelineOrchestrator::new(PipelineContext::new(
        client,
        ArtifactStore::new(output),
        PipelineConfig::default(),
    ))
}
