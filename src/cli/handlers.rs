//! Command handlers; each returns the process exit code

use super::commands::{RunArgs, SectionsArgs};
use crate::artifacts::ArtifactStore;
use crate::config::{Provider, ReprokitConfig};
use crate::llm::{LLMClient, RecordingLLMClient, RecordingMode};
use crate::paper::tex_to_json;
use crate::pipeline::{PipelineContext, PipelineError, PipelineOrchestrator, StageKind};
use crate::progress::LoggingHandler;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Applies CLI overrides on top of environment and file configuration
pub fn build_config(args: &RunArgs) -> Result<ReprokitConfig> {
    let mut config = ReprokitConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(provider) = args.backend {
        debug!("Provider explicitly set to: {}", provider);
        config.provider = provider;
        if args.model.is_none() {
            config.model = provider.default_model().to_string();
        }
    }
    if let Some(model) = &args.model {
        debug!("Model overridden to: {}", model);
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(dir) = &args.output_dir {
        config.output_directory = dir.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_backend_hints(provider: Provider) {
    eprintln!("\nPossible solutions:");
    match provider {
        Provider::Ollama => {
            eprintln!("  - Ensure Ollama is running: ollama serve");
            eprintln!("  - Check OLLAMA_HOST environment variable (default: http://localhost:11434)");
        }
        Provider::OpenAI => eprintln!("  - Set OPENAI_API_KEY environment variable"),
        Provider::Anthropic => eprintln!("  - Set ANTHROPIC_API_KEY environment variable"),
        Provider::Gemini => eprintln!("  - Set GEMINI_API_KEY environment variable"),
        Provider::Xai => eprintln!("  - Set XAI_API_KEY environment variable"),
        Provider::Groq => eprintln!("  - Set GROQ_API_KEY environment variable"),
    }
    eprintln!("  - Try a different provider: --backend openai, --backend anthropic, etc.");
}

fn create_client(config: &ReprokitConfig, record: Option<&Path>) -> Result<Arc<dyn LLMClient>> {
    let client = config.create_client().context("Failed to initialize backend")?;

    let Some(dir) = record else {
        return Ok(client);
    };

    let mode = RecordingMode::from_env(RecordingMode::Auto);
    let recording = RecordingLLMClient::new(client, mode, dir.to_path_buf())?;
    debug!("Recording enabled in {} (mode: {:?})", dir.display(), mode);
    Ok(Arc::new(recording))
}

/// Runs `stages` in order for the paper named in `args`
pub async fn handle_run(args: &RunArgs, stages: &[StageKind], quiet: bool) -> i32 {
    let config = match build_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("\nPlease check your environment variables, configuration file and command-line arguments.");
            return 1;
        }
    };

    let client = match create_client(&config, args.record.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            error!("{:#}", e);
            print_backend_hints(config.provider);
            return 1;
        }
    };

    info!(
        "Using backend: {} ({})",
        client.name(),
        client
            .model_info()
            .unwrap_or_else(|| config.model.clone())
    );

    let context = PipelineContext::new(
        client,
        ArtifactStore::new(&config.output_directory),
        config.pipeline.clone(),
    )
    .with_progress(Arc::new(LoggingHandler));
    let orchestrator = PipelineOrchestrator::new(context);

    match orchestrator.run_stages(&args.input, stages).await {
        Ok(status) => {
            if !quiet {
                if status.is_empty() {
                    println!(
                        "Artifacts written to {}",
                        config.output_directory.display()
                    );
                } else {
                    println!("{}", status);
                }
            }
            0
        }
        Err(e @ PipelineError::UnsupportedInput { .. }) => {
            error!("{}", e);
            1
        }
        Err(e) => {
            error!("Reproduction failed: {}", e);
            if matches!(e, PipelineError::Artifact(_)) && stages.first() != Some(&StageKind::Planning) {
                warn!("Artifacts from earlier stages are missing; run them first or use 'reprokit run'");
            }
            1
        }
    }
}

fn write_sections(args: &SectionsArgs) -> Result<()> {
    let markup = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let json = tex_to_json(&markup).context("Failed to serialize sections")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Sections written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn handle_sections(args: &SectionsArgs) -> i32 {
    match write_sections(args) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}
