//! Configuration management for reprokit
//!
//! Settings are loaded from environment variables with sensible defaults, then
//! optionally overlaid with a YAML file. CLI flags are applied last by the
//! command handlers.
//!
//! # Environment Variables
//!
//! - `REPROKIT_PROVIDER`: ollama|openai|anthropic|gemini|xai|groq - default: "ollama"
//! - `REPROKIT_MODEL`: model name - default: "qwen2.5-coder:7b" for Ollama
//! - `REPROKIT_REQUEST_TIMEOUT`: per-request timeout in seconds - default: "600"
//! - `REPROKIT_OUTPUT_DIR`: artifact directory - default: "./output"
//! - `REPROKIT_CONFIG`: YAML file to overlay
//!
//! Logging (`REPROKIT_LOG_LEVEL`, `REPROKIT_LOG_JSON`) is set up by the binary
//! before any configuration is loaded and is not part of this file.
//!
//! Provider credentials are read by genai itself (`OPENAI_API_KEY`,
//! `ANTHROPIC_API_KEY`, `OLLAMA_HOST`, ...).
//!
//! # YAML file
//!
//! ```yaml
//! provider: anthropic
//! model: claude-sonnet-4-5
//! request_timeout_secs: 900
//! output_directory: runs/attention
//! config_file_name: config.yaml
//! code_language: python
//! file_list_msg: |
//!   ...
//! ```

use crate::llm::{BackendError, GenAIClient, LLMClient};
use crate::pipeline::PipelineConfig;
use genai::adapter::AdapterKind;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_XAI_MODEL: &str = "grok-3-mini";
const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Environment variable naming a YAML configuration file
pub const CONFIG_PATH_ENV: &str = "REPROKIT_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: ollama, openai, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for this schema
    #[error("Failed to parse configuration file {}: {source}", path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(#[from] BackendError),
}

/// Model provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAI,
    Anthropic,
    Gemini,
    Xai,
    Groq,
}

impl Provider {
    pub fn adapter_kind(self) -> AdapterKind {
        match self {
            Provider::Ollama => AdapterKind::Ollama,
            Provider::OpenAI => AdapterKind::OpenAI,
            Provider::Anthropic => AdapterKind::Anthropic,
            Provider::Gemini => AdapterKind::Gemini,
            Provider::Xai => AdapterKind::Xai,
            Provider::Groq => AdapterKind::Groq,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Ollama => DEFAULT_OLLAMA_MODEL,
            Provider::OpenAI => DEFAULT_OPENAI_MODEL,
            Provider::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::Xai => DEFAULT_XAI_MODEL,
            Provider::Groq => DEFAULT_GROQ_MODEL,
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAI),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" => Ok(Provider::Gemini),
            "xai" | "grok" => Ok(Provider::Xai),
            "groq" => Ok(Provider::Groq),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Ollama => "ollama",
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Xai => "xai",
            Provider::Groq => "groq",
        };
        f.write_str(name)
    }
}

/// On-disk overlay; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    provider: Option<String>,
    model: Option<String>,
    request_timeout_secs: Option<u64>,
    output_directory: Option<PathBuf>,
    file_list_msg: Option<String>,
    task_list_msg: Option<String>,
    config_msg: Option<String>,
    config_file_name: Option<String>,
    code_language: Option<String>,
}

/// Main configuration structure for reprokit
#[derive(Debug, Clone)]
pub struct ReprokitConfig {
    pub provider: Provider,

    /// Model name to use for inference (provider-specific)
    pub model: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Directory receiving every artifact
    pub output_directory: PathBuf,

    /// Prompt fragments and naming passed to the stages
    pub pipeline: PipelineConfig,
}

impl Default for ReprokitConfig {
    /// Loads from `REPROKIT_*` environment variables, falling back to defaults
    fn default() -> Self {
        let provider = env::var("REPROKIT_PROVIDER")
            .ok()
            .and_then(|s| s.parse::<Provider>().ok())
            .unwrap_or(Provider::Ollama);

        let model = env::var("REPROKIT_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let request_timeout_secs = env::var("REPROKIT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let output_directory = env::var("REPROKIT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Self {
            provider,
            model,
            request_timeout_secs,
            output_directory,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ReprokitConfig {
    /// Environment defaults overlaid with the YAML file at `path`, or the one named by
    /// `REPROKIT_CONFIG`, or `<config dir>/reprokit/config.yaml` when it exists
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(file) = Self::resolve_file(path) {
            config.apply_file(&file)?;
        }
        Ok(config)
    }

    fn resolve_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("reprokit").join("config.yaml"))
            .filter(|path| path.is_file())
    }

    /// Overlays the keys present in a YAML file
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = if raw.trim().is_empty() {
            FileConfig::default()
        } else {
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::FileParse {
                path: path.to_path_buf(),
                source,
            })?
        };
        debug!("Loaded configuration overlay from {}", path.display());

        if let Some(provider) = file.provider {
            self.provider = provider.parse()?;
            if file.model.is_none() {
                self.model = self.provider.default_model().to_string();
            }
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(timeout) = file.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(dir) = file.output_directory {
            self.output_directory = dir;
        }

        let pipeline = &mut self.pipeline;
        if let Some(msg) = file.file_list_msg {
            pipeline.file_list_msg = msg;
        }
        if let Some(msg) = file.task_list_msg {
            pipeline.task_list_msg = msg;
        }
        if let Some(msg) = file.config_msg {
            pipeline.config_msg = msg;
        }
        if let Some(name) = file.config_file_name {
            pipeline.config_file_name = name;
        }
        if let Some(language) = file.code_language {
            pipeline.code_language = language;
        }
        Ok(())
    }

    /// Validates the configuration
    ///
    /// Provider credentials are checked by genai on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        let pipeline = &self.pipeline;
        for (name, value) in [
            ("file_list_msg", &pipeline.file_list_msg),
            ("task_list_msg", &pipeline.task_list_msg),
            ("config_msg", &pipeline.config_msg),
            ("config_file_name", &pipeline.config_file_name),
            ("code_language", &pipeline.code_language),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Creates the genai-backed client for the configured provider
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let client = GenAIClient::new(
            self.provider.adapter_kind(),
            self.model.clone(),
            self.request_timeout(),
        )?;
        Ok(Arc::new(client))
    }
}

impl fmt::Display for ReprokitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reprokit Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Output Directory: {}", self.output_directory.display())?;
        writeln!(f, "  Config File Name: {}", self.pipeline.config_file_name)?;
        writeln!(f, "  Code Language: {}", self.pipeline.code_language)?;
        Ok(())
    }
}
