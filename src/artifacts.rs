//! Artifact store
//!
//! Stages hand work to each other through whole files in one output directory:
//!
//! | file | written by | content |
//! |---|---|---|
//! | `planning_overview.txt` | planning | overall plan |
//! | `planning_design.txt` | planning | file list, interfaces, call flow |
//! | `planning_task.json` | planning | task list + logic-analysis seeds |
//! | `planning_config.yaml` | planning | reproduction configuration |
//! | `<file>_simple_analysis.txt` | analysis | per-file logic analysis |
//! | `code/<file>` | coding | generated source |
//!
//! Every write replaces the previous content. Reads return the exact bytes written.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Subdirectory holding generated sources
pub const CODE_DIR: &str = "code";

const ANALYSIS_SUFFIX: &str = "_simple_analysis.txt";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write artifact {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Task artifact {} is malformed: {message}", path.display())]
    MalformedTask { path: PathBuf, message: String },

    #[error("Refusing to write outside the output directory: '{name}'")]
    InvalidFileName { name: String },
}

/// The four planning artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningArtifact {
    Overview,
    Design,
    Task,
    Config,
}

impl PlanningArtifact {
    pub const ALL: [PlanningArtifact; 4] = [
        PlanningArtifact::Overview,
        PlanningArtifact::Design,
        PlanningArtifact::Task,
        PlanningArtifact::Config,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            PlanningArtifact::Overview => "planning_overview.txt",
            PlanningArtifact::Design => "planning_design.txt",
            PlanningArtifact::Task => "planning_task.json",
            PlanningArtifact::Config => "planning_config.yaml",
        }
    }
}

/// Contents of all planning artifacts, read back for later prompts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanningArtifacts {
    pub overview: String,
    pub design: String,
    pub task: String,
    pub config: String,
}

/// Task list and logic-analysis seeds parsed from the task artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPlan {
    /// Files to analyse and generate, in order
    pub task_list: Vec<String>,
    /// Seed description per file
    pub logic_analysis: HashMap<String, String>,
}

impl TaskPlan {
    /// Parses the task artifact text (JSON, or YAML as a fallback)
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(json_err) => {
                let yaml: serde_yaml::Value = serde_yaml::from_str(text)
                    .map_err(|_| format!("not valid JSON ({})", json_err))?;
                serde_json::to_value(yaml).map_err(|e| e.to_string())?
            }
        };

        if !value.is_object() {
            return Err("expected an object with \"Task list\" and \"Logic Analysis\"".into());
        }

        let task_list = match value.get("Task list") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item.as_str() {
                    Some(name) => Some(name.to_string()),
                    None => {
                        warn!("Ignoring non-string task list entry: {}", item);
                        None
                    }
                })
                .collect(),
            Some(other) => return Err(format!("\"Task list\" is not a list: {}", other)),
            None => Vec::new(),
        };

        let mut logic_analysis = HashMap::new();
        if let Some(Value::Array(entries)) = value.get("Logic Analysis") {
            for entry in entries {
                let pair = entry.as_array().map(Vec::as_slice).unwrap_or_default();
                match pair {
                    [Value::String(name), rest @ ..] => {
                        let seed = rest.first().and_then(Value::as_str).unwrap_or_default();
                        logic_analysis.insert(name.clone(), seed.to_string());
                    }
                    _ => warn!("Ignoring malformed logic analysis entry: {}", entry),
                }
            }
        }

        Ok(Self {
            task_list,
            logic_analysis,
        })
    }

    /// Seed text for `file`, empty when none was given
    pub fn seed_for(&self, file: &str) -> &str {
        self.logic_analysis
            .get(file)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Task-list entries that need work, i.e. everything but the config file
    pub fn work_items<'a>(&'a self, config_file_name: &'a str) -> impl Iterator<Item = &'a str> {
        self.task_list
            .iter()
            .map(String::as_str)
            .filter(move |name| *name != config_file_name)
    }
}

/// File-backed store rooted at the output directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<(), ArtifactError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| ArtifactError::Write {
                path: self.root.clone(),
                source,
            })
    }

    pub fn path(&self, artifact: PlanningArtifact) -> PathBuf {
        self.root.join(artifact.file_name())
    }

    pub async fn read(&self, artifact: PlanningArtifact) -> Result<String, ArtifactError> {
        read_file(&self.path(artifact)).await
    }

    pub async fn write(
        &self,
        artifact: PlanningArtifact,
        contents: &str,
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.path(artifact);
        write_file(&path, contents).await?;
        Ok(path)
    }

    pub async fn read_planning(&self) -> Result<PlanningArtifacts, ArtifactError> {
        Ok(PlanningArtifacts {
            overview: self.read(PlanningArtifact::Overview).await?,
            design: self.read(PlanningArtifact::Design).await?,
            task: self.read(PlanningArtifact::Task).await?,
            config: self.read(PlanningArtifact::Config).await?,
        })
    }

    pub async fn read_task_plan(&self) -> Result<TaskPlan, ArtifactError> {
        let path = self.path(PlanningArtifact::Task);
        let text = read_file(&path).await?;
        let plan =
            TaskPlan::parse(&text).map_err(|message| ArtifactError::MalformedTask {
                path: path.clone(),
                message,
            })?;
        debug!(
            "Task plan from {}: {} files, {} seeds",
            path.display(),
            plan.task_list.len(),
            plan.logic_analysis.len()
        );
        Ok(plan)
    }

    /// `model/net.py` → `<root>/model/net.py_simple_analysis.txt`
    pub fn analysis_note_path(&self, file: &str) -> Result<PathBuf, ArtifactError> {
        let relative = checked_relative(file)?;
        let mut name = relative.as_os_str().to_os_string();
        name.push(ANALYSIS_SUFFIX);
        Ok(self.root.join(name))
    }

    pub async fn read_analysis_note(&self, file: &str) -> Result<String, ArtifactError> {
        read_file(&self.analysis_note_path(file)?).await
    }

    pub async fn write_analysis_note(
        &self,
        file: &str,
        contents: &str,
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.analysis_note_path(file)?;
        write_nested(&path, contents).await?;
        Ok(path)
    }

    pub fn code_dir(&self) -> PathBuf {
        self.root.join(CODE_DIR)
    }

    /// Destination for a generated file; rejects absolute paths and `..`
    pub fn source_path(&self, file: &str) -> Result<PathBuf, ArtifactError> {
        Ok(self.code_dir().join(checked_relative(file)?))
    }

    /// Writes a generated source file, creating intermediate directories
    pub async fn write_source(&self, file: &str, contents: &str) -> Result<PathBuf, ArtifactError> {
        let path = self.source_path(file)?;
        write_nested(&path, contents).await?;
        Ok(path)
    }
}

/// Task-list entry as a path that stays below whatever it is joined to
fn checked_relative(file: &str) -> Result<&Path, ArtifactError> {
    let relative = Path::new(file);
    let escapes = file.is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ArtifactError::InvalidFileName {
            name: file.to_string(),
        });
    }
    Ok(relative)
}

async fn write_nested(path: &Path, contents: &str) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ArtifactError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    write_file(path, contents).await
}

async fn read_file(path: &Path) -> Result<String, ArtifactError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_file(path: &Path, contents: &str) -> Result<(), ArtifactError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ArtifactError::Write {
            path: path.to_path_buf(),
            source,
        })
}
