//! Paper input loading
//!
//! A paper arrives either as TeX source (split into sections) or as an already
//! structured JSON document. Both end up as a [`PaperContent`] holding JSON.

use super::sections::{extract_sections, sections_to_json};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PaperError {
    #[error("Unsupported input file '{}': expected a .tex or .json document", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to read paper '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse paper '{}' as JSON: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Input document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// TeX source needing section extraction
    Markup,
    /// Machine-readable JSON consumed as-is
    Structured,
}

impl InputFormat {
    /// Classifies a path by extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "tex" => Some(Self::Markup),
            "json" => Some(Self::Structured),
            _ => None,
        }
    }

    /// Decides how to load `path`.
    ///
    /// Only an existing file with an unknown extension is rejected. Anything else
    /// that is not `.tex` is treated as JSON and will fail later if unreadable.
    pub fn resolve(path: &Path) -> Result<Self, PaperError> {
        match Self::from_path(path) {
            Some(format) => Ok(format),
            None if path.is_file() => Err(PaperError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
            None => Ok(Self::Structured),
        }
    }
}

/// The paper as seen by every stage
#[derive(Debug, Clone, PartialEq)]
pub struct PaperContent {
    value: Value,
}

impl PaperContent {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Loads TeX or JSON from disk according to [`InputFormat::resolve`]
    pub async fn load(path: &Path) -> Result<Self, PaperError> {
        let format = InputFormat::resolve(path)?;

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PaperError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        match format {
            InputFormat::Markup => Ok(Self::from_markup(&raw)),
            InputFormat::Structured => {
                Self::from_json(&raw).map_err(|source| PaperError::InvalidJson {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    pub fn from_markup(markup: &str) -> Self {
        let sections = extract_sections(markup);
        if sections.is_empty() {
            warn!("No labelled sections found in TeX input; the paper will be empty");
        } else {
            debug!("Extracted {} sections from TeX input", sections.len());
        }
        let value = serde_json::to_value(&sections).unwrap_or(Value::Array(Vec::new()));
        Self { value }
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw).map(Self::new)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Text embedded in prompts
    pub fn render(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

/// TeX source to the pretty JSON section list
pub fn tex_to_json(markup: &str) -> serde_json::Result<String> {
    sections_to_json(&extract_sections(markup))
}
