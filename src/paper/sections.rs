//! TeX section extraction
//!
//! Splits a LaTeX document into a flat, ordered list of labelled sections.
//! A section is a heading marker (`\section`, `\subsection`, `\subsubsection`, ...)
//! with a brace-delimited title, followed by `\label{...}`, followed by body text
//! that runs until the next heading marker or the end of input. Heading depth is
//! recorded but no tree is built.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One labelled region of a TeX document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Raw heading marker, e.g. `\subsection`
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub label: String,
    pub content: String,
}

impl Section {
    /// 1 for `\section`, 2 for `\subsection`, and so on
    pub fn level(&self) -> usize {
        self.kind.matches("sub").count() + 1
    }
}

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\\(?:sub)*section)\{([\s\S]*?)\}\s*\\label\{([\s\S]*?)\}\s*")
            .expect("heading pattern is valid")
    })
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\(?:sub)*section").expect("marker pattern is valid"))
}

/// Extracts every heading+label section in document order.
///
/// Input without any heading+label pair yields an empty vector.
pub fn extract_sections(markup: &str) -> Vec<Section> {
    let heading = heading_regex();
    let marker = marker_regex();

    let mut sections = Vec::new();
    let mut pos = 0;

    while let Some(caps) = heading.captures_at(markup, pos) {
        let (Some(whole), Some(kind), Some(title), Some(label)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            break;
        };

        // An unlabelled heading must not swallow the next heading into its title.
        if let Some(inner) = marker.find(title.as_str()) {
            pos = title.start() + inner.start();
            continue;
        }

        let body_end = marker
            .find_at(markup, whole.end())
            .map(|m| m.start())
            .unwrap_or(markup.len());

        sections.push(Section {
            kind: kind.as_str().to_string(),
            title: title.as_str().trim().to_string(),
            label: label.as_str().trim().to_string(),
            content: markup[whole.end()..body_end].trim().to_string(),
        });

        if body_end >= markup.len() {
            break;
        }
        pos = body_end;
    }

    sections
}

/// Pretty JSON array of sections, the form fed to prompts
pub fn sections_to_json(sections: &[Section]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(sections)
}
