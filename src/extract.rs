//! Payload extraction from free-text model responses
//!
//! Each extractor returns [`Extracted::Found`] with the delimited payload, or
//! [`Extracted::Fallback`] carrying the whole response when the delimiters are
//! missing. Falling back is a normal outcome, never an error: callers persist
//! whatever text they get.

use regex::Regex;
use std::sync::OnceLock;

/// Result of pulling a payload out of a model response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extracted<'a> {
    /// Delimiters matched; holds the text between them
    Found(&'a str),
    /// Delimiters absent; holds the unmodified response
    Fallback(&'a str),
}

impl<'a> Extracted<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Extracted::Found(s) | Extracted::Fallback(s) => s,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found(_))
    }

    pub fn into_string(self) -> String {
        self.as_str().to_string()
    }
}

fn content_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\[CONTENT\]\n(.*?)\n\[/CONTENT\]").expect("content pattern is valid")
    })
}

/// Text between `[CONTENT]\n` and `\n[/CONTENT]` (first occurrence)
pub fn tagged_content(response: &str) -> Extracted<'_> {
    content_regex()
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| Extracted::Found(m.as_str()))
        .unwrap_or(Extracted::Fallback(response))
}

/// Body of the first fenced block tagged with `language` (e.g. ```` ```yaml ````).
///
/// An empty block still counts as found.
pub fn fenced_block<'a>(response: &'a str, language: &str) -> Extracted<'a> {
    let pattern = format!(r"(?s)```{}\n(.*?)\n```", regex::escape(language));
    let Ok(re) = Regex::new(&pattern) else {
        return Extracted::Fallback(response);
    };

    re.captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| Extracted::Found(m.as_str()))
        .unwrap_or(Extracted::Fallback(response))
}

/// Like [`fenced_block`], but an empty block falls back to the whole response
pub fn code_block<'a>(response: &'a str, language: &str) -> Extracted<'a> {
    match fenced_block(response, language) {
        Extracted::Found(code) if code.is_empty() => Extracted::Fallback(response),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_content_found() {
        let response = "Here you go:\n[CONTENT]\n{\"Task list\": []}\n[/CONTENT]\nDone.";
        assert_eq!(
            tagged_content(response),
            Extracted::Found("{\"Task list\": []}")
        );
    }

    #[test]
    fn test_tagged_content_exact_payload() {
        assert_eq!(tagged_content("[CONTENT]\nX\n[/CONTENT]").as_str(), "X");
    }

    #[test]
    fn test_tagged_content_multiline_is_lazy() {
        let response = "[CONTENT]\na\nb\n[/CONTENT]\n[CONTENT]\nc\n[/CONTENT]";
        assert_eq!(tagged_content(response), Extracted::Found("a\nb"));
    }

    #[test]
    fn test_tagged_content_fallback() {
        let response = "no delimiters here";
        let extracted = tagged_content(response);
        assert!(!extracted.is_found());
        assert_eq!(extracted.as_str(), response);

        // Delimiters must sit on their own lines
        assert!(!tagged_content("[CONTENT]X[/CONTENT]").is_found());
    }

    #[test]
    fn test_fenced_yaml_block() {
        let response = "Config:\n```yaml\nlr: 0.001\nepochs: 10\n```\nEnjoy.";
        assert_eq!(
            fenced_block(response, "yaml"),
            Extracted::Found("lr: 0.001\nepochs: 10")
        );
    }

    #[test]
    fn test_fenced_block_other_language_ignored() {
        let response = "```python\nprint(1)\n```";
        assert_eq!(
            fenced_block(response, "yaml"),
            Extracted::Fallback(response)
        );
    }

    #[test]
    fn test_fenced_block_first_match_wins() {
        let response = "```python\nfirst()\n```\n```python\nsecond()\n```";
        assert_eq!(fenced_block(response, "python").as_str(), "first()");
    }

    #[test]
    fn test_code_block_empty_falls_back() {
        let response = "```python\n\n```";
        assert_eq!(fenced_block(response, "python"), Extracted::Found(""));
        assert_eq!(code_block(response, "python"), Extracted::Fallback(response));
    }

    #[test]
    fn test_language_is_escaped() {
        let response = "```c++\nint main() {}\n```";
        assert_eq!(code_block(response, "c++").as_str(), "int main() {}");
    }
}
