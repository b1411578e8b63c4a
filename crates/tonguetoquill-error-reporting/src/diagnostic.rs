//! Core diagnostic message types.
//!
//! This module defines the structures for representing diagnostic messages
//! (errors, warnings, info) following tidyverse-style guidelines.

use serde::{Deserialize, Serialize};
use tonguetoquill_source_map::{Range, SourceFile};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
    /// A note providing additional context
    Note,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        }
    }
}

/// How detail items should be presented (tidyverse x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (i bullet)
    Info,
    /// Note detail (plain bullet)
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// The content of a message or detail item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain text content
    Plain(String),
    /// Markdown content; backticks mark code, as in the editor's diagnostics pane
    Markdown(String),
}

impl MessageContent {
    /// Get the raw string content for display
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Plain(s) | MessageContent::Markdown(s) => s,
        }
    }

    /// Convert to JSON value with type information
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            MessageContent::Plain(s) => json!({
                "type": "plain",
                "content": s
            }),
            MessageContent::Markdown(s) => json!({
                "type": "markdown",
                "content": s
            }),
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Markdown(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Markdown(s.to_string())
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    /// The kind of detail (error, info, note)
    pub kind: DetailKind,
    /// The content of the detail
    pub content: MessageContent,
    /// Optional source location this detail points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Range>,
}

/// A diagnostic message following tidyverse-style structure.
///
/// Structure:
/// 1. **Code**: Optional error code (e.g., "TQ-1-2") for searchability
/// 2. **Title**: Brief error message
/// 3. **Kind**: Error, Warning, Info
/// 4. **Problem**: What went wrong
/// 5. **Details**: Specific information (bulleted)
/// 6. **Hints**: Optional guidance for fixing (ends with ?)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Optional error code (e.g., "TQ-1-2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Brief title for the error
    pub title: String,

    /// The kind of diagnostic (Error, Warning, Info)
    pub kind: DiagnosticKind,

    /// The problem statement
    pub problem: Option<MessageContent>,

    /// Specific error details
    pub details: Vec<DetailItem>,

    /// Optional hints for fixing
    pub hints: Vec<MessageContent>,

    /// Where in the document the issue occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Range>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Prefer [`crate::DiagnosticMessageBuilder`] for anything with details.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the error code.
    ///
    /// Error codes follow the format `TQ-<subsystem>-<number>`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Get the documentation URL for this error, if it has a known code.
    ///
    /// ```
    /// use tonguetoquill_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("Internal Error").with_code("TQ-0-1");
    /// assert!(msg.docs_url().is_some());
    /// ```
    pub fn docs_url(&self) -> Option<&str> {
        self.code
            .as_ref()
            .and_then(|code| crate::catalog::get_docs_url(code))
    }

    /// Render this diagnostic message as text.
    ///
    /// Without a source file (or without a location) the message is rendered
    /// tidyverse style:
    ///
    /// ```text
    /// Error [TQ-1-2]: title at 3:1
    /// Problem statement here
    /// ✖ Error detail
    /// ℹ Info detail
    /// ? Hint
    /// ```
    ///
    /// With both, an `ariadne` excerpt of the document replaces the title,
    /// problem and located details; unlocated details and hints follow it.
    ///
    /// # Example
    ///
    /// ```
    /// use tonguetoquill_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Invalid input")
    ///     .problem("Values must be numeric")
    ///     .add_hint("Convert to numbers first?")
    ///     .build();
    /// let text = msg.to_text(None);
    /// assert!(text.contains("Error: Invalid input"));
    /// assert!(text.contains("Values must be numeric"));
    /// ```
    pub fn to_text(&self, source: Option<&SourceFile>) -> String {
        let mut lines = Vec::new();

        let excerpt = match (&self.location, source) {
            (Some(location), Some(file)) => self.render_ariadne_source_context(location, file),
            _ => None,
        };

        match excerpt {
            Some(excerpt) => {
                lines.push(excerpt.trim_end().to_string());
                for detail in self.details.iter().filter(|d| d.location.is_none()) {
                    lines.push(format!("{} {}", detail.kind.bullet(), detail.content.as_str()));
                }
            }
            None => {
                let mut heading = match &self.code {
                    Some(code) => format!("{} [{}]: {}", self.kind.label(), code, self.title),
                    None => format!("{}: {}", self.kind.label(), self.title),
                };
                if let Some(location) = &self.location {
                    heading.push_str(&format!(
                        " at {}:{}",
                        location.start.row + 1,
                        location.start.column + 1
                    ));
                }
                lines.push(heading);

                if let Some(problem) = &self.problem {
                    lines.push(problem.as_str().to_string());
                }
                for detail in &self.details {
                    lines.push(format!("{} {}", detail.kind.bullet(), detail.content.as_str()));
                }
            }
        }

        for hint in &self.hints {
            lines.push(format!("? {}", hint.as_str()));
        }

        lines.join("\n")
    }

    /// Render this diagnostic message as a JSON value.
    ///
    /// ```json
    /// {
    ///   "kind": "error",
    ///   "title": "Unclosed frontmatter",
    ///   "code": "TQ-1-2",
    ///   "problem": {"type": "markdown", "content": "..."},
    ///   "details": [{"kind": "error", "content": {...}}],
    ///   "hints": [{"type": "markdown", "content": "..."}],
    ///   "location": {"start": {...}, "end": {...}}
    /// }
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "kind": self.kind,
            "title": self.title,
        });

        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }

        if let Some(problem) = &self.problem {
            obj["problem"] = problem.to_json();
        }

        if !self.details.is_empty() {
            let details: Vec<_> = self
                .details
                .iter()
                .map(|d| {
                    let mut detail_obj = json!({
                        "kind": d.kind,
                        "content": d.content.to_json()
                    });
                    if let Some(location) = &d.location {
                        detail_obj["location"] = json!(location);
                    }
                    detail_obj
                })
                .collect();
            obj["details"] = json!(details);
        }

        if !self.hints.is_empty() {
            let hints: Vec<_> = self.hints.iter().map(MessageContent::to_json).collect();
            obj["hints"] = json!(hints);
        }

        if let Some(location) = &self.location {
            obj["location"] = json!(location);
        }

        obj
    }

    /// Render the source excerpt with ariadne (private helper for to_text).
    fn render_ariadne_source_context(&self, location: &Range, file: &SourceFile) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        let content = file.content.as_str();
        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
            DiagnosticKind::Info => (ReportKind::Advice, Color::Cyan),
            DiagnosticKind::Note => (ReportKind::Advice, Color::Blue),
        };

        let main_span = char_span(content, location)?;
        let mut report = Report::build(report_kind, file.path.clone(), main_span.start)
            .with_config(Config::default().with_color(false));

        report = match &self.code {
            Some(code) => report.with_message(format!("[{}] {}", code, self.title)),
            None => report.with_message(&self.title),
        };

        let main_message = self
            .problem
            .as_ref()
            .map_or(self.title.as_str(), MessageContent::as_str);
        report = report.with_label(
            Label::new((file.path.clone(), main_span))
                .with_message(main_message)
                .with_color(main_color),
        );

        for detail in &self.details {
            let Some(span) = detail.location.as_ref().and_then(|loc| char_span(content, loc)) else {
                continue;
            };
            let color = match detail.kind {
                DetailKind::Error => Color::Red,
                DetailKind::Info => Color::Cyan,
                DetailKind::Note => Color::Blue,
            };
            report = report.with_label(
                Label::new((file.path.clone(), span))
                    .with_message(detail.content.as_str())
                    .with_color(color),
            );
        }

        let mut output = Vec::new();
        report
            .finish()
            .write((file.path.clone(), Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}

/// Convert a byte range to the character span ariadne expects.
fn char_span(content: &str, location: &Range) -> Option<std::ops::Range<usize>> {
    let start = content.get(..location.start.offset)?.chars().count();
    let len = content.get(location.start.offset..location.end.offset)?.chars().count();
    Some(start..start + len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DiagnosticMessageBuilder;
    use tonguetoquill_source_map::Location;

    fn line_two() -> Range {
        Range::new(Location::new(7, 1, 0), Location::new(13, 1, 6))
    }

    #[test]
    fn test_diagnostic_message_new() {
        let msg = DiagnosticMessage::new(DiagnosticKind::Error, "Test error");
        assert_eq!(msg.title, "Test error");
        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert!(msg.code.is_none());
        assert!(msg.problem.is_none());
        assert!(msg.details.is_empty());
        assert!(msg.hints.is_empty());
    }

    #[test]
    fn test_constructors() {
        assert_eq!(DiagnosticMessage::error("e").kind, DiagnosticKind::Error);
        assert_eq!(DiagnosticMessage::warning("w").kind, DiagnosticKind::Warning);
        assert_eq!(DiagnosticMessage::info("i").kind, DiagnosticKind::Info);
    }

    #[test]
    fn test_docs_url() {
        let msg = DiagnosticMessage::error("Unclosed").with_code("TQ-1-2");
        assert!(msg.docs_url().unwrap().contains("TQ-1-2"));
        assert!(DiagnosticMessage::error("x").docs_url().is_none());
        assert!(DiagnosticMessage::error("x").with_code("TQ-999-999").docs_url().is_none());
    }

    #[test]
    fn test_to_text_simple_error() {
        let msg = DiagnosticMessage::error("Something went wrong");
        assert_eq!(msg.to_text(None), "Error: Something went wrong");
    }

    #[test]
    fn test_to_text_with_code() {
        let msg = DiagnosticMessage::warning("Odd scope name").with_code("TQ-1-101");
        assert_eq!(msg.to_text(None), "Warning [TQ-1-101]: Odd scope name");
    }

    #[test]
    fn test_to_text_full_message() {
        let msg = DiagnosticMessageBuilder::error("Invalid input")
            .problem("Values must be numeric")
            .add_detail("Found text in column 3")
            .add_info("Columns should contain only numbers")
            .add_hint("Convert to numbers first?")
            .build();

        let text = msg.to_text(None);
        assert!(text.contains("Error: Invalid input"));
        assert!(text.contains("Values must be numeric"));
        assert!(text.contains("✖ Found text in column 3"));
        assert!(text.contains("ℹ Columns should contain only numbers"));
        assert!(text.contains("? Convert to numbers first?"));
    }

    #[test]
    fn test_location_in_to_text_without_source() {
        let location = Range::new(Location::new(100, 10, 5), Location::new(110, 10, 15));
        let msg = DiagnosticMessageBuilder::error("Invalid syntax")
            .with_location(location)
            .build();

        let text = msg.to_text(None);
        assert!(text.contains("Invalid syntax"));
        assert!(text.contains("at 11:6"));
    }

    #[test]
    fn test_location_in_to_text_with_source() {
        let file = SourceFile::new("memo.md", "line 1\nline 2\nline 3\nline 4");
        let msg = DiagnosticMessageBuilder::error("Invalid syntax")
            .with_code("TQ-1-1")
            .with_location(line_two())
            .add_hint("Check the indentation?")
            .build();

        let text = msg.to_text(Some(&file));
        assert!(text.contains("[TQ-1-1] Invalid syntax"));
        assert!(text.contains("memo.md"));
        assert!(text.contains("2:1"));
        assert!(text.contains("? Check the indentation?"));
    }

    #[test]
    fn test_out_of_range_location_falls_back_to_plain_text() {
        let file = SourceFile::new("memo.md", "short");
        let msg = DiagnosticMessageBuilder::error("Invalid syntax")
            .with_location(line_two())
            .build();

        assert_eq!(msg.to_text(Some(&file)), "Error: Invalid syntax at 2:1");
    }

    #[test]
    fn test_to_json_full_message() {
        let msg = DiagnosticMessageBuilder::error("Invalid input")
            .with_code("TQ-1-1")
            .problem("Values must be numeric")
            .add_detail("Found text in column 3")
            .add_info("Expected numbers")
            .add_hint("Convert to numbers first?")
            .build();

        let json = msg.to_json();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["title"], "Invalid input");
        assert_eq!(json["code"], "TQ-1-1");
        assert_eq!(json["problem"]["type"], "markdown");
        assert_eq!(json["problem"]["content"], "Values must be numeric");
        assert_eq!(json["details"][0]["kind"], "error");
        assert_eq!(json["details"][1]["kind"], "info");
        assert_eq!(json["details"][1]["content"]["content"], "Expected numbers");
        assert_eq!(json["hints"][0]["content"], "Convert to numbers first?");
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_location_in_to_json() {
        let msg = DiagnosticMessageBuilder::warning("Odd scope name")
            .with_location(line_two())
            .build();

        let json = msg.to_json();
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["location"]["start"]["row"], 1);
        assert_eq!(json["location"]["start"]["offset"], 7);
        assert_eq!(json["location"]["end"]["column"], 6);
    }

    #[test]
    fn test_char_span_counts_characters() {
        let content = "é\nabc";
        let range = Range::new(Location::new(3, 1, 0), Location::new(6, 1, 3));
        assert_eq!(char_span(content, &range), Some(2..5));
    }
}
