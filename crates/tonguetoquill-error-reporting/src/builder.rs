//! Builder API for diagnostic messages.
//!
//! The builder encodes the tidyverse structure (problem, details, hints) in
//! its method names so call sites read like the message they produce.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
use tonguetoquill_source_map::Range;

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use tonguetoquill_error_reporting::DiagnosticMessageBuilder;
///
/// let warning = DiagnosticMessageBuilder::warning("Invalid scope name")
///     .with_code("TQ-1-101")
///     .problem("`1bad-name` does not match `[a-z_][a-z0-9_]*`")
///     .add_note("The block is kept under the name as written")
///     .build();
///
/// assert_eq!(warning.code.as_deref(), Some("TQ-1-101"));
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    kind: DiagnosticKind,
    title: String,
    code: Option<String>,
    problem: Option<MessageContent>,
    details: Vec<DetailItem>,
    hints: Vec<MessageContent>,
    location: Option<Range>,
}

impl DiagnosticMessageBuilder {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            code: None,
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

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The problem statement: what went wrong, stated with "must" or "can't".
    pub fn problem(mut self, stmt: impl Into<MessageContent>) -> Self {
        self.problem = Some(stmt.into());
        self
    }

    fn push_detail(mut self, kind: DetailKind, content: MessageContent, location: Option<Range>) -> Self {
        self.details.push(DetailItem {
            kind,
            content,
            location,
        });
        self
    }

    /// Add an error detail (✖ bullet).
    pub fn add_detail(self, detail: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, detail.into(), None)
    }

    /// Add an error detail that points at its own location.
    pub fn add_detail_at(self, detail: impl Into<MessageContent>, location: Range) -> Self {
        self.push_detail(DetailKind::Error, detail.into(), Some(location))
    }

    /// Add an info detail (ℹ bullet).
    pub fn add_info(self, info: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, info.into(), None)
    }

    /// Add a note detail (• bullet).
    pub fn add_note(self, note: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Note, note.into(), None)
    }

    /// Add a hint; hints should end with a question mark.
    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_location(mut self, location: Range) -> Self {
        self.location = Some(location);
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        DiagnosticMessage {
            code: self.code,
            title: self.title,
            kind: self.kind,
            problem: self.problem,
            details: self.details,
            hints: self.hints,
            location: self.location,
        }
    }
}
