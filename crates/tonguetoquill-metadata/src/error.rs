//! Parse errors and warnings, and their conversion to diagnostics.

use serde::Serialize;
use std::fmt;
use tonguetoquill_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use tonguetoquill_source_map::{FileInformation, Range};

/// Why a name was rejected as a reserved-name collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collision {
    /// `SCOPE: body`
    BodyScope,
    /// `body` used as a field in any block
    BodyField,
    /// a global field has the same name as a scope
    FieldMatchesScope,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collision::BodyScope => "is reserved and can't be used as a scope name",
            Collision::BodyField => "is reserved for the block body and can't be used as a field",
            Collision::FieldMatchesScope => "is used both as a global field and as a scope name",
        })
    }
}

/// A fatal parse failure. The parser stops at the first one it meets.
///
/// `block` is the 0-based index of the metadata block in document order and
/// `line` the 1-based document line the error points at.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("block {block} (line {line}): invalid YAML: {source}")]
    MalformedYaml {
        block: usize,
        line: usize,
        #[source]
        source: tonguetoquill_yaml::Error,
    },

    #[error("block {block} (line {line}): frontmatter opened here is never closed")]
    UnclosedBlock { block: usize, line: usize },

    #[error(
        "block {block} (line {line}): a document can't have more than one {what} block (the first is block {first})"
    )]
    DuplicateGlobalBlock {
        block: usize,
        line: usize,
        first: usize,
        what: &'static str,
    },

    #[error("block {block} (line {line}): `{name}` {collision}")]
    ReservedNameCollision {
        block: usize,
        line: usize,
        name: String,
        collision: Collision,
    },

    #[error("block {block} (line {line}): a block can't declare both `SCOPE` and `QUILL`")]
    ConflictingControlKeys { block: usize, line: usize },

    #[error("block {block} (line {line}): `{key}` must be a scalar, found {found}")]
    InvalidControlValue {
        block: usize,
        line: usize,
        key: &'static str,
        found: &'static str,
    },

    #[error("block {block} (line {line}): global field `{name}` is already set by block {first}")]
    DuplicateField {
        block: usize,
        line: usize,
        name: String,
        first: usize,
    },

    #[error("block {block} (line {line}): scope name `{name}` must match `[a-z_][a-z0-9_]*`")]
    InvalidScopeName {
        block: usize,
        line: usize,
        name: String,
    },

    #[error("document is {size} bytes, more than the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
}

/// Fieldless mirror of [`ParseError`] for matching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseErrorKind {
    MalformedYaml,
    UnclosedBlock,
    DuplicateGlobalBlock,
    ReservedNameCollision,
    ConflictingControlKeys,
    InvalidControlValue,
    DuplicateField,
    InvalidScopeName,
    InputTooLarge,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::MalformedYaml { .. } => ParseErrorKind::MalformedYaml,
            ParseError::UnclosedBlock { .. } => ParseErrorKind::UnclosedBlock,
            ParseError::DuplicateGlobalBlock { .. } => ParseErrorKind::DuplicateGlobalBlock,
            ParseError::ReservedNameCollision { .. } => ParseErrorKind::ReservedNameCollision,
            ParseError::ConflictingControlKeys { .. } => ParseErrorKind::ConflictingControlKeys,
            ParseError::InvalidControlValue { .. } => ParseErrorKind::InvalidControlValue,
            ParseError::DuplicateField { .. } => ParseErrorKind::DuplicateField,
            ParseError::InvalidScopeName { .. } => ParseErrorKind::InvalidScopeName,
            ParseError::InputTooLarge { .. } => ParseErrorKind::InputTooLarge,
        }
    }

    /// 0-based index of the offending block, if the error is tied to one.
    pub fn block(&self) -> Option<usize> {
        match self {
            ParseError::MalformedYaml { block, .. }
            | ParseError::UnclosedBlock { block, .. }
            | ParseError::DuplicateGlobalBlock { block, .. }
            | ParseError::ReservedNameCollision { block, .. }
            | ParseError::ConflictingControlKeys { block, .. }
            | ParseError::InvalidControlValue { block, .. }
            | ParseError::DuplicateField { block, .. }
            | ParseError::InvalidScopeName { block, .. } => Some(*block),
            ParseError::InputTooLarge { .. } => None,
        }
    }

    /// 1-based document line, if the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedYaml { line, .. }
            | ParseError::UnclosedBlock { line, .. }
            | ParseError::DuplicateGlobalBlock { line, .. }
            | ParseError::ReservedNameCollision { line, .. }
            | ParseError::ConflictingControlKeys { line, .. }
            | ParseError::InvalidControlValue { line, .. }
            | ParseError::DuplicateField { line, .. }
            | ParseError::InvalidScopeName { line, .. } => Some(*line),
            ParseError::InputTooLarge { .. } => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind() {
            ParseErrorKind::MalformedYaml => "TQ-1-1",
            ParseErrorKind::UnclosedBlock => "TQ-1-2",
            ParseErrorKind::DuplicateGlobalBlock => "TQ-1-3",
            ParseErrorKind::ReservedNameCollision => "TQ-1-4",
            ParseErrorKind::ConflictingControlKeys => "TQ-1-5",
            ParseErrorKind::InvalidControlValue => "TQ-1-6",
            ParseErrorKind::DuplicateField => "TQ-1-7",
            ParseErrorKind::InputTooLarge => "TQ-1-8",
            ParseErrorKind::InvalidScopeName => "TQ-1-9",
        }
    }

    /// Build a diagnostic for this error, located on its line of `source`.
    ///
    /// `source` is the text that was parsed; CRLF input is fine since line
    /// numbers do not change under normalisation.
    pub fn to_diagnostic(&self, source: &str) -> DiagnosticMessage {
        let builder = match self {
            ParseError::MalformedYaml { source: yaml, .. } => {
                DiagnosticMessageBuilder::error("Malformed YAML")
                    .problem("The frontmatter block does not contain valid YAML")
                    .add_detail(yaml.to_string())
                    .add_hint("Check the indentation and quoting around this line?")
            }
            ParseError::UnclosedBlock { .. } => DiagnosticMessageBuilder::error("Unclosed frontmatter")
                .problem("This `---` opens a metadata block that is never closed")
                .add_hint("Did you forget the closing `---`?")
                .add_hint("For a horizontal rule, leave a blank line above and below the `---`?"),
            ParseError::DuplicateGlobalBlock { first, what, .. } => {
                DiagnosticMessageBuilder::error("Duplicate global frontmatter")
                    .problem(format!("A document can't have more than one {what} block"))
                    .add_info(format!("The first {what} block is block {first}"))
                    .add_hint("Add a `SCOPE` key to make this a scoped block?")
            }
            ParseError::ReservedNameCollision {
                name, collision, ..
            } => {
                let builder = DiagnosticMessageBuilder::error("Reserved name collision")
                    .problem(format!("`{name}` {collision}"));
                match collision {
                    Collision::FieldMatchesScope => {
                        builder.add_hint("Rename either the global field or the scope?")
                    }
                    _ => builder.add_info("`body` always holds the markdown that follows a block"),
                }
            }
            ParseError::ConflictingControlKeys { .. } => {
                DiagnosticMessageBuilder::error("Conflicting control keys")
                    .problem("A block can't declare both `SCOPE` and `QUILL`")
                    .add_info("`QUILL` selects the template for the whole document")
                    .add_info("`SCOPE` names a repeated section")
                    .add_hint("Move `QUILL` to the global block?")
            }
            ParseError::InvalidControlValue { key, found, .. } => {
                DiagnosticMessageBuilder::error("Invalid control value")
                    .problem(format!("`{key}` must be a scalar"))
                    .add_detail(format!("Found {found}"))
            }
            ParseError::DuplicateField { name, first, .. } => {
                DiagnosticMessageBuilder::error("Duplicate field")
                    .problem(format!("Global field `{name}` is set more than once"))
                    .add_info(format!("It is first set in block {first}"))
            }
            ParseError::InvalidScopeName { name, .. } => {
                DiagnosticMessageBuilder::error("Invalid scope name")
                    .problem(format!("Scope name `{name}` must match `[a-z_][a-z0-9_]*`"))
                    .add_hint("Use lowercase letters, digits and underscores?")
            }
            ParseError::InputTooLarge { size, limit } => {
                DiagnosticMessageBuilder::error("Document too large")
                    .problem(format!("The document is {size} bytes; the limit is {limit}"))
            }
        };

        let builder = builder.with_code(self.code());
        match self.line().and_then(|line| line_range(source, line)) {
            Some(range) => builder.with_location(range).build(),
            None => builder.build(),
        }
    }
}

/// A non-fatal finding. The block is kept and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    InvalidScopeName {
        block: usize,
        line: usize,
        name: String,
    },
}

impl ParseWarning {
    pub fn block(&self) -> usize {
        match self {
            ParseWarning::InvalidScopeName { block, .. } => *block,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseWarning::InvalidScopeName { line, .. } => *line,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParseWarning::InvalidScopeName { .. } => "TQ-1-101",
        }
    }

    pub fn to_diagnostic(&self, source: &str) -> DiagnosticMessage {
        let builder = match self {
            ParseWarning::InvalidScopeName { name, .. } => {
                DiagnosticMessageBuilder::warning("Invalid scope name")
                    .problem(format!("Scope name `{name}` should match `[a-z_][a-z0-9_]*`"))
                    .add_note("The block is kept under the name as written")
            }
        }
        .with_code(self.code());

        match line_range(source, self.line()) {
            Some(range) => builder.with_location(range).build(),
            None => builder.build(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::InvalidScopeName { block, line, name } => write!(
                f,
                "block {block} (line {line}): scope name `{name}` should match `[a-z_][a-z0-9_]*`"
            ),
        }
    }
}

/// Range of a 1-based line, without its line terminator.
fn line_range(source: &str, line: usize) -> Option<Range> {
    let mut range = FileInformation::new(source).row_range(line.checked_sub(1)?)?;
    if source[range.span()].ends_with('\r') {
        range.end.offset -= 1;
        range.end.column -= 1;
    }
    Some(range)
}
