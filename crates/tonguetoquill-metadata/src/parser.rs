//! Block classification, validation and assembly of the final document.

use crate::blocks::{RawBlock, segment};
use crate::document::{BODY_FIELD, ParsedDocument, QUILL_KEY, SCOPE_KEY, ScopeEntry};
use crate::error::{Collision, ParseError, ParseWarning};
use crate::options::ParseOptions;
use crate::scan::{clean_body, normalize_line_endings};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tonguetoquill_yaml::YamlValue;

static SCOPE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// Parse a document with default options.
///
/// # Example
///
/// ```
/// let doc = tonguetoquill_metadata::parse("---\nkey: value\n---\nBODY").unwrap();
/// assert_eq!(doc.get_field("key").and_then(|v| v.as_str()), Some("value"));
/// assert_eq!(doc.body(), "BODY");
/// assert!(doc.scopes().is_empty());
/// ```
pub fn parse(text: &str) -> Result<ParsedDocument, ParseError> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parse a document.
///
/// Stops at the first fatal problem. Non-fatal findings are collected in
/// [`ParsedDocument::warnings`].
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<ParsedDocument, ParseError> {
    if let Some(limit) = options.max_input_bytes
        && text.len() > limit
    {
        return Err(ParseError::InputTooLarge {
            size: text.len(),
            limit,
        });
    }

    let text = normalize_line_endings(text);
    tracing::debug!(bytes = text.len(), "parsing document");

    let segments = segment(&text)?;
    if segments.blocks.is_empty() {
        tracing::debug!("no metadata blocks; document is all body");
        return Ok(ParsedDocument::new(
            IndexMap::new(),
            text.into_owned(),
            IndexMap::new(),
            Vec::new(),
        ));
    }

    let block_count = segments.blocks.len();
    let mut assembler = Assembler::new(options);
    assembler.push_body(clean_body(&text[segments.leading]));
    for block in segments.blocks {
        let body = clean_body(&text[block.body.clone()]);
        assembler.add_block(block, body)?;
    }
    let document = assembler.finish()?;

    tracing::debug!(
        blocks = block_count,
        fields = document.fields().len(),
        scopes = document.scopes().len(),
        warnings = document.warnings().len(),
        "parsed document"
    );
    Ok(document)
}

/// Scope names should match `[a-z_][a-z0-9_]*`.
pub fn is_valid_scope_name(name: &str) -> bool {
    SCOPE_NAME.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlobalKind {
    Plain,
    Quill,
}

impl GlobalKind {
    fn describe(self) -> &'static str {
        match self {
            GlobalKind::Plain => "global frontmatter",
            GlobalKind::Quill => "`QUILL`",
        }
    }
}

struct Assembler<'a> {
    options: &'a ParseOptions,
    fields: IndexMap<String, YamlValue>,
    /// Block index and 1-based line that set each global field
    field_origins: IndexMap<String, (usize, usize)>,
    body_parts: Vec<String>,
    plain_block: Option<usize>,
    quill_block: Option<usize>,
    scopes: IndexMap<String, Vec<ScopeEntry>>,
    warnings: Vec<ParseWarning>,
}

impl<'a> Assembler<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Assembler {
            options,
            fields: IndexMap::new(),
            field_origins: IndexMap::new(),
            body_parts: Vec::new(),
            plain_block: None,
            quill_block: None,
            scopes: IndexMap::new(),
            warnings: Vec::new(),
        }
    }

    fn push_body(&mut self, part: &str) {
        if !part.is_empty() {
            self.body_parts.push(part.to_string());
        }
    }

    fn add_block(&mut self, block: RawBlock, body: &str) -> Result<(), ParseError> {
        if block.header.contains_key(SCOPE_KEY) && block.header.contains_key(QUILL_KEY) {
            return Err(ParseError::ConflictingControlKeys {
                block: block.index,
                line: block.key_line(QUILL_KEY),
            });
        }
        if block.header.contains_key(BODY_FIELD) {
            return Err(ParseError::ReservedNameCollision {
                block: block.index,
                line: block.key_line(BODY_FIELD),
                name: BODY_FIELD.to_string(),
                collision: Collision::BodyField,
            });
        }

        if let Some(name) = control_value(&block, SCOPE_KEY)? {
            return self.add_scope(block, name, body);
        }
        match control_value(&block, QUILL_KEY)? {
            Some(_) => self.add_global(block, GlobalKind::Quill, body),
            None => self.add_global(block, GlobalKind::Plain, body),
        }
    }

    fn add_scope(&mut self, mut block: RawBlock, name: String, body: &str) -> Result<(), ParseError> {
        let line = block.key_line(SCOPE_KEY);
        if name == BODY_FIELD {
            return Err(ParseError::ReservedNameCollision {
                block: block.index,
                line,
                name,
                collision: Collision::BodyScope,
            });
        }
        if !is_valid_scope_name(&name) {
            if self.options.strict_scope_names {
                return Err(ParseError::InvalidScopeName {
                    block: block.index,
                    line,
                    name,
                });
            }
            tracing::debug!(block = block.index, name = %name, "scope name outside [a-z_][a-z0-9_]*");
            self.warnings.push(ParseWarning::InvalidScopeName {
                block: block.index,
                line,
                name: name.clone(),
            });
        }

        tracing::trace!(block = block.index, scope = %name, "scoped block");
        block.header.remove(SCOPE_KEY);
        let entry = ScopeEntry::new(block.header.into_values(), body.to_string());
        self.scopes.entry(name).or_default().push(entry);
        Ok(())
    }

    fn add_global(&mut self, block: RawBlock, kind: GlobalKind, body: &str) -> Result<(), ParseError> {
        let slot = match kind {
            GlobalKind::Plain => &mut self.plain_block,
            GlobalKind::Quill => &mut self.quill_block,
        };
        if let Some(first) = *slot {
            return Err(ParseError::DuplicateGlobalBlock {
                block: block.index,
                line: block.line(),
                first,
                what: kind.describe(),
            });
        }
        *slot = Some(block.index);
        tracing::trace!(block = block.index, kind = ?kind, "global block");

        for (key, entry) in block.header {
            let line = entry.key_location.relative_to(block.header_base).row + 1;
            if let Some(&(first, _)) = self.field_origins.get(&key) {
                return Err(ParseError::DuplicateField {
                    block: block.index,
                    line,
                    name: key,
                    first,
                });
            }
            self.field_origins.insert(key.clone(), (block.index, line));
            self.fields.insert(key, entry.value);
        }

        self.push_body(body);
        Ok(())
    }

    fn finish(self) -> Result<ParsedDocument, ParseError> {
        if let Some((name, &(block, line))) = self
            .field_origins
            .iter()
            .find(|(name, _)| self.scopes.contains_key(name.as_str()))
        {
            return Err(ParseError::ReservedNameCollision {
                block,
                line,
                name: name.clone(),
                collision: Collision::FieldMatchesScope,
            });
        }

        Ok(ParsedDocument::new(
            self.fields,
            self.body_parts.join("\n\n"),
            self.scopes,
            self.warnings,
        ))
    }
}

/// `SCOPE` / `QUILL` value as text. Scalars are stringified; null and
/// collections are an error.
fn control_value(block: &RawBlock, key: &'static str) -> Result<Option<String>, ParseError> {
    match block.header.get(key) {
        None => Ok(None),
        Some(YamlValue::String(value)) => Ok(Some(value.clone())),
        Some(YamlValue::Integer(value)) => Ok(Some(value.to_string())),
        Some(YamlValue::Float(value)) => Ok(Some(value.to_string())),
        Some(YamlValue::Bool(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(ParseError::InvalidControlValue {
            block: block.index,
            line: block.key_line(key),
            key,
            found: other.type_name(),
        }),
    }
}
