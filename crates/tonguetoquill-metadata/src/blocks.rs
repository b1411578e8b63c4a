//! Delimiter pairing: split a document into leading text and metadata blocks.
//!
//! Pairing comes first. Each delimiter candidate in body text is matched with
//! the next delimiter line. A candidate with blank lines on both sides only
//! opens a block when its header is a non-empty YAML mapping; otherwise it is
//! a horizontal rule and stays in the body. Any other candidate always opens
//! a block, so a missing partner or bad YAML is an error there.

use crate::error::ParseError;
use crate::scan::{Fence, Line, is_blank, is_delimiter, split_lines};
use std::ops::Range;
use tonguetoquill_source_map::Location;
use tonguetoquill_yaml::YamlMapping;

/// One `---` / header / `---` block and the text that follows it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawBlock {
    /// 0-based position among the document's blocks
    pub index: usize,
    /// 0-based row of the opening delimiter
    pub open_row: usize,
    /// Document position of the first header line
    pub header_base: Location,
    pub header: YamlMapping,
    /// Byte span of the text after the closing delimiter, up to the next
    /// block or the end of the document
    pub body: Range<usize>,
}

impl RawBlock {
    /// 1-based document line of the opening delimiter.
    pub fn line(&self) -> usize {
        self.open_row + 1
    }

    /// 1-based document line of a header key, falling back to the opener.
    pub fn key_line(&self, key: &str) -> usize {
        self.header
            .key_location(key)
            .map_or(self.line(), |location| location.relative_to(self.header_base).row + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segments {
    /// Byte span of the text before the first block
    pub leading: Range<usize>,
    pub blocks: Vec<RawBlock>,
}

/// Pair delimiters in `text` (already LF-normalised) and parse each header.
pub(crate) fn segment(text: &str) -> Result<Segments, ParseError> {
    let lines = split_lines(text);
    let mut blocks: Vec<RawBlock> = Vec::new();
    let mut openers: Vec<usize> = Vec::new();
    let mut fence: Option<Fence> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(open) = fence {
            if open.is_closed_by(line.text) {
                fence = None;
            }
            i += 1;
            continue;
        }
        if let Some(open) = Fence::open(line.text) {
            fence = Some(open);
            i += 1;
            continue;
        }
        if !is_delimiter(line.text) {
            i += 1;
            continue;
        }

        let rule_context = is_rule_context(&lines, i);
        // A rule-context candidate never reaches into fenced code for a partner.
        let partner = (i + 1..lines.len())
            .take_while(|&j| !rule_context || Fence::open(lines[j].text).is_none())
            .find(|&j| is_delimiter(lines[j].text));

        let Some(close) = partner else {
            if rule_context {
                tracing::trace!(line = line.row + 1, "unpaired delimiter is a horizontal rule");
                i += 1;
                continue;
            }
            return Err(ParseError::UnclosedBlock {
                block: blocks.len(),
                line: line.row + 1,
            });
        };

        if rule_context && is_rule_context(&lines, close) {
            tracing::trace!(
                line = line.row + 1,
                partner = lines[close].row + 1,
                "delimiter and partner are both blank-separated; horizontal rule"
            );
            i += 1;
            continue;
        }

        let header_start = line.next_start(text.len());
        let header_text = &text[header_start..lines[close].start];
        let header_base = Location::new(header_start, line.row + 1, 0);

        let header = match tonguetoquill_yaml::parse_mapping(header_text) {
            Ok(mapping) if rule_context && mapping.is_empty() => None,
            Ok(mapping) => Some(mapping),
            Err(_) if rule_context => None,
            Err(source) => {
                return Err(ParseError::MalformedYaml {
                    block: blocks.len(),
                    line: source.location().relative_to(header_base).row + 1,
                    source,
                });
            }
        };

        let Some(header) = header else {
            tracing::trace!(line = line.row + 1, "blank-separated delimiter is a horizontal rule");
            i += 1;
            continue;
        };

        tracing::trace!(
            block = blocks.len(),
            line = line.row + 1,
            keys = header.len(),
            "opened metadata block"
        );
        openers.push(line.start);
        blocks.push(RawBlock {
            index: blocks.len(),
            open_row: line.row,
            header_base,
            header,
            body: lines[close].next_start(text.len())..text.len(),
        });
        i = close + 1;
    }

    // Each body runs up to the next block's opening delimiter.
    for (block, next_open) in blocks.iter_mut().zip(openers.iter().skip(1)) {
        block.body.end = *next_open;
    }

    let leading = 0..openers.first().copied().unwrap_or(text.len());
    Ok(Segments { leading, blocks })
}

/// Blank line directly above and directly below.
fn is_rule_context(lines: &[Line<'_>], i: usize) -> bool {
    blank_above(lines, i) && blank_below(lines, i)
}

/// The document start is not blank context.
fn blank_above(lines: &[Line<'_>], i: usize) -> bool {
    i > 0 && is_blank(lines[i - 1].text)
}

/// The document end is blank context.
fn blank_below(lines: &[Line<'_>], i: usize) -> bool {
    lines.get(i + 1).is_none_or(|line| is_blank(line.text))
}
