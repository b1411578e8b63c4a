//! Line-level scanning: line endings, delimiter lines, blank lines and code fences.

use std::borrow::Cow;

/// Replace every `\r\n` with `\n`. Lone `\r` characters are left alone.
pub(crate) fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains("\r\n") {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// One line of the (normalised) document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// Line content without its terminating `\n`
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character, before the `\n`
    pub end: usize,
    /// 0-based row
    pub row: usize,
}

impl Line<'_> {
    /// Byte offset of the next line, clamped to the document length.
    pub fn next_start(&self, len: usize) -> usize {
        (self.end + 1).min(len)
    }
}

/// Split into lines. A final `\n` does not start an extra empty line.
pub(crate) fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (row, text_line) in text.split('\n').enumerate() {
        let end = start + text_line.len();
        if start == text.len() && row > 0 {
            break;
        }
        lines.push(Line {
            text: text_line,
            start,
            end,
            row,
        });
        start = end + 1;
    }
    lines
}

/// `---` (or more hyphens), optionally followed by spaces or tabs.
pub(crate) fn is_delimiter(line: &str) -> bool {
    let trimmed = line.trim_end_matches([' ', '\t']);
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'-')
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// An open fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    marker: u8,
    width: usize,
}

impl Fence {
    /// Recognise an opening fence: up to three spaces, then three or more
    /// backticks or tildes. Backtick fences may not have backticks in their
    /// info string.
    pub fn open(line: &str) -> Option<Fence> {
        let rest = strip_fence_indent(line)?;
        let marker = *rest.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let width = rest.bytes().take_while(|&b| b == marker).count();
        if width < 3 {
            return None;
        }
        if marker == b'`' && rest[width..].contains('`') {
            return None;
        }
        Some(Fence { marker, width })
    }

    /// A closing fence uses the same marker, at least as wide, and nothing
    /// but whitespace after it.
    pub fn is_closed_by(&self, line: &str) -> bool {
        let Some(rest) = strip_fence_indent(line) else {
            return false;
        };
        let width = rest.bytes().take_while(|&b| b == self.marker).count();
        width >= self.width && rest[width..].trim().is_empty()
    }
}

fn strip_fence_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    (indent <= 3).then(|| &line[indent..])
}

/// Trim a body segment: leading and trailing newlines go, indentation stays,
/// and whitespace-only text becomes empty.
pub(crate) fn clean_body(segment: &str) -> &str {
    let trimmed = segment.trim_matches('\n');
    if trimmed.trim().is_empty() { "" } else { trimmed }
}
