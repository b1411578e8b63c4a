//! Line-break index for location lookups

use crate::types::{Location, Range};
use serde::{Deserialize, Serialize};

/// Line-break index over a piece of text.
///
/// Stores the byte offset of every `\n` so that offsets can be converted to
/// (row, column) positions, and rows back to byte ranges, without keeping
/// the text itself around.
///
/// Columns produced here are byte columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Byte offsets of each newline character
    line_breaks: Vec<usize>,

    /// Total length in bytes
    total_length: usize,
}

impl FileInformation {
    /// Scan `content` once and index its line breaks.
    ///
    /// # Example
    ///
    /// ```
    /// use tonguetoquill_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("line 1\nline 2\nline 3");
    /// assert_eq!(info.line_count(), 3);
    /// ```
    pub fn new(content: &str) -> Self {
        let line_breaks: Vec<usize> = content
            .bytes()
            .enumerate()
            .filter_map(|(idx, b)| (b == b'\n').then_some(idx))
            .collect();

        FileInformation {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset to a Location with row and column.
    ///
    /// Runs in O(log n) in the number of lines. Returns None if the offset is
    /// out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use tonguetoquill_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("hello\nworld");
    /// let loc = info.offset_to_location(6).unwrap();
    /// assert_eq!(loc.row, 1);
    /// assert_eq!(loc.column, 0);
    /// ```
    pub fn offset_to_location(&self, offset: usize) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }

        // A newline belongs to the line it terminates, so an exact hit on a
        // break index and the insertion point agree.
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };

        let column = offset - self.line_start(row)?;

        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Byte offset at which `row` starts.
    pub fn line_start(&self, row: usize) -> Option<usize> {
        match row {
            0 => Some(0),
            _ => self.line_breaks.get(row - 1).map(|brk| brk + 1),
        }
    }

    /// Byte span of `row`, excluding its terminating newline.
    ///
    /// # Example
    ///
    /// ```
    /// use tonguetoquill_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("a\nbcd\n");
    /// assert_eq!(info.line_range(1), Some(2..5));
    /// assert_eq!(info.line_range(2), Some(6..6));
    /// assert_eq!(info.line_range(3), None);
    /// ```
    pub fn line_range(&self, row: usize) -> Option<std::ops::Range<usize>> {
        let start = self.line_start(row)?;
        let end = self
            .line_breaks
            .get(row)
            .copied()
            .unwrap_or(self.total_length);
        Some(start..end)
    }

    /// Full [`Range`] of `row`, excluding its terminating newline.
    pub fn row_range(&self, row: usize) -> Option<Range> {
        let span = self.line_range(row)?;
        Some(Range {
            start: Location::new(span.start, row, 0),
            end: Location::new(span.end, row, span.end - span.start),
        })
    }

    /// Total length in bytes
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Number of lines; n newlines make n + 1 lines.
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
