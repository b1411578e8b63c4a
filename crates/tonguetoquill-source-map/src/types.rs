//! Core position types

use serde::{Deserialize, Serialize};

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl Location {
    pub fn new(offset: usize, row: usize, column: usize) -> Self {
        Location {
            offset,
            row,
            column,
        }
    }

    /// Shift this location by a base location.
    ///
    /// Used to turn a position relative to an embedded region (a frontmatter
    /// header, say) into a position in the enclosing document. The column is
    /// only shifted when the location is on the region's first row.
    pub fn relative_to(self, base: Location) -> Location {
        Location {
            offset: base.offset + self.offset,
            row: base.row + self.row,
            column: if self.row == 0 {
                base.column + self.column
            } else {
                self.column
            },
        }
    }
}

/// A range in source text from start to end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Range {
    pub fn new(start: Location, end: Location) -> Self {
        Range { start, end }
    }

    /// Byte span of this range, suitable for slicing the source text.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
