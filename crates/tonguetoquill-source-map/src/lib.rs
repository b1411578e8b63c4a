//! Source positions for Tonguetoquill
//!
//! Small, dependency-light types for pointing into a document: byte offsets
//! with 0-based row/column, ranges, and a line-break index that answers
//! offset-to-position and row-to-range queries without rescanning the text.
//!
//! # Example
//!
//! ```rust
//! use tonguetoquill_source_map::*;
//!
//! let info = FileInformation::new("---\ntitle: Hello\n---\nBody");
//! let loc = info.offset_to_location(4).unwrap();
//! assert_eq!(loc.row, 1);
//! assert_eq!(loc.column, 0);
//!
//! assert_eq!(info.line_range(1), Some(4..16));
//! ```

pub mod file_info;
pub mod source_file;
pub mod types;

pub use file_info::FileInformation;
pub use source_file::SourceFile;
pub use types::{Location, Range};
