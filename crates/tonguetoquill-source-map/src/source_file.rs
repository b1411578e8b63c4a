//! In-memory source files used for diagnostic rendering

use crate::file_info::FileInformation;
use crate::types::{Location, Range};
use serde::{Deserialize, Serialize};

/// A named piece of source text with its line index.
///
/// Documents in the editor never touch the disk, so unlike a compiler's
/// source context there is no lazy loading here: the content is always held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or display identifier (e.g. `<document>`)
    pub path: String,
    /// File content
    pub content: String,
    #[serde(skip)]
    file_info: Option<FileInformation>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let file_info = Some(FileInformation::new(&content));
        SourceFile {
            path: path.into(),
            content,
            file_info,
        }
    }

    /// Line index for this file, rebuilt if the file was deserialized.
    pub fn info(&self) -> FileInformation {
        self.file_info
            .clone()
            .unwrap_or_else(|| FileInformation::new(&self.content))
    }

    pub fn offset_to_location(&self, offset: usize) -> Option<Location> {
        match &self.file_info {
            Some(info) => info.offset_to_location(offset),
            None => FileInformation::new(&self.content).offset_to_location(offset),
        }
    }

    /// Range covering the given 0-based row.
    pub fn row_range(&self, row: usize) -> Option<Range> {
        match &self.file_info {
            Some(info) => info.row_range(row),
            None => FileInformation::new(&self.content).row_range(row),
        }
    }
}
