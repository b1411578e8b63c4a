//! Error types for frontmatter YAML parsing.

use tonguetoquill_source_map::Location;

/// Result type alias for tonguetoquill-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a frontmatter header.
///
/// Locations are relative to the header text that was parsed, not to the
/// enclosing document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("{message}")]
    Syntax { message: String, location: Location },

    /// The header parsed, but its root is not a mapping
    #[error("expected a mapping of keys to values, found {found}")]
    NotAMapping {
        found: &'static str,
        location: Location,
    },

    /// The same key appears twice in one mapping
    #[error("duplicate key `{key}`")]
    DuplicateKey { key: String, location: Location },

    /// A mapping key that is not a scalar
    #[error("mapping keys must be scalars, found {found}")]
    InvalidKey {
        found: &'static str,
        location: Location,
    },
}

impl Error {
    /// Position of the problem inside the parsed header.
    pub fn location(&self) -> Location {
        match self {
            Error::Syntax { location, .. }
            | Error::NotAMapping { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::InvalidKey { location, .. } => *location,
        }
    }
}
