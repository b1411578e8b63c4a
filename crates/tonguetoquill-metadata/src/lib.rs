//! # tonguetoquill-metadata
//!
//! Splits a markdown document into global metadata, a body, and named
//! collections of scoped sub-documents.
//!
//! A document may open with a frontmatter block and contain further blocks
//! below it, each delimited by `---` lines:
//!
//! - a block with a `SCOPE` key is a scoped block; blocks sharing a scope
//!   name are collected in document order;
//! - a block with a `QUILL` key names the render template and contributes
//!   its fields to the global metadata;
//! - any other block is the (single) global frontmatter block.
//!
//! A `---` with a blank line above and below is a horizontal rule unless it
//! opens a block whose header is a YAML mapping.
//!
//! ```
//! use tonguetoquill_metadata::parse;
//!
//! let doc = parse(
//!     "---\ntitle: Orders\n---\nPreamble.\n\n---\nSCOPE: items\nname: Pen\n---\nBlue ink.\n",
//! )
//! .unwrap();
//!
//! assert_eq!(doc.body(), "Preamble.");
//! assert_eq!(doc.scope("items")[0].body(), "Blue ink.");
//! ```

mod blocks;
mod document;
mod error;
mod options;
mod parser;
mod scan;

pub use document::{BODY_FIELD, ParsedDocument, QUILL_KEY, SCOPE_KEY, ScopeEntry};
pub use error::{Collision, ParseError, ParseErrorKind, ParseWarning};
pub use options::ParseOptions;
pub use parser::{is_valid_scope_name, parse, parse_with_options};
pub use tonguetoquill_yaml::YamlValue;
