//! Error reporting and diagnostic messages for Tonguetoquill.
//!
//! Diagnostics follow a tidyverse-style structure: a short title, an optional
//! problem statement, bulleted details and hints, plus an optional source
//! location. They render either as text (with an `ariadne` source excerpt
//! when the document text is available) or as JSON for the editor's
//! diagnostics pane.
//!
//! Every diagnostic produced by the parser carries a stable error code (e.g.
//! `TQ-1-2`) that maps to an entry in the embedded [`ERROR_CATALOG`].
//!
//! # Example
//!
//! ```
//! use tonguetoquill_error_reporting::DiagnosticMessageBuilder;
//!
//! let error = DiagnosticMessageBuilder::error("Unclosed frontmatter")
//!     .with_code("TQ-1-2")
//!     .problem("The `---` on line 1 opens a metadata block that is never closed")
//!     .add_hint("Did you forget the closing `---`?")
//!     .build();
//!
//! assert!(error.to_text(None).contains("Unclosed frontmatter"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_docs_url, get_error_info};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
