//! # tonguetoquill-yaml
//!
//! YAML parsing for frontmatter headers.
//!
//! A header is parsed straight from `yaml-rust2`'s marked event stream into
//! [`YamlValue`], a dynamically typed tree the renderer can pattern-match on.
//! Top-level keys keep the position at which they appear so that callers can
//! point diagnostics at the exact key rather than at the whole block.
//!
//! ## Example
//!
//! ```rust
//! use tonguetoquill_yaml::{parse_mapping, YamlValue};
//!
//! let header = "title: My Document\ncount: 3\n";
//! let mapping = parse_mapping(header).unwrap();
//!
//! assert_eq!(mapping.get("title").and_then(YamlValue::as_str), Some("My Document"));
//! assert_eq!(mapping.get("count").and_then(YamlValue::as_i64), Some(3));
//! assert_eq!(mapping.key_location("count").map(|loc| loc.row), Some(1));
//! ```

mod error;
mod mapping;
mod parser;
mod value;

pub use error::{Error, Result};
pub use mapping::{YamlEntry, YamlMapping};
pub use parser::{parse, parse_mapping};
pub use tonguetoquill_source_map::Location;
pub use value::YamlValue;
