//! YAML parser that builds YamlValue trees from the marked event stream.

use crate::{Error, Result, YamlEntry, YamlMapping, YamlValue};
use std::collections::HashMap;
use tonguetoquill_source_map::{FileInformation, Location};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse a single YAML document into a [`YamlValue`].
///
/// An empty input (or one holding only comments) parses as `Null`. If the
/// input contains multiple documents, only the first one is read.
///
/// # Example
///
/// ```rust
/// use tonguetoquill_yaml::{parse, YamlValue};
///
/// let value = parse("[1, two, 3.5]").unwrap();
/// assert_eq!(value.as_sequence().map(<[YamlValue]>::len), Some(3));
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is syntactically invalid, repeats a key, or
/// uses a non-scalar mapping key.
pub fn parse(content: &str) -> Result<YamlValue> {
    Ok(match parse_impl(content)? {
        Root::Empty => YamlValue::Null,
        Root::Mapping(mapping) => YamlValue::Mapping(mapping.into_values()),
        Root::Value(value, _) => value,
    })
}

/// Parse a frontmatter header, which must be a mapping.
///
/// An empty header, a comment-only header and an explicit `null` all yield
/// an empty mapping.
///
/// # Errors
///
/// In addition to the errors of [`parse`], returns [`Error::NotAMapping`]
/// when the root is a scalar or a sequence.
pub fn parse_mapping(content: &str) -> Result<YamlMapping> {
    match parse_impl(content)? {
        Root::Empty | Root::Value(YamlValue::Null, _) => Ok(YamlMapping::new()),
        Root::Mapping(mapping) => Ok(mapping),
        Root::Value(value, location) => Err(Error::NotAMapping {
            found: value.type_name(),
            location,
        }),
    }
}

fn parse_impl(content: &str) -> Result<Root> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = YamlBuilder::new(content);

    // false = single document only
    if let Err(err) = parser.load(&mut builder, false) {
        let location = builder.locate(err.marker());
        return Err(Error::Syntax {
            message: err.info().to_string(),
            location,
        });
    }

    builder.finish()
}

/// Parsed root of a document.
enum Root {
    Empty,
    Mapping(YamlMapping),
    Value(YamlValue, Location),
}

/// A node that has been fully built and is waiting to be attached to its
/// parent.
struct Completed {
    value: YamlValue,
    /// Raw scalar text, used when the node turns out to be a mapping key
    key_text: Option<String>,
    location: Location,
}

/// A node being constructed during parsing.
enum BuildNode {
    Sequence {
        anchor_id: usize,
        location: Location,
        items: Vec<YamlValue>,
    },
    Mapping {
        anchor_id: usize,
        location: Location,
        entries: YamlMapping,
        pending_key: Option<(String, Location)>,
    },
}

/// Builder that implements MarkedEventReceiver to construct YamlValue trees.
struct YamlBuilder<'a> {
    source: &'a str,
    file_info: FileInformation,
    /// Byte offset of each char; `None` for ASCII input, where they coincide
    char_offsets: Option<Vec<usize>>,
    stack: Vec<BuildNode>,
    /// Values of anchored nodes, for alias resolution
    anchors: HashMap<usize, YamlValue>,
    root: Option<Root>,
    /// First structural error; events after it are ignored
    error: Option<Error>,
}

impl<'a> YamlBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            file_info: FileInformation::new(source),
            char_offsets: (!source.is_ascii())
                .then(|| source.char_indices().map(|(idx, _)| idx).collect()),
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn finish(self) -> Result<Root> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root.unwrap_or(Root::Empty)),
        }
    }

    /// Convert a scanner marker into a location in the header.
    ///
    /// Markers count characters, locations count bytes.
    fn locate(&self, marker: &Marker) -> Location {
        let offset = match &self.char_offsets {
            None => marker.index().min(self.source.len()),
            Some(offsets) => offsets
                .get(marker.index())
                .copied()
                .unwrap_or(self.source.len()),
        };
        self.file_info
            .offset_to_location(offset)
            .unwrap_or_default()
    }

    fn remember(&mut self, anchor_id: usize, value: &YamlValue) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, value.clone());
        }
    }

    fn push_complete(&mut self, node: Completed) {
        if let Err(err) = self.attach(node) {
            self.error = Some(err);
        }
    }

    fn attach(&mut self, node: Completed) -> Result<()> {
        let Some(parent) = self.stack.last_mut() else {
            self.root = Some(Root::Value(node.value, node.location));
            return Ok(());
        };

        match parent {
            BuildNode::Sequence { items, .. } => items.push(node.value),
            BuildNode::Mapping {
                entries,
                pending_key,
                ..
            } => match pending_key.take() {
                Some((key, key_location)) => {
                    entries.insert(
                        key,
                        YamlEntry {
                            value: node.value,
                            key_location,
                        },
                    );
                }
                None => {
                    let Some(key) = node.key_text else {
                        return Err(Error::InvalidKey {
                            found: node.value.type_name(),
                            location: node.location,
                        });
                    };
                    if entries.contains_key(&key) {
                        return Err(Error::DuplicateKey {
                            key,
                            location: node.location,
                        });
                    }
                    *pending_key = Some((key, node.location));
                }
            },
        }
        Ok(())
    }
}

impl MarkedEventReceiver for YamlBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(text, style, anchor_id, tag) => {
                let value = resolve_scalar(&text, style, tag.as_ref());
                self.remember(anchor_id, &value);
                let location = self.locate(&marker);
                self.push_complete(Completed {
                    value,
                    key_text: Some(text),
                    location,
                });
            }

            Event::SequenceStart(anchor_id, _tag) => {
                let location = self.locate(&marker);
                self.stack.push(BuildNode::Sequence {
                    anchor_id,
                    location,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                // The parser guarantees balanced start/end events.
                if let Some(BuildNode::Sequence {
                    anchor_id,
                    location,
                    items,
                }) = self.stack.pop()
                {
                    let value = YamlValue::Sequence(items);
                    self.remember(anchor_id, &value);
                    self.push_complete(Completed {
                        value,
                        key_text: None,
                        location,
                    });
                }
            }

            Event::MappingStart(anchor_id, _tag) => {
                let location = self.locate(&marker);
                self.stack.push(BuildNode::Mapping {
                    anchor_id,
                    location,
                    entries: YamlMapping::new(),
                    pending_key: None,
                });
            }

            Event::MappingEnd => {
                if let Some(BuildNode::Mapping {
                    anchor_id,
                    location,
                    entries,
                    ..
                }) = self.stack.pop()
                {
                    if self.stack.is_empty() {
                        if anchor_id > 0 {
                            let value = YamlValue::Mapping(entries.clone().into_values());
                            self.remember(anchor_id, &value);
                        }
                        self.root = Some(Root::Mapping(entries));
                        return;
                    }

                    let value = YamlValue::Mapping(entries.into_values());
                    self.remember(anchor_id, &value);
                    self.push_complete(Completed {
                        value,
                        key_text: None,
                        location,
                    });
                }
            }

            Event::Alias(anchor_id) => {
                let value = self
                    .anchors
                    .get(&anchor_id)
                    .cloned()
                    .unwrap_or(YamlValue::Null);
                let key_text = value.as_str().map(str::to_string);
                let location = self.locate(&marker);
                self.push_complete(Completed {
                    value,
                    key_text,
                    location,
                });
            }

            _ => {}
        }
    }
}

const CORE_TAG_HANDLE: &str = "tag:yaml.org,2002:";

/// Resolve a scalar to a typed value using the YAML 1.2 core schema.
///
/// Only plain scalars are inferred; quoted and block scalars are strings.
/// Explicit core tags (`!!str`, `!!int`, ...) override inference.
fn resolve_scalar(text: &str, style: TScalarStyle, tag: Option<&Tag>) -> YamlValue {
    if let Some(tag) = tag {
        if tag.handle == CORE_TAG_HANDLE || tag.handle == "!!" {
            let resolved = match tag.suffix.as_str() {
                "null" => Some(YamlValue::Null),
                "bool" => resolve_bool(text).map(YamlValue::Bool),
                "int" => resolve_int(text).map(YamlValue::Integer),
                "float" => resolve_float(text)
                    .or_else(|| resolve_int(text).map(|i| i as f64))
                    .map(YamlValue::Float),
                _ => None,
            };
            return resolved.unwrap_or_else(|| YamlValue::String(text.to_string()));
        }
        // Application tags mean nothing to the renderer; keep the text.
        return YamlValue::String(text.to_string());
    }

    if !matches!(style, TScalarStyle::Plain) {
        return YamlValue::String(text.to_string());
    }

    if matches!(text, "" | "~" | "null" | "Null" | "NULL") {
        return YamlValue::Null;
    }
    if let Some(b) = resolve_bool(text) {
        return YamlValue::Bool(b);
    }
    if let Some(i) = resolve_int(text) {
        return YamlValue::Integer(i);
    }
    if let Some(f) = resolve_float(text) {
        return YamlValue::Float(f);
    }
    YamlValue::String(text.to_string())
}

fn resolve_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn resolve_int(text: &str) -> Option<i64> {
    for (prefix, radix) in [("0x", 16), ("0o", 8)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            if !all_digits(digits, radix) {
                return None;
            }
            return i64::from_str_radix(digits, radix).ok();
        }
    }
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if !all_digits(digits, 10) {
        return None;
    }
    text.parse().ok()
}

fn resolve_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ if looks_like_float(text) => text.parse().ok(),
        _ => None,
    }
}

fn all_digits(text: &str, radix: u32) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_digit(radix))
}

/// `[-+]? ( \. [0-9]+ | [0-9]+ ( \. [0-9]* )? ) ( [eE] [-+]? [0-9]+ )?`
fn looks_like_float(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(idx) => (&unsigned[..idx], Some(&unsigned[idx + 1..])),
        None => (unsigned, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some(("", frac)) => all_digits(frac, 10),
        Some((int, frac)) => all_digits(int, 10) && (frac.is_empty() || all_digits(frac, 10)),
        None => all_digits(mantissa, 10),
    };

    let exponent_ok = exponent.is_none_or(|exp| {
        let exp = exp.strip_prefix(['-', '+']).unwrap_or(exp);
        all_digits(exp, 10)
    });

    mantissa_ok && exponent_ok
}
