use serde::Deserialize;

/// Per-call parser configuration.
///
/// Deserializes from JSON with every field optional, so hosts can pass
/// `{}` or only the settings they care about:
///
/// ```
/// use tonguetoquill_metadata::ParseOptions;
///
/// let options: ParseOptions = serde_json::from_str(r#"{"strict_scope_names": true}"#).unwrap();
/// assert!(options.strict_scope_names);
/// assert_eq!(options.max_input_bytes, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Reject scope names outside `[a-z_][a-z0-9_]*` instead of warning.
    pub strict_scope_names: bool,

    /// Refuse documents longer than this many bytes.
    pub max_input_bytes: Option<usize>,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            strict_scope_names: true,
            ..Default::default()
        }
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }
}
