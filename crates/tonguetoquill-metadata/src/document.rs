//! The parsed document model handed to the renderer.

use crate::error::ParseWarning;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tonguetoquill_yaml::YamlValue;

/// Name of the reserved body field.
pub const BODY_FIELD: &str = "body";
/// Key that turns a block into a scoped block.
pub const SCOPE_KEY: &str = "SCOPE";
/// Key that names the render template for the document.
pub const QUILL_KEY: &str = "QUILL";

/// One occurrence of a scoped block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopeEntry {
    fields: IndexMap<String, YamlValue>,
    body: String,
}

impl ScopeEntry {
    pub(crate) fn new(fields: IndexMap<String, YamlValue>, body: String) -> Self {
        ScopeEntry { fields, body }
    }

    /// The block's own fields, without `SCOPE`.
    pub fn fields(&self) -> &IndexMap<String, YamlValue> {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&YamlValue> {
        self.fields.get(name)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    fn to_template_context(&self) -> JsonValue {
        let mut map: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), yaml_to_json(value)))
            .collect();
        map.insert(BODY_FIELD.to_string(), JsonValue::String(self.body.clone()));
        JsonValue::Object(map)
    }
}

/// Result of parsing one document: global fields and body, plus every scoped
/// block grouped by scope name.
///
/// Scopes keep the order in which their names first appear; entries within a
/// scope keep document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDocument {
    fields: IndexMap<String, YamlValue>,
    body: String,
    scopes: IndexMap<String, Vec<ScopeEntry>>,
    #[serde(skip)]
    warnings: Vec<ParseWarning>,
}

impl ParsedDocument {
    pub(crate) fn new(
        fields: IndexMap<String, YamlValue>,
        body: String,
        scopes: IndexMap<String, Vec<ScopeEntry>>,
        warnings: Vec<ParseWarning>,
    ) -> Self {
        ParsedDocument {
            fields,
            body,
            scopes,
            warnings,
        }
    }

    /// Global fields, including `QUILL` when present.
    pub fn fields(&self) -> &IndexMap<String, YamlValue> {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&YamlValue> {
        self.fields.get(name)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn scopes(&self) -> &IndexMap<String, Vec<ScopeEntry>> {
        &self.scopes
    }

    /// Entries of one scope; empty when the document has none.
    pub fn scope(&self, name: &str) -> &[ScopeEntry] {
        self.scopes.get(name).map_or(&[], Vec::as_slice)
    }

    /// The `QUILL` template tag, if the document names one.
    pub fn quill_tag(&self) -> Option<&str> {
        self.fields.get(QUILL_KEY).and_then(YamlValue::as_str)
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Flatten into the object the template engine reads: every global
    /// field, `body`, and one array per scope.
    ///
    /// ```
    /// let doc = tonguetoquill_metadata::parse(
    ///     "---\ntitle: Memo\n---\nHello\n\n---\nSCOPE: cards\nname: A\n---\nCard A",
    /// )
    /// .unwrap();
    /// let context = doc.to_template_context();
    /// assert_eq!(context["title"], "Memo");
    /// assert_eq!(context["body"], "Hello");
    /// assert_eq!(context["cards"][0]["name"], "A");
    /// assert_eq!(context["cards"][0]["body"], "Card A");
    /// ```
    pub fn to_template_context(&self) -> JsonValue {
        let mut map: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), yaml_to_json(value)))
            .collect();
        map.insert(BODY_FIELD.to_string(), JsonValue::String(self.body.clone()));
        for (name, entries) in &self.scopes {
            map.insert(
                name.clone(),
                JsonValue::Array(entries.iter().map(ScopeEntry::to_template_context).collect()),
            );
        }
        JsonValue::Object(map)
    }
}

/// Non-finite floats have no JSON form and become `null`.
fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(*b),
        YamlValue::Integer(i) => JsonValue::from(*i),
        YamlValue::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => JsonValue::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), yaml_to_json(value)))
                .collect(),
        ),
    }
}
