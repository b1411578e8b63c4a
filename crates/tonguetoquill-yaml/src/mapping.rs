//! Top-level frontmatter mapping with key positions.

use crate::value::YamlValue;
use indexmap::IndexMap;
use tonguetoquill_source_map::Location;

/// One top-level entry of a frontmatter header.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlEntry {
    pub value: YamlValue,
    /// Where the key starts, relative to the header text
    pub key_location: Location,
}

/// The root mapping of a frontmatter header.
///
/// Behaves like an ordered map from key to [`YamlValue`] but also remembers
/// where each key was written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YamlMapping {
    entries: IndexMap<String, YamlEntry>,
}

impl YamlMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn get_entry(&self, key: &str) -> Option<&YamlEntry> {
        self.entries.get(key)
    }

    pub fn key_location(&self, key: &str) -> Option<Location> {
        self.entries.get(key).map(|entry| entry.key_location)
    }

    /// Insert an entry, returning the previous one for the same key.
    pub fn insert(&mut self, key: impl Into<String>, entry: YamlEntry) -> Option<YamlEntry> {
        self.entries.insert(key.into(), entry)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<YamlEntry> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &YamlEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Drop key positions and keep only the values.
    pub fn into_values(self) -> IndexMap<String, YamlValue> {
        self.entries
            .into_iter()
            .map(|(key, entry)| (key, entry.value))
            .collect()
    }
}

impl IntoIterator for YamlMapping {
    type Item = (String, YamlEntry);
    type IntoIter = indexmap::map::IntoIter<String, YamlEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
