//! # Schemaless Records
//!
//! [`Record`] is the default [`ResourceEntity`]: an opaque id plus an ordered list of named string
//! [`Fields`]. No schema is enforced; any subset of fields may be present.
//!
//! Updates **merge**: a field named in the update overwrites the field of the same name where it
//! stands, unknown names are appended, and everything else is kept.

use crate::entity::ResourceEntity;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::convert::Infallible;

/// Ordered mapping of field names to string values.
///
/// Insertion order is preserved. Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Merges `other` into `self` following the record update policy.
    pub fn merge(&mut self, other: Fields) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A stored resource: an immutable id and a mapping of named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub fields: Fields,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }
}

/// Serialized flat: `{"id": ..., "<field>": ...}`. A field literally named `id` is shadowed.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in self.fields.iter().filter(|(n, _)| *n != "id") {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl ResourceEntity for Record {
    type Id = String;
    type Create = Fields;
    type Update = Fields;
    type Error = Infallible;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, fields: Fields) -> Result<Self, Self::Error> {
        Ok(Self { id, fields })
    }

    fn on_update(&mut self, update: Fields) -> Result<(), Self::Error> {
        self.fields.merge(update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut fields = Fields::new().with("username", "Bob").with("content", "hi");
        let previous = fields.insert("username", "Alice");

        assert_eq!(previous.as_deref(), Some("Bob"));
        let names: Vec<_> = fields.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["username", "content"]);
        assert_eq!(fields.get("username"), Some("Alice"));
    }

    #[test]
    fn update_merges_and_keeps_id() {
        let mut record =
            Record::from_create_params("p1".into(), Fields::new().with("username", "Bob").with("content", "hi"))
                .unwrap();

        record
            .on_update(Fields::new().with("content", "edited").with("mood", "happy"))
            .unwrap();

        assert_eq!(record.id, "p1");
        assert_eq!(record.get("username"), Some("Bob"));
        assert_eq!(record.get("content"), Some("edited"));
        assert_eq!(record.get("mood"), Some("happy"));
    }

    #[test]
    fn record_serializes_flat() {
        let record = Record {
            id: "p1".into(),
            fields: Fields::new().with("id", "spoofed").with("content", "hi"),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "p1", "content": "hi" }));
    }
}
