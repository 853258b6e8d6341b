// src/rows/row.rs

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    error::{CsvError, Result},
    value::{FieldKind, FromField, Value},
};

/// One row keyed by header name.
///
/// Keys keep header order. Values are stored as read and only trimmed and
/// coerced when a typed getter asks for them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappedRow {
    fields: Vec<(String, String)>,
}

impl MappedRow {
    /// Pair `header[i]` with `values[i]` for every position both have.
    pub fn zip(header: &[String], values: Vec<String>) -> Self {
        let mut row = MappedRow {
            fields: Vec::with_capacity(header.len().min(values.len())),
        };
        for (name, value) in header.iter().zip(values) {
            row.insert(name.clone(), value);
        }
        row
    }

    /// Insert a value; a repeated name overwrites the earlier value in place.
    pub fn insert(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// The value exactly as split from the line.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }

    /// Read `key` as `kind`, trimming surrounding whitespace first.
    pub fn get(&self, key: &str, kind: FieldKind) -> Result<Value> {
        let raw = self
            .get_raw(key)
            .ok_or_else(|| CsvError::KeyNotFound(key.to_string()))?;
        kind.coerce(raw.trim())
    }

    /// Typed extraction driven by the target type.
    pub fn get_as<T: FromField>(&self, key: &str) -> Result<T> {
        let value = self.get(key, T::KIND)?;
        // coerce always yields the requested kind
        T::from_value(value).ok_or_else(|| CsvError::UnsupportedKind(T::KIND.to_string()))
    }

    pub fn get_int(&self, key: &str) -> Result<i32> {
        self.get_as(key)
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_as(key)
    }

    pub fn get_double(&self, key: &str) -> Result<f64> {
        self.get_as(key)
    }

    pub fn get_boolean(&self, key: &str) -> Result<bool> {
        self.get_as(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for MappedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
