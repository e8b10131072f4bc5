//! Attribute values and the per-record value store.
//!
//! The value store is an ordered attribute→value mapping with explicit
//! presence: "never fetched" and "fetched and NULL" are different states,
//! and the loader's decisions depend on telling them apart.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// Bytes value.
    Bytes(Vec<u8>),
    /// UUID as string.
    Uuid(String),
    /// DateTime as ISO string.
    DateTime(String),
    /// JSON value.
    Json(serde_json::Value),
    /// List of values.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// An ordered attribute→value mapping with explicit presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueStore {
    entries: IndexMap<SmolStr, FieldValue>,
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an attribute is present (possibly as `Null`).
    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.contains_key(attribute)
    }

    /// Get an attribute's value, if present.
    pub fn get(&self, attribute: &str) -> Option<&FieldValue> {
        self.entries.get(attribute)
    }

    /// Set an attribute's value, overwriting any existing entry.
    ///
    /// This is the hydration write path; the loader itself only ever uses
    /// [`ValueStore::fill`].
    pub fn set(&mut self, attribute: impl Into<SmolStr>, value: impl Into<FieldValue>) {
        self.entries.insert(attribute.into(), value.into());
    }

    /// Set an attribute's value only if it is absent.
    ///
    /// Returns `true` if the value was written. Present entries are never
    /// overwritten, which makes concurrent double-population harmless.
    pub fn fill(&mut self, attribute: impl Into<SmolStr>, value: impl Into<FieldValue>) -> bool {
        match self.entries.entry(attribute.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
        }
    }

    /// Number of present attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no attributes are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over present attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &FieldValue)> {
        self.entries.iter()
    }
}

impl<K: Into<SmolStr>, V: Into<FieldValue>> FromIterator<(K, V)> for ValueStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ValueStore {
    type Item = (SmolStr, FieldValue);
    type IntoIter = indexmap::map::IntoIter<SmolStr, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
