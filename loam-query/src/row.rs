//! Result rows returned by query-execution collaborators.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::value::{FieldValue, ValueStore};

/// A single result row: an ordered column→value mapping.
///
/// Every selected column is present in the row; a column whose stored value
/// is SQL NULL carries [`FieldValue::Null`] rather than being omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: IndexMap<SmolStr, FieldValue>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any existing entry.
    pub fn set(&mut self, column: impl Into<SmolStr>, value: impl Into<FieldValue>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Builder-style variant of [`Row::set`].
    pub fn with(mut self, column: impl Into<SmolStr>, value: impl Into<FieldValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Get a column value, if the column was selected.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.columns.get(column)
    }

    /// Remove and return a column value.
    pub fn take(&mut self, column: &str) -> Option<FieldValue> {
        self.columns.shift_remove(column)
    }

    /// Check whether a column is present.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over columns in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &FieldValue)> {
        self.columns.iter()
    }

    /// Convert the row into a value store, e.g. when hydrating a record.
    pub fn into_store(self) -> ValueStore {
        self.columns.into_iter().collect()
    }
}

impl<K: Into<SmolStr>, V: Into<FieldValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
