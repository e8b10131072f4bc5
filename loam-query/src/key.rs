//! Identifier resolution and key values.
//!
//! A [`KeySpec`] is the resolved identifier of a model: the ordered column
//! sequence used to address rows. A [`RecordKey`] is one record's value for
//! that identifier, usable both as a hash-map key when matching fetched rows
//! back to in-memory records and as a query filter value.

use std::hash::{Hash, Hasher};

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::error::{LoadError, LoadResult};
use crate::record::Record;
use crate::row::Row;
use crate::schema::ModelSchema;
use crate::value::FieldValue;

/// The resolved identifier of a model.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec<'a> {
    model: &'a str,
    columns: &'a [SmolStr],
}

impl<'a> KeySpec<'a> {
    /// Resolve a model's identifier columns.
    ///
    /// Fails with [`LoadError::MissingIdentifier`] when the model declares
    /// none; keyed lookups are impossible for such models.
    pub fn resolve(schema: &'a ModelSchema) -> LoadResult<Self> {
        let columns = schema.identifier_columns();
        if columns.is_empty() {
            return Err(LoadError::missing_identifier(schema.name().as_str()));
        }
        Ok(Self {
            model: schema.name().as_str(),
            columns,
        })
    }

    /// The model this identifier belongs to.
    pub fn model(&self) -> &str {
        self.model
    }

    /// The ordered identifier column names.
    pub fn columns(&self) -> &'a [SmolStr] {
        self.columns
    }

    /// Whether the identifier spans more than one column.
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// A record's key value.
    ///
    /// Total: an identifier column absent from the record's store
    /// contributes `Null`, producing a key that matches no stored row.
    pub fn key_of(&self, record: &Record) -> RecordKey {
        if self.is_composite() {
            RecordKey::Composite(
                self.columns
                    .iter()
                    .map(|column| record.value(column).unwrap_or(FieldValue::Null))
                    .collect(),
            )
        } else {
            RecordKey::Scalar(record.value(&self.columns[0]).unwrap_or(FieldValue::Null))
        }
    }

    /// A fetched row's key value, `None` if the row lacks an identifier
    /// column.
    pub fn key_of_row(&self, row: &Row) -> Option<RecordKey> {
        if self.is_composite() {
            let mut parts = SmallVec::with_capacity(self.columns.len());
            for column in self.columns {
                parts.push(row.get(column)?.clone());
            }
            Some(RecordKey::Composite(parts))
        } else {
            row.get(&self.columns[0]).cloned().map(RecordKey::Scalar)
        }
    }
}

/// One record's identifier value: a scalar, or an ordered tuple for
/// composite identifiers.
#[derive(Debug, Clone)]
pub enum RecordKey {
    /// Single-column identifier value.
    Scalar(FieldValue),
    /// Multi-column identifier value, in identifier-column order.
    Composite(SmallVec<[FieldValue; 2]>),
}

impl RecordKey {
    /// The key's parts, in identifier-column order.
    pub fn parts(&self) -> &[FieldValue] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Composite(parts) => parts,
        }
    }
}

// Keys compare and hash structurally; floats key by bit pattern so that
// equality and hashing stay consistent.
fn value_eq(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Float(x), FieldValue::Float(y)) => x.to_bits() == y.to_bits(),
        (FieldValue::List(x), FieldValue::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| value_eq(a, b))
        }
        _ => a == b,
    }
}

fn value_hash<H: Hasher>(value: &FieldValue, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        FieldValue::Null => {}
        FieldValue::Bool(b) => b.hash(state),
        FieldValue::Int(i) => i.hash(state),
        FieldValue::Float(f) => f.to_bits().hash(state),
        FieldValue::String(s) => s.hash(state),
        FieldValue::Bytes(b) => b.hash(state),
        FieldValue::Uuid(u) => u.hash(state),
        FieldValue::DateTime(d) => d.hash(state),
        FieldValue::Json(j) => j.to_string().hash(state),
        FieldValue::List(items) => {
            items.len().hash(state);
            for item in items {
                value_hash(item, state);
            }
        }
    }
}

impl PartialEq for RecordKey {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.parts(), other.parts());
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| value_eq(x, y))
    }
}

impl Eq for RecordKey {}

impl Hash for RecordKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let parts = self.parts();
        parts.len().hash(state);
        for part in parts {
            value_hash(part, state);
        }
    }
}
