//! Model schema declarations.
//!
//! A [`ModelSchema`] describes a record type at the level the loader cares
//! about: its persistable columns, the ordered identifier column sequence,
//! per-column declared defaults, and which attributes are lazy. Marking an
//! attribute lazy removes it from the default-select set; every bulk load
//! built from [`ModelSchema::default_select`] then excludes it, and the
//! attribute is fetched on first access instead.
//!
//! # Example
//!
//! ```rust
//! use loam_query::schema::ModelSchema;
//!
//! let mut schema = ModelSchema::builder("Post", "posts")
//!     .columns(["id", "title", "body"])
//!     .identifier(["id"])
//!     .build();
//! schema.declare_lazy(["body"]);
//!
//! assert_eq!(schema.default_select(), ["id", "title"]);
//! assert!(schema.is_lazy("body"));
//! ```

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use tracing::warn;

use crate::value::FieldValue;

/// Schema-level description of a record type.
#[derive(Debug, Clone, Default)]
pub struct ModelSchema {
    name: SmolStr,
    table: SmolStr,
    columns: IndexSet<SmolStr>,
    identifier: Vec<SmolStr>,
    defaults: IndexMap<SmolStr, FieldValue>,
    lazy: IndexSet<SmolStr>,
}

impl ModelSchema {
    /// Start building a schema for the given model and table names.
    pub fn builder(name: impl Into<SmolStr>, table: impl Into<SmolStr>) -> ModelSchemaBuilder {
        ModelSchemaBuilder {
            schema: Self {
                name: name.into(),
                table: table.into(),
                ..Self::default()
            },
        }
    }

    /// The model name, used in error messages and logging.
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    /// The backing table name.
    pub fn table(&self) -> &SmolStr {
        &self.table
    }

    /// The full persistable column set, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &SmolStr> {
        self.columns.iter()
    }

    /// Check whether a column is declared on this model.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// The ordered identifier column sequence. Empty when the model has no
    /// unique key.
    pub fn identifier_columns(&self) -> &[SmolStr] {
        &self.identifier
    }

    /// The declared default for an attribute, `Null` if none was declared.
    pub fn default_of(&self, attribute: &str) -> FieldValue {
        self.defaults
            .get(attribute)
            .cloned()
            .unwrap_or(FieldValue::Null)
    }

    /// Check whether an attribute has been declared lazy.
    pub fn is_lazy(&self, attribute: &str) -> bool {
        self.lazy.contains(attribute)
    }

    /// The lazy attribute names, in declaration order.
    pub fn lazy_attributes(&self) -> impl Iterator<Item = &SmolStr> {
        self.lazy.iter()
    }

    /// Mark attributes as lazy, excluding them from [`ModelSchema::default_select`].
    ///
    /// Repeated calls merge: the lazy set is the union of every declaration.
    /// Names that are not declared columns are skipped with a warning.
    pub fn declare_lazy(&mut self, attributes: impl IntoIterator<Item = impl Into<SmolStr>>) {
        for attribute in attributes {
            let attribute = attribute.into();
            if !self.columns.contains(&attribute) {
                warn!(
                    model = %self.name,
                    attribute = %attribute,
                    "declare_lazy skipped an attribute that is not a declared column"
                );
                continue;
            }
            self.lazy.insert(attribute);
        }
    }

    /// The columns selected by default bulk loads: declared columns minus
    /// the lazy set, in column order.
    pub fn default_select(&self) -> Vec<SmolStr> {
        self.columns
            .iter()
            .filter(|column| !self.lazy.contains(column.as_str()))
            .cloned()
            .collect()
    }
}

/// Builder for [`ModelSchema`].
#[derive(Debug)]
pub struct ModelSchemaBuilder {
    schema: ModelSchema,
}

impl ModelSchemaBuilder {
    /// Declare the persistable columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        self.schema.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the identifier column sequence (single or composite).
    pub fn identifier(mut self, columns: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        self.schema.identifier = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Declare a default value for a column, returned for attributes read
    /// on records that have not been persisted yet.
    pub fn default(
        mut self,
        column: impl Into<SmolStr>,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.schema.defaults.insert(column.into(), value.into());
        self
    }

    /// Declare attributes as lazy at build time.
    pub fn lazy(mut self, attributes: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        self.schema.declare_lazy(attributes);
        self
    }

    /// Finish building the schema.
    pub fn build(self) -> ModelSchema {
        self.schema
    }
}
