//! Collaborator traits.

use smol_str::SmolStr;

use crate::error::QueryResult;
use crate::key::RecordKey;
use crate::row::Row;
use crate::value::FieldValue;

/// Boxed future type used throughout the engine traits.
pub use futures::future::BoxFuture;

/// A query-execution collaborator.
///
/// The loading core never builds SQL; it asks the engine for exactly two
/// shapes of select and propagates engine failures unchanged. Engines take
/// owned arguments so implementations can move them into their futures.
pub trait QueryEngine: Send + Sync {
    /// Select `columns` from `table` for rows whose identifier value (the
    /// `key_columns` tuple) is in `keys`.
    fn select_by_keys(
        &self,
        table: SmolStr,
        columns: Vec<SmolStr>,
        key_columns: Vec<SmolStr>,
        keys: Vec<RecordKey>,
    ) -> BoxFuture<'_, QueryResult<Vec<Row>>>;

    /// Select `columns` from `table` for rows where every `(column, value)`
    /// pair in `matching` holds exactly.
    fn select_by_values(
        &self,
        table: SmolStr,
        columns: Vec<SmolStr>,
        matching: Vec<(SmolStr, FieldValue)>,
    ) -> BoxFuture<'_, QueryResult<Vec<Row>>>;
}

impl<E: QueryEngine + ?Sized> QueryEngine for std::sync::Arc<E> {
    fn select_by_keys(
        &self,
        table: SmolStr,
        columns: Vec<SmolStr>,
        key_columns: Vec<SmolStr>,
        keys: Vec<RecordKey>,
    ) -> BoxFuture<'_, QueryResult<Vec<Row>>> {
        (**self).select_by_keys(table, columns, key_columns, keys)
    }

    fn select_by_values(
        &self,
        table: SmolStr,
        columns: Vec<SmolStr>,
        matching: Vec<(SmolStr, FieldValue)>,
    ) -> BoxFuture<'_, QueryResult<Vec<Row>>> {
        (**self).select_by_values(table, columns, matching)
    }
}
