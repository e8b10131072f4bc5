//! The batch fetch coordinator.
//!
//! [`LazyLoader`] resolves a lazy attribute for one record while keeping the
//! rest of its cohort out of the N+1 trap: the first access to an attribute
//! missing across a cohort issues a single coalesced query scoped to every
//! member still needing it, and caches each returned value on its record.
//! Attributes never accessed are never fetched for any member.
//!
//! # Example
//!
//! ```rust,ignore
//! use loam_query::loader::LazyLoader;
//!
//! let loader = LazyLoader::new(engine);
//!
//! // One query fetches `body` for every cohort member still missing it.
//! let body = loader.get(&posts[2], "body").await?;
//! ```

use std::collections::HashMap;

use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::accessor::{Accessor, DefaultAccessor};
use crate::error::LoadResult;
use crate::key::{KeySpec, RecordKey};
use crate::record::Record;
use crate::schema::ModelSchema;
use crate::traits::QueryEngine;
use crate::value::FieldValue;

/// Coordinates lazy attribute fetches against a query engine.
pub struct LazyLoader<E: QueryEngine> {
    engine: E,
}

impl<E: QueryEngine> LazyLoader<E> {
    /// Create a loader over the given engine.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Read an attribute through the lazy accessor.
    ///
    /// Present values are returned as-is. New (unpersisted) records return
    /// the schema's declared default without touching the engine. Absent
    /// lazy attributes on persisted records are resolved via
    /// [`LazyLoader::fetch`]; absent non-lazy attributes read as `Null`.
    pub async fn get(&self, record: &Record, attribute: &str) -> LoadResult<FieldValue> {
        DefaultAccessor.read(self, record, attribute).await
    }

    /// Fetch an absent attribute for a persisted record.
    ///
    /// Resolution order: frozen records are answered with a read-only
    /// lookup; records loaded in a cohort trigger one coalesced query for
    /// every member still missing the attribute; everything else (and a
    /// requester whose row vanished from the batch result) falls back to a
    /// single-record query.
    pub async fn fetch(&self, record: &Record, attribute: &str) -> LoadResult<FieldValue> {
        let schema = record.schema().clone();

        if record.is_frozen() {
            return self.fetch_frozen(&schema, record, attribute).await;
        }

        let key = KeySpec::resolve(&schema)?;

        if let Some(cohort) = record.cohort() {
            let _gate = cohort.gate().lock().await;

            // An overlapping fetch may have resolved the value while we
            // waited on the gate.
            if let Some(value) = record.value(attribute) {
                return Ok(value);
            }

            // A lone target can only be the requester itself; the singleton
            // query below covers it without a redundant batch.
            let targets = cohort.members_needing(attribute);
            if targets.len() > 1 {
                self.fetch_cohort(&schema, &key, &targets, attribute).await?;
                if let Some(value) = record.value(attribute) {
                    return Ok(value);
                }
                // The requester's row was absent from the batch result
                // (deleted since the original load); resolve it singly.
            }
        }

        self.fetch_single(&schema, &key, record, attribute).await
    }

    /// Issue the coalesced cohort query and cache each returned value on
    /// the record whose full key tuple matches.
    async fn fetch_cohort(
        &self,
        schema: &ModelSchema,
        key: &KeySpec<'_>,
        targets: &[Record],
        attribute: &str,
    ) -> LoadResult<()> {
        let mut pending: HashMap<RecordKey, Record> = HashMap::with_capacity(targets.len());
        for member in targets {
            pending.insert(key.key_of(member), member.clone());
        }

        let mut columns: Vec<SmolStr> = key.columns().to_vec();
        if !columns.iter().any(|c| c.as_str() == attribute) {
            columns.push(SmolStr::new(attribute));
        }
        let keys: Vec<RecordKey> = pending.keys().cloned().collect();

        debug!(
            model = %schema.name(),
            attribute,
            targets = keys.len(),
            "coalescing lazy attribute fetch across cohort"
        );

        let rows = self
            .engine
            .select_by_keys(
                schema.table().clone(),
                columns,
                key.columns().to_vec(),
                keys,
            )
            .await?;

        for mut row in rows {
            let Some(row_key) = key.key_of_row(&row) else {
                warn!(
                    model = %schema.name(),
                    "batch result row lacks identifier columns; skipped"
                );
                continue;
            };
            if let Some(member) = pending.get(&row_key) {
                if let Some(value) = row.take(attribute) {
                    member.fill(attribute, value);
                }
            }
        }

        Ok(())
    }

    /// Fetch the attribute for exactly one record, caching the result
    /// (including a `Null` for a row that no longer exists).
    async fn fetch_single(
        &self,
        schema: &ModelSchema,
        key: &KeySpec<'_>,
        record: &Record,
        attribute: &str,
    ) -> LoadResult<FieldValue> {
        debug!(
            model = %schema.name(),
            attribute,
            "fetching lazy attribute for a single record"
        );

        let rows = self
            .engine
            .select_by_keys(
                schema.table().clone(),
                vec![SmolStr::new(attribute)],
                key.columns().to_vec(),
                vec![key.key_of(record)],
            )
            .await?;

        let value = rows
            .into_iter()
            .next()
            .and_then(|mut row| row.take(attribute))
            .unwrap_or(FieldValue::Null);
        record.fill(attribute, value);

        Ok(record.value(attribute).unwrap_or(FieldValue::Null))
    }

    /// Answer a frozen record from storage without caching.
    ///
    /// The row is addressed by the record's full current attribute values,
    /// not its identifier: a frozen record may represent a historical or
    /// duplicated row.
    async fn fetch_frozen(
        &self,
        schema: &ModelSchema,
        record: &Record,
        attribute: &str,
    ) -> LoadResult<FieldValue> {
        debug!(
            model = %schema.name(),
            attribute,
            "fetching lazy attribute for a frozen record"
        );

        let matching: Vec<(SmolStr, FieldValue)> = record.snapshot().into_iter().collect();
        let rows = self
            .engine
            .select_by_values(schema.table().clone(), vec![SmolStr::new(attribute)], matching)
            .await?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|mut row| row.take(attribute))
            .unwrap_or(FieldValue::Null))
    }
}
