//! The in-memory query engine.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use smol_str::SmolStr;
use tracing::debug;

use loam_query::traits::BoxFuture;
use loam_query::{
    Cohort, FieldValue, ModelSchema, QueryEngine, QueryError, QueryResult, Record, RecordKey, Row,
};

use crate::error::{MemoryError, MemoryResult};

/// Description of one query the engine has executed.
#[derive(Debug, Clone)]
pub struct QueryTrace {
    /// The table addressed.
    pub table: SmolStr,
    /// The columns selected.
    pub columns: Vec<SmolStr>,
    /// The query shape.
    pub kind: QueryKind,
}

/// The shape of a traced query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Keyed select, with the number of keys in the filter set.
    ByKeys {
        /// Number of identifier values in the key set.
        keys: usize,
    },
    /// Exact attribute-equality select.
    ByValues,
}

/// An in-memory [`QueryEngine`] holding tables of rows.
///
/// Built for tests and demos: every select is recorded in a trace, and a
/// one-shot failure can be injected to exercise error propagation. Clones
/// share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    inner: Arc<EngineInner>,
}

#[derive(Debug, Default)]
struct EngineInner {
    tables: RwLock<HashMap<SmolStr, Vec<Row>>>,
    trace: Mutex<Vec<QueryTrace>>,
    fail_next: Mutex<Option<String>>,
}

impl MemoryEngine {
    /// Create an engine with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to a table, creating the table if needed.
    pub fn insert_row(&self, table: impl Into<SmolStr>, row: Row) {
        self.inner.tables.write().entry(table.into()).or_default().push(row);
    }

    /// Remove every row of `table` where `column` equals `value`.
    ///
    /// Returns the number of rows removed.
    pub fn remove_where(
        &self,
        table: &str,
        column: &str,
        value: impl Into<FieldValue>,
    ) -> usize {
        let value = value.into();
        let mut tables = self.inner.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return 0;
        };
        let before = rows.len();
        rows.retain(|row| row.get(column) != Some(&value));
        before - rows.len()
    }

    /// Number of rows currently stored in a table.
    pub fn row_count(&self, table: &str) -> usize {
        self.inner.tables.read().get(table).map_or(0, Vec::len)
    }

    /// Number of selects executed so far.
    pub fn query_count(&self) -> usize {
        self.inner.trace.lock().len()
    }

    /// The trace of executed selects, in order.
    pub fn queries(&self) -> Vec<QueryTrace> {
        self.inner.trace.lock().clone()
    }

    /// Make the next select fail with the given message.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.inner.fail_next.lock() = Some(message.into());
    }

    /// Load every row of the schema's table as a cohort of hydrated
    /// records.
    ///
    /// Only the schema's default-select columns are hydrated; lazy
    /// attributes stay absent until first access. The returned [`Cohort`]
    /// owns the member sequence and has already wired each member's
    /// back-reference.
    pub fn load_cohort(&self, schema: &Arc<ModelSchema>) -> MemoryResult<Cohort> {
        let select = schema.default_select();
        let tables = self.inner.tables.read();
        let rows = tables
            .get(schema.table().as_str())
            .ok_or_else(|| MemoryError::UnknownTable(schema.table().to_string()))?;

        debug!(
            model = %schema.name(),
            table = %schema.table(),
            rows = rows.len(),
            "bulk-loading cohort"
        );

        let members: Vec<Record> = rows
            .iter()
            .map(|row| Record::hydrated(schema.clone(), project(row, &select).into_store()))
            .collect();
        Ok(Cohort::adopt(members))
    }

    fn take_injected(&self) -> Option<QueryError> {
        self.inner
            .fail_next
            .lock()
            .take()
            .map(|message| MemoryError::Injected(message).into())
    }

    fn record_trace(&self, table: &SmolStr, columns: &[SmolStr], kind: QueryKind) {
        self.inner.trace.lock().push(QueryTrace {
            table: table.clone(),
            columns: columns.to_vec(),
            kind,
        });
    }

    fn table_rows(&self, table: &str) -> QueryResult<Vec<Row>> {
        self.inner
            .tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| MemoryError::UnknownTable(table.to_string()).into())
    }
}

/// Project a stored row onto the selected columns. Selected columns absent
/// from the stored row come back as `Null`, never omitted.
fn project(row: &Row, columns: &[SmolStr]) -> Row {
    columns
        .iter()
        .map(|column| {
            (
                column.clone(),
                row.get(column).cloned().unwrap_or(FieldValue::Null),
            )
        })
        .collect()
}

/// The identifier value a stored row holds for `key_columns`.
fn key_of_stored_row(row: &Row, key_columns: &[SmolStr]) -> RecordKey {
    if key_columns.len() > 1 {
        RecordKey::Composite(
            key_columns
                .iter()
                .map(|column| row.get(column).cloned().unwrap_or(FieldValue::Null))
                .collect(),
        )
    } else {
        RecordKey::Scalar(
            row.get(&key_columns[0])
                .cloned()
                .unwrap_or(FieldValue::Null),
        )
    }
}

impl QueryEngine for MemoryEngine {
    fn select_by_keys(
        &self,
        table: SmolStr,
        columns: Vec<SmolStr>,
        key_columns: Vec<SmolStr>,
        keys: Vec<RecordKey>,
    ) -> BoxFuture<'_, QueryResult<Vec<Row>>> {
        Box::pin(async move {
            if let Some(err) = self.take_injected() {
                return Err(err);
            }
            self.record_trace(&table, &columns, QueryKind::ByKeys { keys: keys.len() });

            let wanted: HashSet<RecordKey> = keys.into_iter().collect();
            let rows = self.table_rows(&table)?;
            Ok(rows
                .iter()
                .filter(|row| wanted.contains(&key_of_stored_row(row, &key_columns)))
                .map(|row| project(row, &columns))
                .collect())
        })
    }

    fn select_by_values(
        &self,
        table: SmolStr,
        columns: Vec<SmolStr>,
        matching: Vec<(SmolStr, FieldValue)>,
    ) -> BoxFuture<'_, QueryResult<Vec<Row>>> {
        Box::pin(async move {
            if let Some(err) = self.take_injected() {
                return Err(err);
            }
            self.record_trace(&table, &columns, QueryKind::ByValues);

            let rows = self.table_rows(&table)?;
            Ok(rows
                .iter()
                .filter(|row| {
                    matching.iter().all(|(column, value)| {
                        row.get(column).unwrap_or(&FieldValue::Null) == value
                    })
                })
                .map(|row| project(row, &columns))
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seeded() -> MemoryEngine {
        let engine = MemoryEngine::new();
        engine.insert_row(
            "posts",
            Row::new().with("id", 1).with("title", "first").with("body", "b1"),
        );
        engine.insert_row(
            "posts",
            Row::new().with("id", 2).with("title", "second").with("body", "b2"),
        );
        engine
    }

    fn schema() -> Arc<ModelSchema> {
        Arc::new(
            ModelSchema::builder("Post", "posts")
                .columns(["id", "title", "body"])
                .identifier(["id"])
                .lazy(["body"])
                .build(),
        )
    }

    #[tokio::test]
    async fn test_select_by_keys_scalar() {
        let engine = seeded();
        let rows = engine
            .select_by_keys(
                "posts".into(),
                vec!["id".into(), "body".into()],
                vec!["id".into()],
                vec![RecordKey::Scalar(FieldValue::Int(2))],
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("body"), Some(&FieldValue::String("b2".into())));
        // Projection drops unselected columns.
        assert!(!rows[0].contains("title"));
    }

    #[tokio::test]
    async fn test_select_by_keys_composite_matches_full_tuple() {
        let engine = MemoryEngine::new();
        engine.insert_row(
            "memberships",
            Row::new().with("group_id", 1).with("user_id", 2).with("role", "admin"),
        );
        engine.insert_row(
            "memberships",
            Row::new().with("group_id", 2).with("user_id", 1).with("role", "guest"),
        );

        let key = RecordKey::Composite(
            [FieldValue::Int(2), FieldValue::Int(1)].into_iter().collect(),
        );
        let rows = engine
            .select_by_keys(
                "memberships".into(),
                vec!["role".into()],
                vec!["group_id".into(), "user_id".into()],
                vec![key],
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("role"), Some(&FieldValue::String("guest".into())));
    }

    #[tokio::test]
    async fn test_select_by_values_exact_equality() {
        let engine = seeded();
        let rows = engine
            .select_by_values(
                "posts".into(),
                vec!["body".into()],
                vec![("title".into(), "first".into())],
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("body"), Some(&FieldValue::String("b1".into())));
    }

    #[tokio::test]
    async fn test_unknown_table_errors() {
        let engine = MemoryEngine::new();
        let err = engine
            .select_by_keys(
                "ghosts".into(),
                vec!["id".into()],
                vec!["id".into()],
                vec![RecordKey::Scalar(FieldValue::Int(1))],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("query execution failed"));
    }

    #[tokio::test]
    async fn test_trace_and_fail_injection() {
        let engine = seeded();
        engine.fail_next("boom");
        let err = engine
            .select_by_values("posts".into(), vec!["id".into()], vec![])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
        // Injected failures happen before execution and are not traced.
        assert_eq!(engine.query_count(), 0);

        engine
            .select_by_values("posts".into(), vec!["id".into()], vec![])
            .await
            .unwrap();
        assert_eq!(engine.query_count(), 1);
        assert_eq!(engine.queries()[0].kind, QueryKind::ByValues);
    }

    #[test]
    fn test_load_cohort_hydrates_default_select_only() {
        let engine = seeded();
        let cohort = engine.load_cohort(&schema()).unwrap();

        assert_eq!(cohort.len(), 2);
        let first = &cohort.members()[0];
        assert!(first.has("title"));
        assert!(!first.has("body"));
        assert!(first.cohort().is_some());
        assert!(!first.is_new());
    }

    #[test]
    fn test_remove_where() {
        let engine = seeded();
        assert_eq!(engine.remove_where("posts", "id", 1), 1);
        assert_eq!(engine.row_count("posts"), 1);
    }
}
