//! Records: shared handles over a schema, a value store, and load state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;

use crate::cohort::{Cohort, CohortInner};
use crate::schema::ModelSchema;
use crate::value::{FieldValue, ValueStore};

/// A single record of some model.
///
/// `Record` is a cheap handle: clones share the same underlying state, which
/// is what lets every member of a cohort observe a batch fetch's writes.
#[derive(Debug, Clone)]
pub struct Record {
    inner: Arc<RecordInner>,
}

#[derive(Debug)]
struct RecordInner {
    schema: Arc<ModelSchema>,
    values: RwLock<ValueStore>,
    new: AtomicBool,
    frozen: AtomicBool,
    cohort: OnceLock<Weak<CohortInner>>,
}

impl Record {
    /// Create a new, not-yet-persisted record with an empty value store.
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        Self::build(schema, ValueStore::new(), true)
    }

    /// Create a record hydrated from storage.
    pub fn hydrated(schema: Arc<ModelSchema>, values: ValueStore) -> Self {
        Self::build(schema, values, false)
    }

    fn build(schema: Arc<ModelSchema>, values: ValueStore, new: bool) -> Self {
        Self {
            inner: Arc::new(RecordInner {
                schema,
                values: RwLock::new(values),
                new: AtomicBool::new(new),
                frozen: AtomicBool::new(false),
                cohort: OnceLock::new(),
            }),
        }
    }

    /// The record's schema.
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.inner.schema
    }

    /// Whether the record has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.inner.new.load(Ordering::Acquire)
    }

    /// Clear the new flag after first persistence.
    pub fn mark_persisted(&self) {
        self.inner.new.store(false, Ordering::Release);
    }

    /// Whether the record has been marked immutable.
    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Acquire)
    }

    /// Mark the record immutable. All further value-store writes become
    /// no-ops that report failure.
    pub fn freeze(&self) {
        self.inner.frozen.store(true, Ordering::Release);
    }

    /// Check whether an attribute is present (possibly as `Null`).
    pub fn has(&self, attribute: &str) -> bool {
        self.inner.values.read().contains(attribute)
    }

    /// Get an attribute's value, if present.
    pub fn value(&self, attribute: &str) -> Option<FieldValue> {
        self.inner.values.read().get(attribute).cloned()
    }

    /// Set an attribute's value, overwriting any existing entry.
    ///
    /// Returns `false` (without writing) on frozen records.
    pub fn set(&self, attribute: impl Into<smol_str::SmolStr>, value: impl Into<FieldValue>) -> bool {
        if self.is_frozen() {
            return false;
        }
        self.inner.values.write().set(attribute, value);
        true
    }

    /// Set an attribute's value only if it is absent.
    ///
    /// Returns `true` if the value was written. Frozen records and present
    /// entries are left untouched.
    pub fn fill(&self, attribute: impl Into<smol_str::SmolStr>, value: impl Into<FieldValue>) -> bool {
        if self.is_frozen() {
            return false;
        }
        self.inner.values.write().fill(attribute, value)
    }

    /// A copy of the current value store.
    pub fn snapshot(&self) -> ValueStore {
        self.inner.values.read().clone()
    }

    /// The cohort this record was loaded with, if any and still alive.
    pub fn cohort(&self) -> Option<Cohort> {
        self.inner
            .cohort
            .get()
            .and_then(Weak::upgrade)
            .map(Cohort::from_inner)
    }

    /// Wire the back-reference to the owning cohort. Membership is
    /// established once per record lifetime; later attempts are ignored.
    pub(crate) fn attach_cohort(&self, cohort: &Arc<CohortInner>) {
        let _ = self.inner.cohort.set(Arc::downgrade(cohort));
    }

    /// Whether two handles refer to the same record.
    pub fn same_record(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
