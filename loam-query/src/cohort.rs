//! Cohorts: the sibling records a record was bulk-loaded with.
//!
//! A cohort is the batching scope for lazy fetches. It owns the ordered
//! member sequence; members hold weak back-references, so dropping the
//! cohort handle degrades members to singleton fetching rather than leaking
//! a reference cycle.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::record::Record;

/// An ordered collection of records produced by one bulk retrieval.
#[derive(Debug, Clone)]
pub struct Cohort {
    inner: Arc<CohortInner>,
}

#[derive(Debug)]
pub(crate) struct CohortInner {
    members: Vec<Record>,
    // Serializes the read-check/query/write sequence of a batch fetch so
    // overlapping accesses coalesce into one query.
    gate: Mutex<()>,
}

impl Cohort {
    /// Take ownership of a member sequence and wire each member's
    /// back-reference.
    ///
    /// A record belongs to at most one cohort for its lifetime; members that
    /// already have one keep it.
    pub fn adopt(members: impl IntoIterator<Item = Record>) -> Self {
        let inner = Arc::new(CohortInner {
            members: members.into_iter().collect(),
            gate: Mutex::new(()),
        });
        for member in &inner.members {
            member.attach_cohort(&inner);
        }
        Self { inner }
    }

    pub(crate) fn from_inner(inner: Arc<CohortInner>) -> Self {
        Self { inner }
    }

    /// The members, in retrieval order.
    pub fn members(&self) -> &[Record] {
        &self.inner.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.inner.members.len()
    }

    /// Check if the cohort has no members.
    pub fn is_empty(&self) -> bool {
        self.inner.members.is_empty()
    }

    /// Members still missing `attribute` and open to caching it: present
    /// values and frozen members are subtracted. Preserves cohort order.
    pub fn members_needing(&self, attribute: &str) -> Vec<Record> {
        self.inner
            .members
            .iter()
            .filter(|member| !member.is_frozen() && !member.has(attribute))
            .cloned()
            .collect()
    }

    pub(crate) fn gate(&self) -> &Mutex<()> {
        &self.inner.gate
    }
}
