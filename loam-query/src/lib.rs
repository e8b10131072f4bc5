//! # loam-query
//!
//! Lazy attribute loading core for the Loam ORM.
//!
//! Record types can declare attributes as *lazy*: excluded from the
//! default bulk-read column set and fetched on demand the first time they
//! are accessed. The hard part is staying out of the N+1-query trap, and
//! that is what this crate is for: when a lazy attribute is read on one
//! record out of a cohort of sibling records loaded together, the loader
//! fetches that attribute for every cohort member still missing it in a
//! single coalesced query, caches each value on its record, and returns
//! the requested one.
//!
//! ## Reading a lazy attribute
//!
//! ```rust,ignore
//! use loam_query::prelude::*;
//!
//! let mut schema = ModelSchema::builder("Post", "posts")
//!     .columns(["id", "title", "body"])
//!     .identifier(["id"])
//!     .build();
//! schema.declare_lazy(["body"]);
//!
//! // Bulk loads select `default_select()` = [id, title]; `body` stays
//! // behind until someone asks for it.
//! let posts = engine.load_cohort(&Arc::new(schema)).await?;
//!
//! let loader = LazyLoader::new(engine);
//! // One query backfills `body` for every member of the cohort.
//! let body = loader.get(&posts.members()[1], "body").await?;
//! ```
//!
//! ## What lives where
//!
//! - [`value`]: attribute values and the per-record [`ValueStore`] with
//!   explicit present-vs-absent semantics
//! - [`schema`]: [`ModelSchema`] declarations and the lazy registry
//! - [`record`] / [`cohort`]: shared record handles and the batching scope
//! - [`key`]: identifier resolution, scalar and composite key values
//! - [`loader`]: the batch fetch coordinator
//! - [`accessor`]: the generic accessor dispatcher and its override seam
//! - [`traits`]: the [`QueryEngine`] collaborator contract
//! - [`error`] / [`logging`]: ambient concerns

pub mod accessor;
pub mod cohort;
pub mod error;
pub mod key;
pub mod loader;
pub mod logging;
pub mod record;
pub mod row;
pub mod schema;
pub mod traits;
pub mod value;

pub use accessor::{Accessor, DefaultAccessor, Fetcher};
pub use cohort::Cohort;
pub use error::{LoadError, LoadResult, QueryError, QueryResult};
pub use key::{KeySpec, RecordKey};
pub use loader::LazyLoader;
pub use record::Record;
pub use row::Row;
pub use schema::{ModelSchema, ModelSchemaBuilder};
pub use traits::{BoxFuture, QueryEngine};
pub use value::{FieldValue, ValueStore};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accessor::{Accessor, DefaultAccessor, Fetcher};
    pub use crate::cohort::Cohort;
    pub use crate::error::{LoadError, LoadResult, QueryError, QueryResult};
    pub use crate::key::{KeySpec, RecordKey};
    pub use crate::loader::LazyLoader;
    pub use crate::record::Record;
    pub use crate::row::Row;
    pub use crate::schema::ModelSchema;
    pub use crate::traits::QueryEngine;
    pub use crate::value::{FieldValue, ValueStore};
}
