//! # Loam
//!
//! Lazy, batch-coalescing attribute loading for ORM-style records.
//!
//! Loam lets a record type declare attributes as *lazy*: excluded from the
//! default bulk-read column set and fetched on first access. When a lazy
//! attribute is read on one record out of a cohort loaded together, the
//! loader backfills that attribute for every cohort member still missing
//! it in a single query, instead of one query per record.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use loam_orm::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut schema = ModelSchema::builder("Post", "posts")
//!     .columns(["id", "title", "body"])
//!     .identifier(["id"])
//!     .build();
//! schema.declare_lazy(["body"]);
//! let schema = Arc::new(schema);
//!
//! let engine = MemoryEngine::new();
//! engine.insert_row("posts", Row::new().with("id", 1).with("title", "a").with("body", "lorem"));
//! engine.insert_row("posts", Row::new().with("id", 2).with("title", "b").with("body", "ipsum"));
//!
//! // Bulk load selects only [id, title].
//! let cohort = engine.load_cohort(&schema)?;
//! let loader = LazyLoader::new(engine.clone());
//!
//! // First access coalesces: one query backfills `body` for both records.
//! let body = loader.get(&cohort.members()[0], "body").await?;
//! assert_eq!(body, FieldValue::String("lorem".into()));
//! assert!(cohort.members()[1].has("body"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Lazy attribute loading core.
pub mod query {
    pub use loam_query::*;
}

/// In-memory query engine.
pub mod memory {
    pub use loam_memory::*;
}

pub use loam_memory::{MemoryEngine, MemoryError, QueryKind, QueryTrace};
pub use loam_query::{
    Accessor, Cohort, DefaultAccessor, FieldValue, Fetcher, KeySpec, LazyLoader, LoadError,
    LoadResult, ModelSchema, QueryEngine, QueryError, Record, RecordKey, Row, ValueStore,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use loam_memory::MemoryEngine;
    pub use loam_query::prelude::*;
}
