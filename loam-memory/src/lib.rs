//! # loam-memory
//!
//! In-memory query engine for the Loam ORM.
//!
//! This crate plays the query-execution collaborator role against
//! `loam-query`: it holds tables of rows, answers the two select shapes the
//! loading core needs, and doubles as the bulk-retrieval collaborator via
//! [`MemoryEngine::load_cohort`]. Every select is traced and failures can
//! be injected, which makes it the workhorse of the integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use loam_memory::MemoryEngine;
//! use loam_query::{LazyLoader, Row};
//!
//! let engine = MemoryEngine::new();
//! engine.insert_row("posts", Row::new().with("id", 1).with("body", "hello"));
//!
//! let cohort = engine.load_cohort(&schema)?;
//! let loader = LazyLoader::new(engine.clone());
//! let body = loader.get(&cohort.members()[0], "body").await?;
//! ```

pub mod engine;
pub mod error;

pub use engine::{MemoryEngine, QueryKind, QueryTrace};
pub use error::{MemoryError, MemoryResult};
