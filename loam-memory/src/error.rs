//! Error types for the in-memory engine.

use loam_query::QueryError;
use thiserror::Error;

/// Result type for in-memory engine operations.
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Error type for in-memory engine operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The addressed table has never been written to.
    #[error("no such table: `{0}`")]
    UnknownTable(String),

    /// An injected failure, used to exercise error propagation in tests.
    #[error("injected failure: {0}")]
    Injected(String),
}

impl From<MemoryError> for QueryError {
    fn from(err: MemoryError) -> Self {
        QueryError::with_source(err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_message() {
        let err: QueryError = MemoryError::UnknownTable("posts".into()).into();
        assert!(err.to_string().contains("posts"));
    }
}
