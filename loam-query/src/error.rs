//! Error types for lazy attribute loading.

use thiserror::Error;

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type returned by query-execution collaborators.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while resolving a lazy attribute.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The record type declares no identifier columns, so keyed lookups
    /// are impossible.
    #[error("model `{model}` has no identifier columns; lazy attribute lookups are impossible")]
    MissingIdentifier {
        /// Name of the model that lacks an identifier.
        model: String,
    },

    /// The query-execution collaborator failed. Propagated unchanged; the
    /// loader performs no retries.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl LoadError {
    /// Create a missing-identifier error for the given model.
    pub fn missing_identifier(model: impl Into<String>) -> Self {
        Self::MissingIdentifier {
            model: model.into(),
        }
    }
}

/// An opaque error raised by a query-execution collaborator.
///
/// Engines construct this from whatever their underlying failure is; the
/// loading core never inspects it beyond surfacing it to the caller.
#[derive(Debug, Error)]
#[error("query execution failed: {message}")]
pub struct QueryError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl QueryError {
    /// Create a query error from a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a query error wrapping an underlying driver error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
