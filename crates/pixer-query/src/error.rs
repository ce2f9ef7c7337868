//! Error types for the query crate.

use thiserror::Error;

/// Error returned by a [`RecordSource`](crate::RecordSource) implementation.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when configuring a catalog or looking up records.
///
/// Malformed filter strings, unknown filter keys and out-of-range pages are
/// not errors: they degrade to ignored keys or empty pages.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No record matched the key given to a single-record lookup.
    #[error("{entity} '{key}' not found")]
    NotFound { entity: String, key: String },

    /// The search configuration cannot produce a usable index.
    #[error("invalid search configuration: {0}")]
    InvalidConfiguration(String),

    /// The record source failed to produce a collection.
    #[error("failed to fetch {entity} records")]
    Source {
        entity: String,
        #[source]
        source: SourceError,
    },
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
