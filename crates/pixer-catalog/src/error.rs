//! Error types for the catalog crate.

use std::path::PathBuf;

use pixer_query::QueryError;
use thiserror::Error;

/// Errors from loading settings, reading record files or answering a query.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A settings or record file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid YAML for [`Settings`](crate::Settings).
    #[error("invalid settings in {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A record file is not a JSON array of the entity's records.
    #[error("invalid records in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The entity name is not one the registry serves.
    #[error("unknown entity type '{0}'")]
    UnknownEntity(String),

    /// A catalog could not be configured or queried.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A result could not be encoded as JSON.
    #[error("failed to encode response")]
    Encode(#[source] serde_json::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
