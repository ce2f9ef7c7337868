//! Record sources backed by JSON files.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use pixer_query::{RecordSource, SourceError};
use serde::de::DeserializeOwned;

use crate::error::CatalogError;

/// Reads an entity's records from a JSON array file.
///
/// The file is read again on every fetch, so a catalog refresh picks up
/// edits made since the last build.
pub struct JsonFileSource<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource {
            path: path.into(),
            _records: PhantomData,
        }
    }

    /// The file records are read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the file.
    pub fn load(&self) -> Result<Vec<T>, CatalogError>
    where
        T: DeserializeOwned,
    {
        let content = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<T> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Json {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded records");
        Ok(records)
    }
}

impl<T> fmt::Debug for JsonFileSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFileSource")
            .field("path", &self.path)
            .finish()
    }
}

impl<T: DeserializeOwned> RecordSource<T> for JsonFileSource<T> {
    fn fetch(&self) -> Result<Vec<T>, SourceError> {
        Ok(self.load()?)
    }
}
