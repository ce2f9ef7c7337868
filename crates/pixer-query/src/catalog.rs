//! Per-entity catalogs: record source, search config and index cache.
//!
//! A [`Catalog`] is the explicit, process-wide state for one entity type.
//! Its index is built lazily on first use and replaced only when
//! [`Catalog::refresh`] is called; queries never trigger a rebuild on their
//! own.
//!
//! Builds are serialized: concurrent callers that find no index wait for
//! the single in-flight build instead of fetching the collection again.
//! Queries already holding an index keep using it while a refresh builds
//! its replacement.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::config::SearchConfig;
use crate::error::{QueryError, Result, SourceError};
use crate::index::{Collection, FuzzyIndex};
use crate::paginate::PageResult;
use crate::query::{query, QueryParams};
use crate::traits::Searchable;

/// Supplies the records of one entity type.
///
/// Called on the first query and on every refresh. Any I/O, timeouts and
/// retries belong here, outside the catalog.
pub trait RecordSource<T>: Send + Sync {
    /// Loads the current records, in collection order.
    fn fetch(&self) -> std::result::Result<Vec<T>, SourceError>;
}

impl<T, F> RecordSource<T> for F
where
    F: Fn() -> std::result::Result<Vec<T>, SourceError> + Send + Sync,
{
    fn fetch(&self) -> std::result::Result<Vec<T>, SourceError> {
        self()
    }
}

/// One entity type's searchable records.
///
/// # Example
///
/// ```
/// use pixer_query::{Catalog, QueryParams, RecordId, SearchConfig, Searchable, SourceError, Value};
///
/// #[derive(Clone)]
/// struct Tag {
///     id: i64,
///     name: String,
/// }
///
/// impl Searchable for Tag {
///     fn record_id(&self) -> RecordId<'_> {
///         RecordId::Int(self.id)
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             _ => Value::None,
///         }
///     }
/// }
///
/// fn load() -> Result<Vec<Tag>, SourceError> {
///     Ok(vec![Tag { id: 1, name: "Shirts".into() }, Tag { id: 2, name: "Hats".into() }])
/// }
///
/// let tags = Catalog::new("tags", SearchConfig::new(["name"]), load).unwrap();
/// let page = tags.query(&QueryParams::new("/tags").search("name:shirt")).unwrap();
/// assert_eq!(page.total, 1);
/// assert_eq!(tags.find_one("2").unwrap().name, "Hats");
/// ```
pub struct Catalog<T> {
    name: String,
    config: SearchConfig,
    source: Box<dyn RecordSource<T>>,
    current: RwLock<Option<Arc<FuzzyIndex<T>>>>,
    next_version: Mutex<u64>,
}

impl<T> std::fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl<T> Catalog<T> {
    /// The entity type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns `true` once an index has been built.
    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn cached(&self) -> Option<Arc<FuzzyIndex<T>>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: Searchable> Catalog<T> {
    /// Creates a catalog. Nothing is fetched until the first query.
    ///
    /// Fails with [`QueryError::InvalidConfiguration`] if `config` does not
    /// validate.
    pub fn new(
        name: impl Into<String>,
        config: SearchConfig,
        source: impl RecordSource<T> + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Catalog {
            name: name.into(),
            config,
            source: Box::new(source),
            current: RwLock::new(None),
            next_version: Mutex::new(0),
        })
    }

    /// Returns the current index, building it on first use.
    pub fn index(&self) -> Result<Arc<FuzzyIndex<T>>> {
        if let Some(index) = self.cached() {
            return Ok(index);
        }

        let mut next_version = self
            .next_version
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished building while we waited.
        if let Some(index) = self.cached() {
            return Ok(index);
        }
        self.rebuild(&mut next_version)
    }

    /// Re-fetches the records and replaces the index.
    ///
    /// On failure the previous index, if any, stays in place.
    pub fn refresh(&self) -> Result<Arc<FuzzyIndex<T>>> {
        let mut next_version = self
            .next_version
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(entity = %self.name, "refreshing catalog");
        self.rebuild(&mut next_version)
    }

    fn rebuild(&self, next_version: &mut u64) -> Result<Arc<FuzzyIndex<T>>> {
        let records = self.source.fetch().map_err(|source| QueryError::Source {
            entity: self.name.clone(),
            source,
        })?;
        let version = *next_version;
        let collection = Collection::with_version(records, version);
        let index = Arc::new(FuzzyIndex::build(collection, self.config.clone())?);
        *next_version += 1;

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&index));
        tracing::debug!(
            entity = %self.name,
            version,
            records = index.collection().len(),
            "catalog index ready"
        );
        Ok(index)
    }

    /// Runs a list query, returning owned records.
    pub fn query(&self, params: &QueryParams) -> Result<PageResult<T>>
    where
        T: Clone,
    {
        let index = self.index()?;
        Ok(query(&*index, params).cloned())
    }

    /// Looks up one record by id or by any configured lookup field.
    ///
    /// Fails with [`QueryError::NotFound`] when nothing matches.
    pub fn find_one(&self, key: &str) -> Result<T>
    where
        T: Clone,
    {
        let index = self.index()?;
        index
            .collection()
            .records()
            .iter()
            .find(|record| {
                record.record_id().matches_key(key)
                    || self.config.lookup_fields.iter().any(|field| {
                        record
                            .field_value(field)
                            .render()
                            .is_some_and(|value| value == key)
                    })
            })
            .cloned()
            .ok_or_else(|| QueryError::NotFound {
                entity: self.name.clone(),
                key: key.to_string(),
            })
    }
}
