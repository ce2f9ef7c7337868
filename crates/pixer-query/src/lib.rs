//! Pixer Query - generic list-query engine for record collections.
//!
//! Every list endpoint of the admin API does the same thing: take the
//! entity's records, narrow them with an encoded filter or a fuzzy search
//! term, and return one page of the result with navigation metadata. This
//! crate does that once, generically, for any type implementing
//! [`Searchable`].
//!
//! - [`FilterParser`] decodes `key:value;key:value` into [`Predicates`]
//! - [`FuzzyIndex`] resolves predicates approximately (per [`SearchConfig`])
//! - [`paginate`] slices a page and builds its [`PageResult`]
//! - [`Catalog`] ties one entity's [`RecordSource`] to a cached index
//!
//! # Quick Start
//!
//! ```rust
//! use pixer_query::{
//!     query, Collection, FuzzyIndex, QueryParams, RecordId, SearchConfig, Searchable, Value,
//! };
//!
//! struct Tag {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Searchable for Tag {
//!     fn record_id(&self) -> RecordId<'_> {
//!         RecordId::Int(self.id)
//!     }
//!
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::String(&self.name),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let tags: Vec<Tag> = (1..=22)
//!     .map(|i| Tag { id: i, name: format!("t{i}") })
//!     .collect();
//!
//! let index = FuzzyIndex::build(Collection::new(tags), SearchConfig::new(["name"])).unwrap();
//! let page = query(&index, &QueryParams::new("/tags").page(1).limit(15));
//!
//! assert_eq!(page.data.len(), 15);
//! assert_eq!(page.total, 22);
//! assert_eq!(page.last_page, 2);
//! assert!(page.next_page_url.is_some());
//! assert!(page.prev_page_url.is_none());
//! ```
//!
//! # Matching Semantics
//!
//! ```text
//! match = every known predicate matches
//!         (searchable field: fuzzy score <= threshold,
//!          exact field: case-insensitive equality)
//! ```
//!
//! - Unknown predicate fields are ignored, never an error
//! - No known predicates means no filtering
//! - Results rank by score; equal scores keep collection order
//!
//! # Graceful Degradation
//!
//! Malformed filter clauses, unknown keys, out-of-range pages and zero
//! limits all produce a best-effort answer. Only configuration problems,
//! record source failures and single-record misses are errors
//! ([`QueryError`]).

mod catalog;
mod config;
mod error;
mod filter;
mod fuzzy;
mod index;
mod ordering;
mod paginate;
mod query;
mod traits;
mod value;

pub use catalog::{Catalog, RecordSource};
pub use config::SearchConfig;
pub use error::{QueryError, Result, SourceError};
pub use filter::{DuplicateKey, FilterParser, MalformedClause, Predicate, Predicates};
pub use fuzzy::{normalize, FuzzyOptions, Pattern, SCORE_EPSILON};
pub use index::{Collection, FuzzyIndex, Hit};
pub use ordering::{compare_values, Dir, OrderBy};
pub use paginate::{paginate, PageLinks, PageRequest, PageResult};
pub use query::{query, QueryParams};
pub use traits::Searchable;
pub use value::{Number, RecordId, Value};
