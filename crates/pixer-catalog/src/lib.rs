//! Pixer Catalog - the admin API's list endpoints over JSON record files.
//!
//! Wires the [`pixer_query`] engine to concrete entities:
//!
//! - [`Tag`], [`Category`], [`ProductType`] and [`Shop`] records
//! - [`JsonFileSource`] reading `<data_dir>/<entity>.json`
//! - [`Settings`] loaded from YAML, with per-entity [`SearchConfig`]
//! - [`Registry`] holding one catalog per [`Entity`]
//!
//! ```no_run
//! use pixer_catalog::{Entity, ListRequest, Registry, Settings};
//!
//! let registry = Registry::new(Settings::default())?;
//! let page = registry.list(
//!     Entity::Tags,
//!     &ListRequest {
//!         search: Some("name:fruit".into()),
//!         ..ListRequest::default()
//!     },
//! )?;
//! println!("{page}");
//! # Ok::<(), pixer_catalog::CatalogError>(())
//! ```
//!
//! [`SearchConfig`]: pixer_query::SearchConfig

mod entities;
mod error;
mod registry;
mod settings;
mod source;

pub use entities::{Category, ProductType, Shop, Tag, TypeRef};
pub use error::{CatalogError, Result};
pub use registry::{Entity, ListRequest, Registry};
pub use settings::{default_config, Settings};
pub use source::JsonFileSource;
