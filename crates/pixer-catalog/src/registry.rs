//! The catalogs served by the application.
//!
//! A [`Registry`] holds one [`Catalog`] per [`Entity`], built from
//! [`Settings`]. It is the process-wide query state: created once at
//! startup and shared by reference. Nothing is read from disk until an
//! entity is first queried.

use std::fmt;
use std::str::FromStr;

use pixer_query::{query, Catalog, OrderBy, QueryParams, Searchable};
use serde::Serialize;

use crate::entities::{Category, ProductType, Shop, Tag};
use crate::error::{CatalogError, Result};
use crate::settings::Settings;
use crate::source::JsonFileSource;

/// An entity type with a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Tags,
    Categories,
    Types,
    Shops,
}

impl Entity {
    pub const ALL: [Entity; 4] = [
        Entity::Tags,
        Entity::Categories,
        Entity::Types,
        Entity::Shops,
    ];

    /// The endpoint name, e.g. `tags`.
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Tags => "tags",
            Entity::Categories => "categories",
            Entity::Types => "types",
            Entity::Shops => "shops",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Entity::ALL
            .into_iter()
            .find(|entity| entity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownEntity(s.to_string()))
    }
}

/// A list request as it arrives from a caller, before defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub sorted_by: Option<String>,
}

/// One catalog per entity type.
#[derive(Debug)]
pub struct Registry {
    settings: Settings,
    tags: Catalog<Tag>,
    categories: Catalog<Category>,
    types: Catalog<ProductType>,
    shops: Catalog<Shop>,
}

impl Registry {
    /// Creates the catalogs. Fails if an entity's search configuration is
    /// invalid.
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Registry {
            tags: catalog(&settings, Entity::Tags)?,
            categories: catalog(&settings, Entity::Categories)?,
            types: catalog(&settings, Entity::Types)?,
            shops: catalog(&settings, Entity::Shops)?,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tags(&self) -> &Catalog<Tag> {
        &self.tags
    }

    pub fn categories(&self) -> &Catalog<Category> {
        &self.categories
    }

    pub fn types(&self) -> &Catalog<ProductType> {
        &self.types
    }

    pub fn shops(&self) -> &Catalog<Shop> {
        &self.shops
    }

    /// Query parameters for `entity`, with settings defaults applied.
    pub fn params(&self, entity: Entity, request: &ListRequest) -> QueryParams {
        let mut params = QueryParams::new(format!("/{entity}"))
            .page(request.page.unwrap_or(0))
            .limit(request.limit.unwrap_or(self.settings.default_limit));
        if let Some(search) = &request.search {
            params = params.search(search.as_str());
        }
        params.order_by =
            OrderBy::from_params(request.order_by.as_deref(), request.sorted_by.as_deref());
        params.app_url = self.settings.app_url.clone();
        params
    }

    /// Runs a list request and renders the page as JSON.
    pub fn list(&self, entity: Entity, request: &ListRequest) -> Result<serde_json::Value> {
        let params = self.params(entity, request);
        match entity {
            Entity::Tags => list_json(&self.tags, &params),
            Entity::Categories => list_json(&self.categories, &params),
            Entity::Types => list_json(&self.types, &params),
            Entity::Shops => list_json(&self.shops, &params),
        }
    }

    /// Looks up one record by id or slug and renders it as JSON.
    pub fn show(&self, entity: Entity, key: &str) -> Result<serde_json::Value> {
        match entity {
            Entity::Tags => show_json(&self.tags, key),
            Entity::Categories => show_json(&self.categories, key),
            Entity::Types => show_json(&self.types, key),
            Entity::Shops => show_json(&self.shops, key),
        }
    }

    /// Re-reads an entity's records and rebuilds its index.
    pub fn refresh(&self, entity: Entity) -> Result<()> {
        match entity {
            Entity::Tags => self.tags.refresh().map(drop),
            Entity::Categories => self.categories.refresh().map(drop),
            Entity::Types => self.types.refresh().map(drop),
            Entity::Shops => self.shops.refresh().map(drop),
        }
        .map_err(CatalogError::from)
    }
}

fn catalog<T>(settings: &Settings, entity: Entity) -> Result<Catalog<T>>
where
    T: Searchable + serde::de::DeserializeOwned + 'static,
{
    let config = settings.search_config(entity)?.clone();
    let source = JsonFileSource::<T>::new(settings.data_file(entity));
    Ok(Catalog::new(entity.as_str(), config, source)?)
}

fn list_json<T>(catalog: &Catalog<T>, params: &QueryParams) -> Result<serde_json::Value>
where
    T: Searchable + Serialize,
{
    let index = catalog.index()?;
    let page = query(&*index, params);
    serde_json::to_value(&page).map_err(CatalogError::Encode)
}

fn show_json<T>(catalog: &Catalog<T>, key: &str) -> Result<serde_json::Value>
where
    T: Searchable + Serialize + Clone,
{
    let record = catalog.find_one(key)?;
    serde_json::to_value(&record).map_err(CatalogError::Encode)
}
