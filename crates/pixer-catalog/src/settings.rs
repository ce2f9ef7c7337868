//! Application settings.
//!
//! Settings come from an optional YAML file. Anything the file leaves out,
//! including whole entity sections, falls back to the built-in defaults:
//!
//! ```yaml
//! app_url: https://shop.example/api
//! data_dir: ./data
//! default_limit: 20
//! entities:
//!   tags:
//!     searchable_fields: [name]
//!     threshold: 0.2
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pixer_query::{PageRequest, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::registry::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Absolute prefix for page links; relative links when unset.
    pub app_url: Option<String>,
    /// Directory holding `tags.json`, `categories.json`, ...
    pub data_dir: PathBuf,
    /// Page size when a request gives none.
    pub default_limit: usize,
    /// Search configuration per entity name.
    pub entities: BTreeMap<String, SearchConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            app_url: None,
            data_dir: PathBuf::from("data"),
            default_limit: PageRequest::DEFAULT_LIMIT,
            entities: Entity::ALL
                .iter()
                .map(|entity| (entity.as_str().to_string(), default_config(*entity)))
                .collect(),
        }
    }
}

/// Built-in search configuration for an entity.
pub fn default_config(entity: Entity) -> SearchConfig {
    let config = SearchConfig::new(["name"])
        .default_field("name")
        .lookup_field("slug")
        .exact_field("slug");
    match entity {
        Entity::Tags => config.exact_field("type.slug"),
        Entity::Categories => config.exact_field("type.slug").exact_field("parent"),
        Entity::Types => config,
        Entity::Shops => config.exact_field("is_active").exact_field("owner_id"),
    }
}

impl Settings {
    /// Loads settings from `path`, or the defaults when there is none.
    ///
    /// A path that does not exist is not an error; the defaults are used
    /// and a warning is logged.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        if !path.exists() {
            tracing::warn!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Settings::from_yaml(&content).map_err(|source| CatalogError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parses settings from YAML, filling in missing entity sections.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let mut settings: Settings = serde_yaml::from_str(content)?;
        for entity in Entity::ALL {
            settings
                .entities
                .entry(entity.as_str().to_string())
                .or_insert_with(|| default_config(entity));
        }
        Ok(settings)
    }

    /// The search configuration for `entity`.
    pub fn search_config(&self, entity: Entity) -> Result<&SearchConfig> {
        self.entities
            .get(entity.as_str())
            .ok_or_else(|| CatalogError::UnknownEntity(entity.as_str().to_string()))
    }

    /// Path of the record file for `entity`.
    pub fn data_file(&self, entity: Entity) -> PathBuf {
        self.data_dir.join(format!("{}.json", entity.as_str()))
    }
}
