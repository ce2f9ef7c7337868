//! Per-entity search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::filter::{DuplicateKey, FilterParser, MalformedClause};
use crate::fuzzy::FuzzyOptions;

/// How one entity type is searched.
///
/// Deserializes from YAML or JSON; every field except `searchable_fields`
/// has a default.
///
/// ```
/// use pixer_query::SearchConfig;
///
/// let config = SearchConfig::new(["name"]).threshold(0.2).default_field("name");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields matched approximately.
    pub searchable_fields: Vec<String>,
    /// Highest fuzzy score that counts as a match: `0` exact, `1` any
    /// record that has a value. Absent fields never match.
    pub threshold: f64,
    /// Field a bare search term (no `key:` prefix) applies to.
    pub default_field: Option<String>,
    /// Fields matched by case-insensitive equality instead of fuzzily.
    pub exact_fields: Vec<String>,
    /// Fields accepted as keys by single-record lookup, besides the id.
    pub lookup_fields: Vec<String>,
    /// Characters of match offset that cost a full point of score.
    pub distance: usize,
    /// Ignore where in the text a match starts.
    pub ignore_location: bool,
    /// Compare case-sensitively.
    pub case_sensitive: bool,
    /// Rank search results by score instead of keeping collection order.
    pub sort_by_score: bool,
    /// Handling of filter clauses without a `:`.
    pub malformed_clause: MalformedClause,
    /// Handling of repeated filter keys.
    pub duplicate_key: DuplicateKey,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let fuzzy = FuzzyOptions::default();
        SearchConfig {
            searchable_fields: Vec::new(),
            threshold: fuzzy.threshold,
            default_field: None,
            exact_fields: Vec::new(),
            lookup_fields: Vec::new(),
            distance: fuzzy.distance,
            ignore_location: fuzzy.ignore_location,
            case_sensitive: fuzzy.case_sensitive,
            sort_by_score: true,
            malformed_clause: MalformedClause::default(),
            duplicate_key: DuplicateKey::default(),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration searching the given fields with defaults.
    pub fn new<I, S>(searchable_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchConfig {
            searchable_fields: searchable_fields.into_iter().map(Into::into).collect(),
            ..SearchConfig::default()
        }
    }

    /// Sets the fuzzy threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the field bare search terms apply to.
    pub fn default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Adds a field matched by equality.
    pub fn exact_field(mut self, field: impl Into<String>) -> Self {
        self.exact_fields.push(field.into());
        self
    }

    /// Adds a field accepted by single-record lookup.
    pub fn lookup_field(mut self, field: impl Into<String>) -> Self {
        self.lookup_fields.push(field.into());
        self
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.searchable_fields.is_empty() {
            return Err(QueryError::InvalidConfiguration(
                "searchable_fields must name at least one field".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(QueryError::InvalidConfiguration(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        if let Some(field) = &self.default_field {
            if !self.is_searchable(field) {
                return Err(QueryError::InvalidConfiguration(format!(
                    "default_field '{field}' is not a searchable field"
                )));
            }
        }
        Ok(())
    }

    /// Returns `true` if `field` is matched approximately.
    pub fn is_searchable(&self, field: &str) -> bool {
        self.searchable_fields.iter().any(|f| f == field)
    }

    /// Returns `true` if `field` is matched by equality.
    ///
    /// A field listed as both searchable and exact is searched fuzzily.
    pub fn is_exact(&self, field: &str) -> bool {
        !self.is_searchable(field) && self.exact_fields.iter().any(|f| f == field)
    }

    /// Fuzzy scoring options derived from this configuration.
    pub fn fuzzy_options(&self) -> FuzzyOptions {
        FuzzyOptions {
            threshold: self.threshold,
            distance: self.distance,
            ignore_location: self.ignore_location,
            case_sensitive: self.case_sensitive,
        }
    }

    /// A filter parser applying this configuration's policies.
    pub fn parser(&self) -> FilterParser {
        let parser = FilterParser::new()
            .malformed_clause(self.malformed_clause)
            .duplicate_key(self.duplicate_key);
        match &self.default_field {
            Some(field) => parser.default_field(field.as_str()),
            None => parser,
        }
    }
}
