//! Fuzzy index over a record collection.
//!
//! [`FuzzyIndex::build`] extracts and normalizes the configured fields of
//! every record once; [`FuzzyIndex::search`] then resolves a conjunctive
//! predicate set against those columns.
//!
//! The index owns the [`Collection`] it was built from, so it can only ever
//! answer queries about that exact collection. There is no incremental
//! update: a changed collection means a new index.

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::error::{QueryError, Result};
use crate::filter::Predicates;
use crate::fuzzy::{normalize, Pattern, SCORE_EPSILON};
use crate::traits::Searchable;

/// An ordered, shared, versioned sequence of records.
#[derive(Debug)]
pub struct Collection<T> {
    records: Arc<[T]>,
    version: u64,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Collection {
            records: Arc::clone(&self.records),
            version: self.version,
        }
    }
}

impl<T> Collection<T> {
    /// Creates a collection at version 0.
    pub fn new(records: Vec<T>) -> Self {
        Collection::with_version(records, 0)
    }

    /// Creates a collection at the given version.
    pub fn with_version(records: Vec<T>, version: u64) -> Self {
        Collection {
            records: records.into(),
            version,
        }
    }

    /// The records, in collection order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// The version this collection was loaded as.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A record matched by a search, with its relevance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a, T> {
    /// The matched record.
    pub record: &'a T,
    /// Position of the record in the collection.
    pub position: usize,
    /// Combined score; lower is more relevant, `0.0` for pass-through.
    pub score: f64,
}

#[derive(Debug)]
enum Column {
    Fuzzy {
        field: String,
        values: Vec<Option<Box<[char]>>>,
    },
    Exact {
        field: String,
        values: Vec<Option<String>>,
    },
}

impl Column {
    fn field(&self) -> &str {
        match self {
            Column::Fuzzy { field, .. } | Column::Exact { field, .. } => field,
        }
    }
}

enum Matcher<'q> {
    Fuzzy(&'q [Option<Box<[char]>>], Pattern),
    Exact(&'q [Option<String>], String),
}

impl Matcher<'_> {
    fn score(&self, position: usize) -> Option<f64> {
        match self {
            Matcher::Fuzzy(values, pattern) => values[position]
                .as_deref()
                .and_then(|text| pattern.matches(text)),
            Matcher::Exact(values, expected) => values[position]
                .as_deref()
                .filter(|value| *value == expected.as_str())
                .map(|_| 0.0),
        }
    }
}

/// Approximate-match index over one collection.
#[derive(Debug)]
pub struct FuzzyIndex<T> {
    collection: Collection<T>,
    config: SearchConfig,
    columns: Vec<Column>,
}

impl<T: Searchable> FuzzyIndex<T> {
    /// Builds an index over the configured fields of `collection`.
    ///
    /// Building is deterministic. An empty collection always builds; a
    /// non-empty one fails with [`QueryError::InvalidConfiguration`] if no
    /// record has a value for any searchable field.
    pub fn build(collection: Collection<T>, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let records = collection.records();
        let case_sensitive = config.case_sensitive;

        let mut columns =
            Vec::with_capacity(config.searchable_fields.len() + config.exact_fields.len());
        for field in &config.searchable_fields {
            let values = records
                .iter()
                .map(|r| {
                    r.field_value(field)
                        .render()
                        .map(|text| normalize(&text, case_sensitive))
                })
                .collect();
            columns.push(Column::Fuzzy {
                field: field.clone(),
                values,
            });
        }
        for field in config.exact_fields.iter().filter(|f| config.is_exact(f)) {
            let values = records
                .iter()
                .map(|r| {
                    r.field_value(field)
                        .render()
                        .map(|text| fold_case(&text, case_sensitive))
                })
                .collect();
            columns.push(Column::Exact {
                field: field.clone(),
                values,
            });
        }

        if !records.is_empty() {
            let any_value = columns.iter().any(|c| match c {
                Column::Fuzzy { values, .. } => values.iter().any(Option::is_some),
                Column::Exact { .. } => false,
            });
            if !any_value {
                return Err(QueryError::InvalidConfiguration(format!(
                    "none of the searchable fields [{}] has a value in any record",
                    config.searchable_fields.join(", ")
                )));
            }
        }

        tracing::debug!(
            version = collection.version(),
            records = records.len(),
            columns = columns.len(),
            "built fuzzy index"
        );

        Ok(FuzzyIndex {
            collection,
            config,
            columns,
        })
    }
}

impl<T> FuzzyIndex<T> {
    /// The collection this index was built from.
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    /// The configuration this index was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolves `predicates` to the matching records.
    ///
    /// See [`search_scored`](Self::search_scored) for the semantics.
    pub fn search(&self, predicates: &Predicates) -> Vec<&T> {
        self.search_scored(predicates)
            .into_iter()
            .map(|hit| hit.record)
            .collect()
    }

    /// Resolves `predicates` to scored hits.
    ///
    /// A record is a hit only if every known predicate matches it. Unknown
    /// fields are ignored; if no known predicate remains, every record is
    /// returned in collection order. Hits are ranked by the product of
    /// their per-predicate scores, ties keeping collection order.
    pub fn search_scored(&self, predicates: &Predicates) -> Vec<Hit<'_, T>> {
        let records = self.collection.records();
        let matchers = self.resolve(predicates);

        if matchers.is_empty() {
            return records
                .iter()
                .enumerate()
                .map(|(position, record)| Hit {
                    record,
                    position,
                    score: 0.0,
                })
                .collect();
        }

        let mut hits: Vec<Hit<'_, T>> = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let mut score = 1.0;
                for matcher in &matchers {
                    score *= matcher.score(position)?.max(SCORE_EPSILON);
                }
                Some(Hit {
                    record,
                    position,
                    score,
                })
            })
            .collect();

        if self.config.sort_by_score {
            hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        }

        tracing::trace!(
            predicates = %predicates,
            hits = hits.len(),
            of = records.len(),
            "searched fuzzy index"
        );
        hits
    }

    fn resolve(&self, predicates: &Predicates) -> Vec<Matcher<'_>> {
        let fuzzy = self.config.fuzzy_options();
        let mut matchers = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            let column = self.columns.iter().find(|c| c.field() == predicate.field);
            match column {
                Some(Column::Fuzzy { values, .. }) => {
                    matchers.push(Matcher::Fuzzy(values, Pattern::new(&predicate.expected, fuzzy)));
                }
                Some(Column::Exact { values, .. }) => {
                    matchers.push(Matcher::Exact(
                        values,
                        fold_case(&predicate.expected, self.config.case_sensitive),
                    ));
                }
                None => {
                    tracing::debug!(field = %predicate.field, "ignoring filter on unknown field");
                }
            }
        }
        matchers
    }
}

fn fold_case(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}
