//! Filter string parsing.
//!
//! Clients encode their filters as a compact, semicolon-delimited string:
//!
//! ```text
//! name:shirt;type.slug:clothing
//! ```
//!
//! [`FilterParser`] turns that string into [`Predicates`], an
//! order-preserving, conjunctive set of `field → expected value` pairs.
//! Parsing never fails: malformed input degrades to a best-effort predicate
//! set, following the configured [`MalformedClause`] and [`DuplicateKey`]
//! policies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with a clause that has no `:` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedClause {
    /// Treat the clause as a key with an empty-string value.
    #[default]
    EmptyValue,
    /// Drop the clause.
    Skip,
}

/// What to do when a key appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKey {
    /// Later occurrences overwrite earlier ones (keeping the first position).
    #[default]
    LastWins,
    /// Later occurrences are ignored.
    FirstWins,
}

/// A single `field ≈ expected` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// The field the constraint applies to.
    pub field: String,
    /// The expected value.
    pub expected: String,
}

/// An order-preserving conjunctive predicate set.
///
/// Order is kept for diagnostics only; matching treats the set as
/// unordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates {
    items: Vec<Predicate>,
}

impl Predicates {
    /// Creates an empty predicate set, which matches everything.
    pub fn new() -> Self {
        Predicates::default()
    }

    /// Inserts a predicate, resolving duplicates with `policy`.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        expected: impl Into<String>,
        policy: DuplicateKey,
    ) {
        let field = field.into();
        match self.items.iter_mut().find(|p| p.field == field) {
            Some(existing) => {
                if policy == DuplicateKey::LastWins {
                    existing.expected = expected.into();
                }
            }
            None => self.items.push(Predicate {
                field,
                expected: expected.into(),
            }),
        }
    }

    /// Returns the expected value for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|p| p.field == field)
            .map(|p| p.expected.as_str())
    }

    /// Iterates the predicates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.items.iter()
    }

    /// Returns the number of predicates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no predicates.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Predicates {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Predicates
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut predicates = Predicates::new();
        for (field, expected) in iter {
            predicates.insert(field, expected, DuplicateKey::LastWins);
        }
        predicates
    }
}

/// Renders back to the `k:v;k:v` encoding.
impl fmt::Display for Predicates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}:{}", p.field, p.expected)?;
        }
        Ok(())
    }
}

/// Parser for `k1:v1;k2:v2` filter strings.
///
/// # Example
///
/// ```
/// use pixer_query::FilterParser;
///
/// let predicates = FilterParser::new().parse("name:shirt;url:http://x");
/// assert_eq!(predicates.get("name"), Some("shirt"));
/// assert_eq!(predicates.get("url"), Some("http://x"));
///
/// // A bare term goes to the default field when one is configured.
/// let bare = FilterParser::new().default_field("name").parse("shirt");
/// assert_eq!(bare.get("name"), Some("shirt"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    malformed_clause: MalformedClause,
    duplicate_key: DuplicateKey,
    default_field: Option<String>,
}

impl FilterParser {
    /// Creates a parser with the permissive default policies.
    pub fn new() -> Self {
        FilterParser::default()
    }

    /// Sets the policy for clauses without a `:`.
    pub fn malformed_clause(mut self, policy: MalformedClause) -> Self {
        self.malformed_clause = policy;
        self
    }

    /// Sets the policy for repeated keys.
    pub fn duplicate_key(mut self, policy: DuplicateKey) -> Self {
        self.duplicate_key = policy;
        self
    }

    /// Sets the field a bare search term (no `:` anywhere) applies to.
    pub fn default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Parses a filter string. Never fails.
    pub fn parse(&self, input: &str) -> Predicates {
        let mut predicates = Predicates::new();
        let input = input.trim();
        if input.is_empty() {
            return predicates;
        }

        if let Some(field) = &self.default_field {
            if !input.contains(':') {
                predicates.insert(field.as_str(), input, self.duplicate_key);
                return predicates;
            }
        }

        for clause in input.split(';') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            match clause.split_once(':') {
                Some((key, value)) => {
                    let key = key.trim();
                    if key.is_empty() {
                        tracing::trace!(clause, "skipping filter clause without a key");
                        continue;
                    }
                    predicates.insert(key, value.trim(), self.duplicate_key);
                }
                None => match self.malformed_clause {
                    MalformedClause::EmptyValue => {
                        predicates.insert(clause, "", self.duplicate_key);
                    }
                    MalformedClause::Skip => {
                        tracing::trace!(clause, "skipping malformed filter clause");
                    }
                },
            }
        }

        predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_predicates() {
        assert!(FilterParser::new().parse("").is_empty());
        assert!(FilterParser::new().parse("   ").is_empty());
        assert!(FilterParser::new().parse(";;").is_empty());
    }

    #[test]
    fn splits_clauses_and_pairs() {
        let p = FilterParser::new().parse("name:shirt;type.slug:clothing");
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("name"), Some("shirt"));
        assert_eq!(p.get("type.slug"), Some("clothing"));
    }

    #[test]
    fn splits_on_first_colon_only() {
        let p = FilterParser::new().parse("time:10:30:00");
        assert_eq!(p.get("time"), Some("10:30:00"));
    }

    #[test]
    fn trims_whitespace_and_trailing_separator() {
        let p = FilterParser::new().parse(" name : shirt ; ");
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("name"), Some("shirt"));
    }

    #[test]
    fn malformed_clause_defaults_to_empty_value() {
        let p = FilterParser::new().parse("name:shirt;orphan");
        assert_eq!(p.get("orphan"), Some(""));
    }

    #[test]
    fn malformed_clause_can_be_skipped() {
        let p = FilterParser::new()
            .malformed_clause(MalformedClause::Skip)
            .parse("name:shirt;orphan");
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("orphan"), None);
    }

    #[test]
    fn clause_with_empty_key_is_dropped() {
        let p = FilterParser::new().parse(":shirt;name:hat");
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("name"), Some("hat"));
    }

    #[test]
    fn duplicate_keys_last_wins_by_default() {
        let p = FilterParser::new().parse("name:a;slug:s;name:b");
        assert_eq!(p.get("name"), Some("b"));
        let fields: Vec<_> = p.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "slug"]);
    }

    #[test]
    fn duplicate_keys_first_wins() {
        let p = FilterParser::new()
            .duplicate_key(DuplicateKey::FirstWins)
            .parse("name:a;name:b");
        assert_eq!(p.get("name"), Some("a"));
    }

    #[test]
    fn bare_term_without_default_field_is_malformed() {
        let p = FilterParser::new().parse("shirt");
        assert_eq!(p.get("shirt"), Some(""));
    }

    #[test]
    fn bare_term_goes_to_default_field() {
        let p = FilterParser::new().default_field("name").parse(" red shirt ");
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("name"), Some("red shirt"));
    }

    #[test]
    fn encoded_pairs_ignore_default_field() {
        let p = FilterParser::new()
            .default_field("name")
            .parse("slug:hat;orphan");
        assert_eq!(p.get("slug"), Some("hat"));
        assert_eq!(p.get("orphan"), Some(""));
        assert_eq!(p.get("name"), None);
    }

    #[test]
    fn display_round_trips_encoding() {
        let p = FilterParser::new().parse("name:shirt;slug:x:y");
        assert_eq!(p.to_string(), "name:shirt;slug:x:y");
    }

    #[test]
    fn collects_from_pairs() {
        let p: Predicates = vec![("name", "a"), ("name", "b")].into_iter().collect();
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("name"), Some("b"));
    }
}
