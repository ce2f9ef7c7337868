//! Explicit result ordering.
//!
//! List endpoints accept `orderBy`/`sortedBy` parameters. When given, they
//! override relevance order: candidates are stably sorted by the named
//! field after filtering and before pagination.

use std::cmp::Ordering;
use std::fmt;

use crate::traits::Searchable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Parses a direction leniently: `desc` in any case is descending,
    /// anything else ascending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field and direction to sort by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates an ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Creates an ascending ordering.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a descending ordering.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Builds an ordering from raw `orderBy`/`sortedBy` parameters.
    ///
    /// Returns `None` when no (non-blank) field is given.
    pub fn from_params(order_by: Option<&str>, sorted_by: Option<&str>) -> Option<Self> {
        let field = order_by.map(str::trim).filter(|f| !f.is_empty())?;
        Some(OrderBy::new(field, sorted_by.map(Dir::parse).unwrap_or_default()))
    }

    /// Compares two records on this ordering's field.
    ///
    /// `None` values sort last in either direction; values that cannot be
    /// compared are treated as equal so a stable sort keeps their order.
    pub fn compare<T: Searchable>(&self, a: &T, b: &T) -> Ordering {
        let a = a.field_value(&self.field);
        let b = b.field_value(&self.field);
        match (&a, &b) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::None, _) => Ordering::Greater,
            (_, Value::None) => Ordering::Less,
            _ => compare_values(&a, &b)
                .map(|o| self.dir.apply(o))
                .unwrap_or(Ordering::Equal),
        }
    }

    /// Stably sorts records by this ordering.
    pub fn sort<T: Searchable>(&self, items: &mut [&T]) {
        items.sort_by(|a, b| self.compare(*a, *b));
    }
}

/// Compares two present values of the same kind.
///
/// Returns `None` on a kind mismatch, a NaN, or a `None` operand.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, RecordId};

    #[derive(Debug)]
    struct Item {
        id: i64,
        name: &'static str,
        rank: Option<i64>,
    }

    impl Searchable for Item {
        fn record_id(&self) -> RecordId<'_> {
            RecordId::Int(self.id)
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(self.name),
                "rank" => self.rank.map_or(Value::None, |r| Value::Number(Number::I64(r))),
                _ => Value::None,
            }
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                name: "beta",
                rank: Some(2),
            },
            Item {
                id: 2,
                name: "alpha",
                rank: None,
            },
            Item {
                id: 3,
                name: "gamma",
                rank: Some(1),
            },
            Item {
                id: 4,
                name: "alpha",
                rank: Some(3),
            },
        ]
    }

    fn ids(items: &[&Item]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn dir_parse_is_lenient() {
        assert_eq!(Dir::parse("desc"), Dir::Desc);
        assert_eq!(Dir::parse(" DESC "), Dir::Desc);
        assert_eq!(Dir::parse("asc"), Dir::Asc);
        assert_eq!(Dir::parse("sideways"), Dir::Asc);
        assert_eq!(Dir::Desc.to_string(), "desc");
    }

    #[test]
    fn from_params() {
        assert_eq!(OrderBy::from_params(None, Some("desc")), None);
        assert_eq!(OrderBy::from_params(Some("  "), None), None);
        assert_eq!(
            OrderBy::from_params(Some("name"), None),
            Some(OrderBy::asc("name"))
        );
        assert_eq!(
            OrderBy::from_params(Some("name"), Some("desc")),
            Some(OrderBy::desc("name"))
        );
    }

    #[test]
    fn sorts_strings_stably() {
        let items = items();
        let mut refs: Vec<&Item> = items.iter().collect();
        OrderBy::asc("name").sort(&mut refs);
        assert_eq!(ids(&refs), vec![2, 4, 1, 3]);

        OrderBy::desc("name").sort(&mut refs);
        assert_eq!(ids(&refs), vec![3, 1, 2, 4]);
    }

    #[test]
    fn none_values_sort_last_both_ways() {
        let items = items();
        let mut refs: Vec<&Item> = items.iter().collect();
        OrderBy::asc("rank").sort(&mut refs);
        assert_eq!(ids(&refs), vec![3, 1, 4, 2]);

        OrderBy::desc("rank").sort(&mut refs);
        assert_eq!(ids(&refs), vec![4, 1, 3, 2]);
    }

    #[test]
    fn unknown_field_keeps_order() {
        let items = items();
        let mut refs: Vec<&Item> = items.iter().collect();
        OrderBy::asc("missing").sort(&mut refs);
        assert_eq!(ids(&refs), vec![1, 2, 3, 4]);
    }

    #[test]
    fn compare_type_mismatch() {
        let s = Value::String("test");
        let n = Value::Number(Number::I64(42));
        assert_eq!(compare_values(&s, &n), None);
        assert_eq!(compare_values(&Value::Bool(false), &Value::Bool(true)), Some(Ordering::Less));
    }
}
