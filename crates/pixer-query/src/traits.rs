//! The capability records implement to be queryable.

use crate::value::{RecordId, Value};

/// Trait for record types that can be filtered, searched and paginated.
///
/// The engine is generic over record shape: it only needs a stable
/// identity and a way to extract named fields. Which fields are searched is
/// decided per entity type by [`SearchConfig`](crate::SearchConfig).
///
/// # Example
///
/// ```
/// use pixer_query::{RecordId, Searchable, Value};
///
/// struct Tag {
///     id: i64,
///     name: String,
///     slug: String,
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
///             "slug" => Value::String(&self.slug),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Searchable {
    /// Returns the stable identifier of this record.
    fn record_id(&self) -> RecordId<'_>;

    /// Returns the value of a field, or [`Value::None`] if the field
    /// doesn't exist or is empty for this record.
    ///
    /// Nested fields use dotted names (`"type.slug"`).
    fn field_value(&self, field: &str) -> Value<'_>;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn record_id(&self) -> RecordId<'_> {
        (**self).record_id()
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}
