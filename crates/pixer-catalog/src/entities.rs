//! Catalog entity types.
//!
//! Records are read from JSON exactly as the admin API serves them. Each
//! type exposes its fields to the query engine through [`Searchable`];
//! related records are reached with dotted names such as `type.slug`.

use pixer_query::{RecordId, Searchable, Value};
use serde::{Deserialize, Serialize};

/// The product type a tag or category belongs to, as embedded in them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl TypeRef {
    fn field(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::from(self.id),
            "name" => Value::from(&self.name),
            "slug" => Value::from(&self.slug),
            _ => Value::None,
        }
    }
}

fn type_field<'a>(kind: Option<&'a TypeRef>, field: &str) -> Value<'a> {
    match (kind, field.strip_prefix("type.")) {
        (Some(kind), Some(rest)) => kind.field(rest),
        _ => Value::None,
    }
}

/// A product tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<TypeRef>,
}

impl Searchable for Tag {
    fn record_id(&self) -> RecordId<'_> {
        RecordId::Int(self.id)
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::from(self.id),
            "name" => Value::from(&self.name),
            "slug" => Value::from(&self.slug),
            "icon" => Value::from(self.icon.as_ref()),
            "details" => Value::from(self.details.as_ref()),
            _ => type_field(self.kind.as_ref(), field),
        }
    }
}

/// A product category, optionally nested under a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    /// Id of the parent category.
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(rename = "type", default)]
    pub kind: Option<TypeRef>,
}

impl Searchable for Category {
    fn record_id(&self) -> RecordId<'_> {
        RecordId::Int(self.id)
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::from(self.id),
            "name" => Value::from(&self.name),
            "slug" => Value::from(&self.slug),
            "icon" => Value::from(self.icon.as_ref()),
            "details" => Value::from(self.details.as_ref()),
            "parent" => Value::from(self.parent),
            _ => type_field(self.kind.as_ref(), field),
        }
    }
}

/// A product type (grocery, clothing, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Searchable for ProductType {
    fn record_id(&self) -> RecordId<'_> {
        RecordId::Int(self.id)
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::from(self.id),
            "name" => Value::from(&self.name),
            "slug" => Value::from(&self.slug),
            "icon" => Value::from(self.icon.as_ref()),
            _ => Value::None,
        }
    }
}

/// A vendor shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub orders_count: u64,
    #[serde(default)]
    pub products_count: u64,
}

impl Searchable for Shop {
    fn record_id(&self) -> RecordId<'_> {
        RecordId::Int(self.id)
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::from(self.id),
            "owner_id" => Value::from(self.owner_id),
            "name" => Value::from(&self.name),
            "slug" => Value::from(&self.slug),
            "description" => Value::from(self.description.as_ref()),
            "is_active" => Value::from(self.is_active),
            "orders_count" => Value::from(self.orders_count),
            "products_count" => Value::from(self.products_count),
            _ => Value::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clothing() -> TypeRef {
        TypeRef {
            id: 2,
            name: "Clothing".to_string(),
            slug: "clothing".to_string(),
        }
    }

    #[test]
    fn tag_exposes_nested_type_fields() {
        let tag = Tag {
            id: 7,
            name: "Shirts".to_string(),
            slug: "shirts".to_string(),
            icon: None,
            details: Some("Casual wear".to_string()),
            kind: Some(clothing()),
        };
        assert_eq!(tag.field_value("type.slug"), Value::String("clothing"));
        assert_eq!(tag.field_value("type.id"), Value::from(2i64));
        assert_eq!(tag.field_value("type.colour"), Value::None);
        assert_eq!(tag.field_value("icon"), Value::None);
        assert_eq!(tag.field_value("details"), Value::String("Casual wear"));
        assert!(tag.record_id().matches_key("7"));
    }

    #[test]
    fn missing_type_yields_none() {
        let category = Category {
            id: 1,
            name: "Fruits".to_string(),
            slug: "fruits".to_string(),
            icon: None,
            details: None,
            parent: Some(4),
            kind: None,
        };
        assert_eq!(category.field_value("type.slug"), Value::None);
        assert_eq!(category.field_value("parent"), Value::from(4i64));
    }

    #[test]
    fn tag_deserializes_admin_json() {
        let json = r#"{
            "id": 1,
            "name": "Fruits",
            "slug": "fruits",
            "icon": "FruitsVegetable",
            "type": { "id": 1, "name": "Grocery", "slug": "grocery" }
        }"#;
        let tag: Tag = serde_json::from_str(json).unwrap();
        assert_eq!(tag.details, None);
        assert_eq!(tag.kind.map(|k| k.slug).as_deref(), Some("grocery"));
    }

    #[test]
    fn shop_fields() {
        let shop = Shop {
            id: 3,
            owner_id: 1,
            name: "Furniture Shop".to_string(),
            slug: "furniture-shop".to_string(),
            description: None,
            is_active: true,
            orders_count: 12,
            products_count: 40,
        };
        assert_eq!(shop.field_value("is_active").render().as_deref(), Some("true"));
        assert_eq!(shop.field_value("orders_count").render().as_deref(), Some("12"));
        assert_eq!(shop.field_value("owner_id"), Value::from(1i64));
    }
}
