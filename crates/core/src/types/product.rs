//! Upstream product records.
//!
//! Product-list endpoints do not agree on field names: one source sends
//! `NAME`, another `name`, another `nombre`. A [`Product`] is built by walking
//! a fallback chain per field and keeping the first non-empty value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::price::Price;

/// Field names tried, in order, for the product name.
pub const NAME_FIELDS: &[&str] = &["NAME", "name", "nombre", "title"];
/// Field names tried, in order, for the product price.
pub const PRICE_FIELDS: &[&str] = &["PRICE", "price", "precio"];
/// Field names tried, in order, for the product description.
pub const DESCRIPTION_FIELDS: &[&str] = &["DESCRIPTION", "description", "descripcion", "desc"];
/// Field names tried, in order, for the product image.
pub const IMAGE_FIELDS: &[&str] = &["IMAGE", "image", "imagen", "img"];

/// A product as listed by an upstream source.
///
/// Products have no identity: two sources listing the same item yield two
/// products.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Product {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Price, when the source sent one that parses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Create a product with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a product from a raw upstream record.
    ///
    /// Non-object records produce an empty product.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        Self {
            name: first_text(record, NAME_FIELDS).unwrap_or_default(),
            price: first_present(record, PRICE_FIELDS).and_then(Price::from_json),
            description: first_text(record, DESCRIPTION_FIELDS).unwrap_or_default(),
            image: first_text(record, IMAGE_FIELDS).unwrap_or_default(),
        }
    }

    /// Price formatted for display, or an empty string when unknown.
    #[must_use]
    pub fn price_display(&self) -> String {
        self.price.map(|p| p.display()).unwrap_or_default()
    }
}

/// A value counts as present when it is a non-blank string or a number.
fn is_present(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(_) => true,
        _ => false,
    }
}

fn first_present<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| record.get(field))
        .find(|value| is_present(value))
}

fn first_text(record: &Value, fields: &[&str]) -> Option<String> {
    first_present(record, fields).map(|value| match value {
        Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_record_uppercase_fields() {
        let product = Product::from_record(&json!({
            "NAME": "Camiseta Roja",
            "PRICE": 12500,
            "DESCRIPTION": "Algodón",
            "IMAGE": "https://cdn.example.com/roja.jpg",
        }));

        assert_eq!(product.name, "Camiseta Roja");
        assert_eq!(product.price_display(), "12.500");
        assert_eq!(product.description, "Algodón");
        assert_eq!(product.image, "https://cdn.example.com/roja.jpg");
    }

    #[test]
    fn test_from_record_spanish_fields() {
        let product = Product::from_record(&json!({
            "nombre": "Falda Azul",
            "precio": "45.900",
            "descripcion": "Lino",
            "imagen": "azul.jpg",
        }));

        assert_eq!(product.name, "Falda Azul");
        assert_eq!(product.price_display(), "45.900");
        assert_eq!(product.description, "Lino");
        assert_eq!(product.image, "azul.jpg");
    }

    #[test]
    fn test_from_record_first_non_empty_wins() {
        let product = Product::from_record(&json!({
            "NAME": "",
            "name": "   ",
            "nombre": "Gorra",
            "title": "ignored",
        }));
        assert_eq!(product.name, "Gorra");
    }

    #[test]
    fn test_from_record_unparseable_price_is_none() {
        let product = Product::from_record(&json!({ "name": "Gorra", "price": "gratis" }));
        assert_eq!(product.price, None);
        assert_eq!(product.price_display(), "");
    }

    #[test]
    fn test_from_record_non_object() {
        assert_eq!(Product::from_record(&json!("Gorra")), Product::default());
        assert_eq!(Product::from_record(&json!(null)), Product::default());
    }

    #[test]
    fn test_numeric_name_kept_as_text() {
        let product = Product::from_record(&json!({ "name": 501 }));
        assert_eq!(product.name, "501");
    }

    #[test]
    fn test_serde_round_trip() {
        let product = Product::from_record(&json!({ "name": "Gorra", "price": 30000 }));
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
