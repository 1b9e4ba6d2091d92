//! Cart line items.

use serde::{Deserialize, Serialize};

use super::price::{Price, PriceError};
use super::product::Product;

/// One entry of the persisted cart.
///
/// Every field is a display string: the price keeps its Colombian formatting
/// and is re-parsed whenever a total is needed. The image is either a raw URL
/// or a CSS `url(...)` value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub desc: String,
}

impl CartLineItem {
    /// Create a line item from its display fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        image: impl Into<String>,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            image: image.into(),
            desc: desc.into(),
        }
    }

    /// Build a line item for a product, formatting its price.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price_display(),
            image: product.image.clone(),
            desc: product.description.clone(),
        }
    }

    /// Re-parse the display price.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored string is not a Colombian-formatted amount.
    pub fn price(&self) -> Result<Price, PriceError> {
        Price::parse_display(&self.price)
    }

    /// The image URL with any CSS `url(...)` wrapper removed.
    #[must_use]
    pub fn image_url(&self) -> &str {
        let image = self.image.trim();
        let Some(inner) = image
            .strip_prefix("url(")
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return image;
        };
        let inner = inner.trim();
        inner
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
            .unwrap_or(inner)
    }
}
