//! Cart display model.
//!
//! What the cart dropdown shows: one line per item with its price re-parsed
//! and re-formatted, plus the item count and the total.

use tracing::warn;

use cyberduck_core::{CartLineItem, Price};

/// Display data for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Position in the cart, as accepted by `CartStore::remove_at`.
    pub index: usize,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub desc: String,
}

/// Display data for the whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: String,
    pub item_count: usize,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Price::ZERO.display(),
            item_count: 0,
        }
    }

    /// Render `items`.
    ///
    /// A line whose price does not parse is shown as stored and counts as
    /// zero towards the total. A line that would overflow the total is
    /// shown but left out of it.
    #[must_use]
    pub fn render(items: &[CartLineItem]) -> Self {
        if items.is_empty() {
            return Self::empty();
        }

        let mut total = Price::ZERO;
        let lines: Vec<CartLineView> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let price = match item.price() {
                    Ok(price) => {
                        match total.checked_add(price) {
                            Some(sum) => total = sum,
                            None => {
                                warn!(name = %item.name, price = %item.price, "Cart total overflowed, line left out");
                            }
                        }
                        price.display()
                    }
                    Err(e) => {
                        warn!(name = %item.name, price = %item.price, error = %e, "Unparseable cart price");
                        item.price.clone()
                    }
                };
                CartLineView {
                    index,
                    name: item.name.clone(),
                    price,
                    image_url: item.image_url().to_owned(),
                    desc: item.desc.clone(),
                }
            })
            .collect();

        Self {
            items: lines,
            total: total.display(),
            item_count: items.len(),
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CartView {
    fn default() -> Self {
        Self::empty()
    }
}
