//! The last product the shopper navigated to.

use std::sync::Arc;

use tracing::warn;

use cyberduck_core::Product;

use crate::storage::{Storage, StorageError, keys};

/// Persists one product under [`keys::SELECTED_PRODUCT`].
#[derive(Clone)]
pub struct SelectedProductStore {
    storage: Arc<dyn Storage>,
}

impl SelectedProductStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Remember `product` as the selected one, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be persisted.
    pub fn save(&self, product: &Product) -> Result<(), StorageError> {
        let raw = serde_json::to_string(product)?;
        self.storage.set_item(keys::SELECTED_PRODUCT, &raw)
    }

    /// The selected product, or `None` when absent or malformed.
    #[must_use]
    pub fn load(&self) -> Option<Product> {
        let raw = match self.storage.get_item(keys::SELECTED_PRODUCT) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read selected product");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "Stored selected product is malformed"))
            .ok()
    }
}
