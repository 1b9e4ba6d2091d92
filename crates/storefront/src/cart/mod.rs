//! Persisted shopping cart.
//!
//! The cart is an ordered list of [`CartLineItem`]s stored as one JSON array
//! under [`keys::CART`]. Every mutation is a read-modify-write of that blob,
//! and every successful mutation broadcasts a [`CartUpdated`] event after the
//! write lands. Nothing guards against another process writing the same
//! blob concurrently.

mod view;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use cyberduck_core::CartLineItem;

use crate::storage::{Storage, StorageError, keys};

pub use view::{CartLineView, CartView};

/// Name of the cart change notification.
pub const CART_UPDATED_EVENT: &str = "cyberduck:cart-updated";

/// Buffered notifications per subscriber before older ones are dropped.
const EVENT_CAPACITY: usize = 16;

/// Errors that can occur when mutating the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Persisting the cart failed; the stored cart is unchanged.
    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// No line item at the requested position.
    #[error("No cart item at index {index} (cart has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Broadcast after every successful cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartUpdated {
    /// Number of line items after the mutation.
    pub item_count: usize,
}

impl CartUpdated {
    /// Event name, as seen by listeners.
    pub const NAME: &'static str = CART_UPDATED_EVENT;
}

/// Read/write access to the persisted cart.
///
/// Cheaply cloneable; clones share the storage and the event channel.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn Storage>,
    events: broadcast::Sender<CartUpdated>,
}

impl CartStore {
    /// Create a cart store over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    /// Subscribe to [`CartUpdated`] notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartUpdated> {
        self.events.subscribe()
    }

    /// Current cart contents.
    ///
    /// An absent, unreadable or malformed blob reads as an empty cart.
    #[must_use]
    pub fn read(&self) -> Vec<CartLineItem> {
        let raw = match self.storage.get_item(keys::CART) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart, treating as empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Stored cart is malformed, treating as empty");
            Vec::new()
        })
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Replace the whole cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails. No event is sent
    /// in that case.
    pub fn write(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        self.persist(items)?;
        self.notify(items.len());
        Ok(())
    }

    /// Append `item` and return the new item count.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self, item), fields(name = %item.name))]
    pub fn add(&self, item: CartLineItem) -> Result<usize, CartError> {
        let mut items = self.read();
        items.push(item);
        self.write(&items)?;
        Ok(items.len())
    }

    /// Remove and return the line item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if `index` is not a position in
    /// the cart, or a storage error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove_at(&self, index: usize) -> Result<CartLineItem, CartError> {
        let mut items = self.read();
        if index >= items.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        let removed = items.remove(index);
        self.write(&items)?;
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), CartError> {
        self.write(&[])?;
        Ok(())
    }

    /// Render the current cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::render(&self.read())
    }

    fn persist(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set_item(keys::CART, &raw)
    }

    fn notify(&self, item_count: usize) {
        // No subscribers is fine; the cart is still persisted.
        if self.events.send(CartUpdated { item_count }).is_err() {
            debug!(event = CART_UPDATED_EVENT, "No cart listeners");
        }
    }
}
