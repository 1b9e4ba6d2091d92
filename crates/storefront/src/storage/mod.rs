//! Durable key-value storage.
//!
//! The storefront persists two values: the cart and the last product the
//! shopper navigated to. Both live under fixed keys in a [`Storage`], read and
//! written synchronously.
//!
//! - [`FileStorage`] keeps every key in one JSON object file.
//! - [`MemoryStorage`] keeps keys in memory, with an optional byte quota.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage keys.
pub mod keys {
    /// Key for the serialized cart (JSON array of line items).
    pub const CART: &str = "cyberduck:cart";

    /// Key for the last product navigated to (JSON object).
    pub const SELECTED_PRODUCT: &str = "cyberduck:selectedProduct";
}

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized, or the backing file is not valid JSON.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the value would exceed the storage quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// A previous writer panicked while holding the storage lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key-value store.
pub trait Storage: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
