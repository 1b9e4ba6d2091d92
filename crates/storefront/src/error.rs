//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for the storefront entry points. Front
//! ends call [`AppError::report`] before showing the error to the user.

use thiserror::Error;

use cyberduck_core::ValidationError;

use crate::cart::CartError;
use crate::config::ConfigError;
use crate::fetch::FetchError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Cart mutation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Persisted storage failed outside the cart.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// User input was rejected.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Every product source failed.
    #[error("No product source could be reached ({0} tried)")]
    SourcesUnavailable(usize),
}

impl AppError {
    /// Whether the error comes from our side rather than from user input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::Storage(_) | Self::Config(_) | Self::SourcesUnavailable(_)
        ) || matches!(self, Self::Cart(CartError::Storage(_)))
    }

    /// Capture internal errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
