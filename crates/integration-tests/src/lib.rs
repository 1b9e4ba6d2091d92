//! Integration tests for Cyberduck.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cyberduck-integration-tests
//! ```
//!
//! Upstream product sources are served by `wiremock`; persisted storage lives
//! in a `tempfile` directory. Nothing outside the test process is needed.
//!
//! # Test Categories
//!
//! - `storefront_search` - fetch cache, aggregation and search over HTTP
//! - `storefront_cart` - cart, gift cards and selection over file storage

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Value, json};

use cyberduck_storefront::config::{ConfigError, StorefrontConfig};

/// Build a configuration for `sources`, storing state in `storage`.
///
/// The search debounce is shortened to 50 ms to keep tests quick.
///
/// # Errors
///
/// Returns an error if a source URL is invalid.
pub fn test_config(sources: &[String], storage: &Path) -> Result<StorefrontConfig, ConfigError> {
    let vars = HashMap::from([
        ("CYBERDUCK_SOURCES", sources.join(",")),
        ("CYBERDUCK_STORAGE_PATH", storage.display().to_string()),
        ("CYBERDUCK_HTTP_TIMEOUT_SECS", "5".to_string()),
        ("CYBERDUCK_SEARCH_DEBOUNCE_MS", "50".to_string()),
    ]);
    StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
}

/// A product-list body holding `records`.
#[must_use]
pub fn catalog(records: &[Value]) -> Value {
    json!({ "data": records })
}
