//! Time-windowed memoization of upstream JSON resources.
//!
//! # Architecture
//!
//! - [`FetchCache`] maps request URLs to the last fetched body and when it
//!   was fetched
//! - Entries younger than the TTL (5 minutes by default) are served without
//!   touching the network
//! - Staleness is checked at read time; nothing sweeps old entries
//! - Failed fetches write nothing, so the next call simply retries
//!
//! The network side sits behind the [`Transport`] trait. Production code uses
//! [`HttpTransport`] (`reqwest`); tests plug in counting stubs.
//!
//! # Example
//!
//! ```rust,ignore
//! use cyberduck_storefront::fetch::{FetchCache, HttpTransport};
//!
//! let cache = FetchCache::new(HttpTransport::new(Duration::from_secs(10))?);
//! let body = cache.get("https://api.example.com/products").await?;
//! ```

mod transport;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, instrument};

pub use transport::{HttpTransport, Transport};

/// How long a fetched resource is served from memory.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when fetching an upstream resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Response body is not JSON.
    #[error("JSON parse error for {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Response body is JSON but not in the expected shape.
    #[error("Unexpected response from {url}: {reason}")]
    Shape { url: String, reason: &'static str },
}

/// A fetched body and the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Arc<Value>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// Whether the entry is still within `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// URL-keyed cache of upstream JSON bodies.
///
/// Built once per process and shared by `Arc`. Concurrent misses for the same
/// URL each go to the network; the last one to finish wins.
pub struct FetchCache<T> {
    transport: T,
    entries: Cache<String, CacheEntry>,
    ttl: Duration,
}

impl<T: Transport> FetchCache<T> {
    /// Create a cache with the default 5-minute TTL.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_ttl(transport, DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(transport: T, ttl: Duration) -> Self {
        Self {
            transport,
            entries: Cache::builder().name("fetch-cache").build(),
            ttl,
        }
    }

    /// Get the JSON body at `url`, from memory when fresh.
    ///
    /// Two calls inside the TTL return the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch or the JSON parse fails. Nothing is
    /// cached in that case.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Arc<Value>, FetchError> {
        if let Some(entry) = self.entries.get(url).await
            && entry.is_fresh(Instant::now(), self.ttl)
        {
            debug!("Cache hit");
            return Ok(entry.data);
        }

        debug!("Cache miss, fetching");
        let data = Arc::new(self.transport.get_json(url).await?);

        self.entries
            .insert(
                url.to_owned(),
                CacheEntry {
                    data: Arc::clone(&data),
                    fetched_at: Instant::now(),
                },
            )
            .await;

        Ok(data)
    }

    /// Drop the entry for `url`, forcing the next `get` to fetch.
    pub async fn invalidate(&self, url: &str) {
        self.entries.invalidate(url).await;
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}
