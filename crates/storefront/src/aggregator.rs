//! Product aggregation across upstream sources.
//!
//! Every configured source is a product-list endpoint answering
//! `{ "data": [ ...records ] }`. The aggregator fetches all of them through the
//! shared [`FetchCache`], concurrently, and concatenates the products in
//! source order. A source that fails contributes no products; it never takes
//! the others down with it.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{instrument, warn};

use cyberduck_core::Product;

use crate::fetch::{FetchCache, FetchError, Transport};
use crate::search::filter_products;

/// Maximum number of products returned by a search.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Result of one aggregation round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOutcome {
    /// Products, in source order then per-source order.
    pub products: Vec<Product>,
    /// URLs of the sources that failed this round.
    pub failed_sources: Vec<String>,
    /// Number of sources queried.
    pub source_count: usize,
}

impl AggregateOutcome {
    /// Whether every queried source failed.
    #[must_use]
    pub fn all_sources_failed(&self) -> bool {
        self.source_count > 0 && self.failed_sources.len() == self.source_count
    }
}

/// Fans product-list requests out to every source and merges the results.
pub struct ProductAggregator<T> {
    cache: Arc<FetchCache<T>>,
    sources: Vec<String>,
    limit: usize,
}

impl<T: Transport> ProductAggregator<T> {
    /// Create an aggregator over `sources`, in the given order.
    #[must_use]
    pub fn new(cache: Arc<FetchCache<T>>, sources: Vec<String>) -> Self {
        Self {
            cache,
            sources,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Set the maximum number of products a search returns.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Configured source URLs.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// The shared fetch cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<FetchCache<T>> {
        &self.cache
    }

    /// Fetch every source and concatenate all products, unfiltered.
    pub async fn products(&self) -> AggregateOutcome {
        let results = join_all(self.sources.iter().map(|url| self.fetch_source(url))).await;

        let mut outcome = AggregateOutcome {
            source_count: self.sources.len(),
            ..AggregateOutcome::default()
        };

        for (url, result) in self.sources.iter().zip(results) {
            match result {
                Ok(products) => outcome.products.extend(products),
                Err(e) => {
                    warn!(url = %url, error = %e, "Product source failed");
                    outcome.failed_sources.push(url.clone());
                }
            }
        }

        outcome
    }

    /// Fetch every source and keep the first matches for `query`.
    ///
    /// Matching is a case-insensitive substring test against name or
    /// description; results stay in concatenation order.
    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub async fn search(&self, query: &str) -> AggregateOutcome {
        let mut outcome = self.products().await;
        outcome.products = filter_products(outcome.products, query, self.limit);
        outcome
    }

    async fn fetch_source(&self, url: &str) -> Result<Vec<Product>, FetchError> {
        let body = self.cache.get(url).await?;
        let records = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Shape {
                url: url.to_owned(),
                reason: "missing `data` array",
            })?;
        Ok(records.iter().map(Product::from_record).collect())
    }
}
