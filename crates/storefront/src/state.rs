//! Application state shared across front ends.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use cyberduck_core::{CartLineItem, GiftCard, Product};

use crate::aggregator::ProductAggregator;
use crate::cart::{CartStore, CartView};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::fetch::{FetchCache, FetchError, HttpTransport, Transport};
use crate::search::{SearchController, is_searchable};
use crate::selected::SelectedProductStore;
use crate::storage::{FileStorage, Storage};

/// Application state shared across all front ends.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// fetch cache, the aggregator, search, and the persisted stores.
pub struct AppState<T = HttpTransport> {
    inner: Arc<AppStateInner<T>>,
}

struct AppStateInner<T> {
    config: StorefrontConfig,
    cache: Arc<FetchCache<T>>,
    aggregator: Arc<ProductAggregator<T>>,
    search: SearchController<T>,
    cart: CartStore,
    selected: SelectedProductStore,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppState<HttpTransport> {
    /// Create application state backed by HTTP and the configured storage file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> std::result::Result<Self, FetchError> {
        let transport = HttpTransport::new(config.http_timeout)?;
        let storage = Arc::new(FileStorage::new(config.storage_path.clone()));
        Ok(Self::from_parts(config, transport, storage))
    }
}

impl<T: Transport + 'static> AppState<T> {
    /// Assemble state from an explicit transport and storage.
    #[must_use]
    pub fn from_parts(config: StorefrontConfig, transport: T, storage: Arc<dyn Storage>) -> Self {
        let cache = Arc::new(FetchCache::with_ttl(transport, config.cache_ttl));
        let aggregator = Arc::new(
            ProductAggregator::new(Arc::clone(&cache), config.source_urls())
                .with_limit(config.search_limit),
        );
        let search = SearchController::new(Arc::clone(&aggregator), config.search);
        let cart = CartStore::new(Arc::clone(&storage));
        let selected = SelectedProductStore::new(storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cache,
                aggregator,
                search,
                cart,
                selected,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shared fetch cache.
    #[must_use]
    pub fn cache(&self) -> &FetchCache<T> {
        &self.inner.cache
    }

    /// Get a reference to the product aggregator.
    #[must_use]
    pub fn aggregator(&self) -> &ProductAggregator<T> {
        &self.inner.aggregator
    }

    /// Get a reference to the debounced search controller.
    #[must_use]
    pub fn search(&self) -> &SearchController<T> {
        &self.inner.search
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the selected product store.
    #[must_use]
    pub fn selected(&self) -> &SelectedProductStore {
        &self.inner.selected
    }

    /// Fetch a JSON resource through the shared cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch or the JSON parse fails.
    pub async fn cached_fetch(&self, url: &str) -> std::result::Result<Arc<Value>, FetchError> {
        self.inner.cache.get(url).await
    }

    /// Render the current cart.
    #[must_use]
    pub fn render_cart(&self) -> CartView {
        self.inner.cart.view()
    }

    /// Search every source immediately, without debounce.
    ///
    /// A query shorter than the configured minimum returns no products and
    /// issues no request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SourcesUnavailable`] if every source failed.
    pub async fn search_now(&self, query: &str) -> Result<Vec<Product>> {
        if !is_searchable(query, self.inner.config.search.min_chars) {
            debug!(query = %query, "Query too short, not searching");
            return Ok(Vec::new());
        }

        let outcome = self.inner.aggregator.search(query).await;
        if outcome.all_sources_failed() {
            return Err(AppError::SourcesUnavailable(outcome.source_count));
        }
        Ok(outcome.products)
    }

    /// Search for `query`, then remember the match at `index` as the
    /// selected product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if there is no match at `index`, or an
    /// error if the search or the save fails.
    #[instrument(skip(self))]
    pub async fn select_product(&self, query: &str, index: usize) -> Result<Product> {
        let product = self
            .search_now(query)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| AppError::NotFound(format!("result {index} for {query:?}")))?;

        self.inner.selected.save(&product)?;
        info!(name = %product.name, "Product selected");
        Ok(product)
    }

    /// Add the selected product to the cart and return the new item count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no product is selected, or a cart
    /// error if the cart cannot be persisted.
    pub fn add_selected_to_cart(&self) -> Result<usize> {
        let product = self
            .inner
            .selected
            .load()
            .ok_or_else(|| AppError::NotFound("selected product".to_string()))?;
        Ok(self.inner.cart.add(CartLineItem::from_product(&product))?)
    }

    /// Validate a gift card amount and add the card to the cart.
    ///
    /// Returns the new item count. On a validation error the cart is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the amount is unparseable or below
    /// the minimum, or a cart error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn add_gift_card(&self, amount: &str) -> Result<usize> {
        let card = GiftCard::parse(amount)?;
        info!(amount = %card.amount(), "Gift card added");
        Ok(self.inner.cart.add(card.into_line_item())?)
    }
}
