//! Debounced, latest-wins search driven by user input.
//!
//! Keystrokes arrive through [`SearchController::input`]. Each one resets a
//! debounce timer; only when the query has been idle for the debounce delay
//! does a search go out. A search that has started always runs to
//! completion, but it is tagged with a sequence number and its results are
//! dropped if a newer search was issued in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use cyberduck_core::Product;

use super::filter::{MIN_QUERY_CHARS, is_searchable};
use crate::aggregator::ProductAggregator;
use crate::fetch::Transport;

/// Idle time required before a query is searched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Idle time required before a query is searched.
    pub debounce: Duration,
    /// Shortest query, in characters, that triggers a search.
    pub min_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_chars: MIN_QUERY_CHARS,
        }
    }
}

/// What the results area should show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    /// No query long enough to search.
    #[default]
    Idle,
    /// Results of the latest search.
    Ready {
        sequence: u64,
        query: String,
        products: Vec<Product>,
    },
    /// The latest search reached no source.
    Failed {
        sequence: u64,
        query: String,
        message: String,
    },
}

/// Turns a stream of keystrokes into at most one search per idle gap.
///
/// Must be used from within a Tokio runtime.
pub struct SearchController<T> {
    aggregator: Arc<ProductAggregator<T>>,
    settings: SearchSettings,
    latest: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    state: Arc<watch::Sender<SearchState>>,
}

impl<T: Transport + 'static> SearchController<T> {
    /// Create a controller publishing results for `aggregator`.
    #[must_use]
    pub fn new(aggregator: Arc<ProductAggregator<T>>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            aggregator,
            settings,
            latest: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            state: Arc::new(state),
        }
    }

    /// Handle a change of the query text.
    ///
    /// Resets the debounce timer. A query below the minimum length cancels
    /// the pending timer, marks in-flight searches stale and publishes
    /// [`SearchState::Idle`] without touching the aggregator.
    pub fn input(&self, query: &str) {
        let query = query.trim().to_owned();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(timer) = pending.take() {
            timer.abort();
        }

        if !is_searchable(&query, self.settings.min_chars) {
            self.latest.fetch_add(1, Ordering::SeqCst);
            self.state.send_replace(SearchState::Idle);
            return;
        }

        let aggregator = Arc::clone(&self.aggregator);
        let latest = Arc::clone(&self.latest);
        let state = Arc::clone(&self.state);
        let debounce = self.settings.debounce;

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let sequence = latest.fetch_add(1, Ordering::SeqCst) + 1;
            // Detached: resetting the timer must not cancel a started search.
            tokio::spawn(run_search(aggregator, query, sequence, latest, state));
        }));
    }

    /// Subscribe to result updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// The currently published state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Search tuning in effect.
    #[must_use]
    pub const fn settings(&self) -> SearchSettings {
        self.settings
    }
}

impl<T> Drop for SearchController<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}

async fn run_search<T: Transport>(
    aggregator: Arc<ProductAggregator<T>>,
    query: String,
    sequence: u64,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<SearchState>>,
) {
    let outcome = aggregator.search(&query).await;

    if latest.load(Ordering::SeqCst) != sequence {
        debug!(sequence, query = %query, "Discarding stale search results");
        return;
    }

    let next = if outcome.all_sources_failed() {
        SearchState::Failed {
            sequence,
            message: format!("all {} product sources failed", outcome.source_count),
            query,
        }
    } else {
        SearchState::Ready {
            sequence,
            query,
            products: outcome.products,
        }
    };
    state.send_replace(next);
}
