//! Product search.
//!
//! - [`filter`] - pure matching of a query against aggregated products
//! - [`controller`] - debounce and latest-wins ordering on top of the
//!   [`ProductAggregator`](crate::aggregator::ProductAggregator)
//!
//! Queries under three characters never reach the aggregator; rapid typing
//! collapses into one request burst per 300 ms idle gap.

pub mod controller;
pub mod filter;

pub use controller::{DEFAULT_DEBOUNCE, SearchController, SearchSettings, SearchState};
pub use filter::{MIN_QUERY_CHARS, filter_products, is_searchable, matches};
