//! Product search commands.
//!
//! # Usage
//!
//! ```bash
//! cyberduck search roja
//! cyberduck select roja --index 0
//! ```

use cyberduck_core::Product;
use cyberduck_storefront::error::{AppError, Result};
use cyberduck_storefront::search::{SearchState, is_searchable};
use cyberduck_storefront::state::AppState;

use super::emit;

/// Run `query` through the debounced search controller and print the
/// results once they are published.
///
/// # Errors
///
/// Returns [`AppError::SourcesUnavailable`] if no source could be reached.
pub async fn run(state: &AppState, query: &str) -> Result<()> {
    let controller = state.search();
    let min_chars = controller.settings().min_chars;

    if !is_searchable(query, min_chars) {
        tracing::info!("Type at least {min_chars} characters to search");
        return Ok(());
    }

    let mut updates = controller.subscribe();
    controller.input(query);

    while updates.changed().await.is_ok() {
        let published = updates.borrow_and_update().clone();
        match published {
            SearchState::Idle => {}
            SearchState::Ready {
                query, products, ..
            } => {
                print_products(&query, &products);
                return Ok(());
            }
            SearchState::Failed { message, .. } => {
                tracing::warn!("Search failed: {message}");
                return Err(AppError::SourcesUnavailable(state.aggregator().sources().len()));
            }
        }
    }
    Ok(())
}

/// Search for `query` and store the result at `index` as the selected product.
///
/// # Errors
///
/// Returns an error if there is no result at `index` or the selection cannot
/// be saved.
pub async fn select(state: &AppState, query: &str, index: usize) -> Result<()> {
    let product = state.select_product(query, index).await?;
    emit(format!("Selected: {}", describe(&product)));
    Ok(())
}

fn print_products(query: &str, products: &[Product]) {
    if products.is_empty() {
        emit(format!("No products match {query:?}"));
        return;
    }
    for (i, product) in products.iter().enumerate() {
        emit(format!("[{i}] {}", describe(product)));
    }
}

fn describe(product: &Product) -> String {
    let mut line = product.name.clone();
    if product.price.is_some() {
        line.push_str(&format!(" - ${}", product.price_display()));
    }
    if !product.description.is_empty() {
        line.push_str(&format!(" ({})", product.description));
    }
    line
}
