//! Query matching over aggregated products.

use cyberduck_core::Product;

/// Shortest query, in characters, that triggers a search.
pub const MIN_QUERY_CHARS: usize = 3;

/// Whether `query` is long enough to search for.
///
/// Surrounding whitespace does not count; length is measured in characters,
/// so `"ñañ"` qualifies.
#[must_use]
pub fn is_searchable(query: &str, min_chars: usize) -> bool {
    query.trim().chars().count() >= min_chars
}

/// Case-insensitive substring match against name or description.
///
/// `needle` must already be lowercase.
#[must_use]
pub fn matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

/// Keep the first `limit` products matching `query`, in input order.
///
/// An empty query matches everything.
#[must_use]
pub fn filter_products(
    products: impl IntoIterator<Item = Product>,
    query: &str,
    limit: usize,
) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    products
        .into_iter()
        .filter(|product| matches(product, &needle))
        .take(limit)
        .collect()
}
