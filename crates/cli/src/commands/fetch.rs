//! Raw access to the fetch cache.

use cyberduck_storefront::error::Result;
use cyberduck_storefront::state::AppState;

use super::emit;

/// Fetch `url` through the cache and print the body as pretty JSON.
///
/// # Errors
///
/// Returns an error if the request or the JSON parse fails.
pub async fn run(state: &AppState, url: &str) -> Result<()> {
    let body = state.cached_fetch(url).await?;
    emit(format!("{body:#}"));
    Ok(())
}
