//! Gift card command.

use cyberduck_storefront::error::Result;
use cyberduck_storefront::state::AppState;

use super::cart::log_updates;
use super::emit;

/// Validate `amount` and add a gift card for it to the cart.
///
/// # Errors
///
/// Returns a validation error if the amount is unparseable or below the
/// minimum; the cart is left untouched in that case.
pub fn add(state: &AppState, amount: &str) -> Result<()> {
    let mut events = state.cart().subscribe();
    let count = state.add_gift_card(amount)?;
    log_updates(&mut events);
    emit(format!("Gift card added ({count} items in cart)"));
    Ok(())
}
