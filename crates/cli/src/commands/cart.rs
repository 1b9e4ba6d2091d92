//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cyberduck cart add "Camiseta Roja" 12.500 --image roja.jpg
//! cyberduck cart show
//! cyberduck cart remove 0
//! cyberduck cart clear
//! ```

use tokio::sync::broadcast;

use cyberduck_core::{CartLineItem, Price};
use cyberduck_storefront::cart::CartUpdated;
use cyberduck_storefront::error::Result;
use cyberduck_storefront::state::AppState;

use super::emit;

/// Print every line item and the total.
pub fn show(state: &AppState) {
    let view = state.render_cart();
    if view.is_empty() {
        emit("Cart is empty");
        return;
    }

    for line in &view.items {
        emit(format!("[{}] {} - ${}", line.index, line.name, line.price));
        if !line.desc.is_empty() {
            emit(format!("    {}", line.desc));
        }
    }
    emit(format!("Total: ${} ({} items)", view.total, view.item_count));
}

/// Add a line item built from the given fields.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn add(state: &AppState, name: &str, price: Price, image: &str, desc: &str) -> Result<()> {
    let mut events = state.cart().subscribe();
    let count = state
        .cart()
        .add(CartLineItem::new(name, price.display(), image, desc))?;
    log_updates(&mut events);
    emit(format!("Added {name} ({count} items in cart)"));
    Ok(())
}

/// Add the selected product.
///
/// # Errors
///
/// Returns an error if nothing is selected or the cart cannot be persisted.
pub fn add_selected(state: &AppState) -> Result<()> {
    let mut events = state.cart().subscribe();
    let count = state.add_selected_to_cart()?;
    log_updates(&mut events);
    emit(format!("Added selected product ({count} items in cart)"));
    Ok(())
}

/// Remove the line item at `index`.
///
/// # Errors
///
/// Returns an error if `index` is out of range or the cart cannot be persisted.
pub fn remove(state: &AppState, index: usize) -> Result<()> {
    let mut events = state.cart().subscribe();
    let removed = state.cart().remove_at(index)?;
    log_updates(&mut events);
    emit(format!("Removed {}", removed.name));
    Ok(())
}

/// Remove every line item.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn clear(state: &AppState) -> Result<()> {
    let mut events = state.cart().subscribe();
    state.cart().clear()?;
    log_updates(&mut events);
    emit("Cart cleared");
    Ok(())
}

/// Log the cart notifications raised by the last mutation.
pub(super) fn log_updates(events: &mut broadcast::Receiver<CartUpdated>) {
    while let Ok(update) = events.try_recv() {
        tracing::debug!(
            event = CartUpdated::NAME,
            item_count = update.item_count,
            "Cart updated"
        );
    }
}
