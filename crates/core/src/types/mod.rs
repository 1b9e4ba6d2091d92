//! Core types for Cyberduck.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod gift_card;
pub mod price;
pub mod product;

pub use cart::CartLineItem;
pub use gift_card::{GiftCard, ValidationError};
pub use price::{Price, PriceError};
pub use product::Product;
