//! Cyberduck Core - Shared types library.
//!
//! This crate provides common types used across all Cyberduck components:
//! - `storefront` - Fetch cache, product aggregation, search and the persisted cart
//! - `cli` - Command-line driver for the storefront pipeline
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Colombian prices, upstream products, cart line items and gift cards

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
