//! Cyberduck storefront library.
//!
//! The data pipeline behind the storefront pages: a time-windowed fetch
//! cache over upstream product sources, product aggregation and debounced
//! search, and a cart persisted to durable key-value storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregator;
pub mod cart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod search;
pub mod selected;
pub mod state;
pub mod storage;
