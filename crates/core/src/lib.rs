//! Tradeyard Core - Shared types library.
//!
//! This crate provides common types used across all Tradeyard components:
//! - `storefront` - Catalog, shopper stores, freight quotes and the JSON API
//! - `cli` - Command-line client for the same stores
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, handles, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
