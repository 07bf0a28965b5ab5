//! Core types for Tradeyard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod handle;
pub mod id;
pub mod price;
pub mod status;

pub use handle::{Handle, HandleError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
