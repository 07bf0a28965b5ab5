//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Lifecycle of one freight quote attempt.
///
/// A quote attempt moves `Idle -> Loading -> Success | Error`. There is no
/// retry state; a new attempt starts again from `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl QuoteStatus {
    /// Whether the attempt has finished, successfully or not.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Stock availability of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
}

impl StockStatus {
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::InStock)
    }
}
