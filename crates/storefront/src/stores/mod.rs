//! Shopper state stores: cart, wishlist and comparison.
//!
//! Each store is an explicit object constructed once per shopper session and
//! passed by reference to whoever needs it. Stores hydrate from [`Storage`]
//! on construction and write their full collection back after every
//! mutation.
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! state stays authoritative. Stored data that fails to parse is discarded
//! and the store starts empty.

pub mod cart;
pub mod comparison;
pub mod product_set;
pub mod wishlist;

pub use cart::{CartItem, CartStore};
pub use comparison::{COMPARISON_LIMIT, ComparisonStore};
pub use product_set::ProductSet;
pub use wishlist::WishlistStore;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::Storage;

/// All shopper-scoped state for one session.
pub struct ShopperSession {
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub comparison: ComparisonStore,
}

impl ShopperSession {
    /// Hydrate every store from the same storage backend.
    #[must_use]
    pub fn load(storage: &Arc<dyn Storage>) -> Self {
        Self {
            cart: CartStore::load(Arc::clone(storage)),
            wishlist: WishlistStore::load(Arc::clone(storage)),
            comparison: ComparisonStore::load(Arc::clone(storage)),
        }
    }
}

/// Read a collection from storage, falling back to the default on any
/// missing or malformed value.
pub(crate) fn hydrate<T>(storage: &dyn Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted state");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "Discarding malformed persisted state");
        T::default()
    })
}

/// Write a collection to storage, logging (not returning) failures.
pub(crate) fn persist<T>(storage: &dyn Storage, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to serialize state");
            return;
        }
    };

    if let Err(e) = storage.save(key, &json) {
        tracing::warn!(key, error = %e, "Failed to persist state");
    }
}
