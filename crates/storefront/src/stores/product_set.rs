//! Persisted, ordered set of products keyed by product ID.

use std::sync::Arc;

use tradeyard_core::ProductId;

use crate::catalog::Product;
use crate::storage::Storage;

use super::{hydrate, persist};

/// Insertion-ordered product set with an optional size cap.
///
/// Backs both the wishlist and the comparison store.
pub struct ProductSet {
    key: &'static str,
    limit: Option<usize>,
    products: Vec<Product>,
    storage: Arc<dyn Storage>,
}

impl ProductSet {
    /// Hydrate the set stored under `key`.
    ///
    /// Duplicates are dropped and, with a `limit`, only the first `limit`
    /// distinct products are kept.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>, key: &'static str, limit: Option<usize>) -> Self {
        let stored: Vec<Product> = hydrate(&*storage, key);

        let mut products: Vec<Product> = Vec::with_capacity(stored.len());
        for product in stored {
            if limit.is_some_and(|max| products.len() >= max) {
                break;
            }
            if !products.iter().any(|p| p.id == product.id) {
                products.push(product);
            }
        }

        Self {
            key,
            limit,
            products,
            storage,
        }
    }

    fn save(&self) {
        persist(&*self.storage, self.key, &self.products);
    }

    /// Insert a product.
    ///
    /// Returns `false` without changing anything if the product is already a
    /// member or the set is at its limit.
    pub fn insert(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        if self.is_full() {
            tracing::debug!(key = self.key, product_id = %product.id, "Set full, ignoring insert");
            return false;
        }
        self.products.push(product.clone());
        self.save();
        true
    }

    /// Remove a product. Returns whether it was a member.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != product_id);
        let removed = self.products.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.products.clear();
        self.save();
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|max| self.products.len() >= max)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
