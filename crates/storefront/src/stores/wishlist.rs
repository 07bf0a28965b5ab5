//! Wishlist store.

use std::sync::Arc;

use tradeyard_core::ProductId;

use crate::catalog::Product;
use crate::storage::{Storage, WISHLIST_KEY};

use super::ProductSet;

/// Products the shopper saved for later. Unbounded, no quantities.
pub struct WishlistStore {
    set: ProductSet,
}

impl WishlistStore {
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        Self {
            set: ProductSet::load(storage, WISHLIST_KEY, None),
        }
    }

    /// Add a product. Returns `false` if it was already saved.
    pub fn add(&mut self, product: &Product) -> bool {
        self.set.insert(product)
    }

    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.set.remove(product_id)
    }

    /// Add the product if absent, otherwise remove it.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.set.contains(product.id) {
            self.set.remove(product.id);
            false
        } else {
            self.set.insert(product)
        }
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.set.contains(product_id)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        self.set.items()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::stores::cart::tests::product;

    fn wishlist() -> (WishlistStore, Arc<dyn Storage>) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        (WishlistStore::load(Arc::clone(&storage)), storage)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut wishlist, _) = wishlist();
        let p = product(1, 1000, 1);
        assert!(wishlist.add(&p));
        assert!(!wishlist.add(&p));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let (mut wishlist, _) = wishlist();
        let p = product(1, 1000, 1);
        assert!(wishlist.toggle(&p));
        assert!(wishlist.contains(p.id));
        assert!(!wishlist.toggle(&p));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_persists_across_loads() {
        let (mut wishlist, storage) = wishlist();
        wishlist.add(&product(1, 1000, 1));
        wishlist.add(&product(2, 1000, 1));
        wishlist.remove(ProductId::new(1));

        let reloaded = WishlistStore::load(storage);
        let ids: Vec<_> = reloaded.items().iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_malformed_storage_is_empty() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.save(WISHLIST_KEY, "not json").unwrap();
        assert!(WishlistStore::load(storage).is_empty());
    }
}
