//! Product comparison store.

use std::sync::Arc;

use tradeyard_core::ProductId;

use crate::catalog::Product;
use crate::storage::{COMPARISON_KEY, Storage};

use super::ProductSet;

/// Maximum number of products compared side by side.
pub const COMPARISON_LIMIT: usize = 4;

/// Up to [`COMPARISON_LIMIT`] products selected for comparison.
///
/// Adding beyond the limit is silently ignored.
pub struct ComparisonStore {
    set: ProductSet,
}

impl ComparisonStore {
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        Self {
            set: ProductSet::load(storage, COMPARISON_KEY, Some(COMPARISON_LIMIT)),
        }
    }

    /// Add a product. Returns `false` if it was already present or the
    /// comparison is full.
    pub fn add(&mut self, product: &Product) -> bool {
        self.set.insert(product)
    }

    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.set.remove(product_id)
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.set.contains(product_id)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.set.is_full()
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

    fn comparison() -> (ComparisonStore, Arc<dyn Storage>) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        (ComparisonStore::load(Arc::clone(&storage)), storage)
    }

    #[test]
    fn test_fifth_product_is_ignored() {
        let (mut comparison, _) = comparison();
        for id in 1..=4 {
            assert!(comparison.add(&product(id, 1000, 1)));
        }
        assert!(comparison.is_full());

        assert!(!comparison.add(&product(5, 1000, 1)));
        assert_eq!(comparison.len(), 4);
        let ids: Vec<_> = comparison.items().iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_frees_a_slot() {
        let (mut comparison, _) = comparison();
        for id in 1..=4 {
            comparison.add(&product(id, 1000, 1));
        }
        assert!(comparison.remove(ProductId::new(2)));
        assert!(comparison.add(&product(5, 1000, 1)));
        assert!(comparison.contains(ProductId::new(5)));
    }

    #[test]
    fn test_duplicate_not_added() {
        let (mut comparison, _) = comparison();
        let p = product(1, 1000, 1);
        assert!(comparison.add(&p));
        assert!(!comparison.add(&p));
        assert_eq!(comparison.len(), 1);
    }

    #[test]
    fn test_oversized_storage_truncated_on_load() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let stored: Vec<Product> = (1..=6).map(|id| product(id, 1000, 1)).collect();
        storage
            .save(COMPARISON_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let comparison = ComparisonStore::load(storage);
        assert_eq!(comparison.len(), COMPARISON_LIMIT);
        assert!(!comparison.contains(ProductId::new(5)));
    }

    #[test]
    fn test_clear_persists() {
        let (mut comparison, storage) = comparison();
        comparison.add(&product(1, 1000, 1));
        comparison.clear();
        assert!(ComparisonStore::load(storage).is_empty());
    }
}
