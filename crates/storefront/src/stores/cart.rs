//! Cart store.
//!
//! One line item per product ID. Quantities are never below the product's
//! minimum order quantity: the clamp is applied on add, on update and when
//! hydrating persisted state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tradeyard_core::{CurrencyCode, Price, ProductId};

use crate::catalog::{Product, ShippingOption};
use crate::freight::FreightQuote;
use crate::storage::{CART_KEY, Storage};

use super::{hydrate, persist};

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    /// Selected shipping for this line, charged once per line.
    #[serde(default)]
    pub shipping_option: Option<ShippingOption>,
    /// Last freight quote recorded for this line.
    #[serde(default)]
    pub freight_quote: Option<FreightQuote>,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    /// Line price plus selected shipping.
    #[must_use]
    pub fn line_total(&self) -> Price {
        match &self.shipping_option {
            Some(option) => self.line_price() + option.price,
            None => self.line_price(),
        }
    }
}

/// The shopper's cart.
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Arc<dyn Storage>,
}

impl CartStore {
    /// Hydrate the cart from storage.
    ///
    /// Malformed data yields an empty cart. Duplicate lines are merged and
    /// quantities clamped so the store invariants hold after load.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let stored: Vec<CartItem> = hydrate(&*storage, CART_KEY);

        let mut items: Vec<CartItem> = Vec::with_capacity(stored.len());
        for mut item in stored {
            item.quantity = item.product.clamp_quantity(item.quantity);
            if let Some(existing) = items.iter_mut().find(|i| i.product.id == item.product.id) {
                existing.quantity = existing
                    .product
                    .clamp_quantity(existing.quantity.saturating_add(item.quantity));
            } else {
                items.push(item);
            }
        }

        Self { items, storage }
    }

    fn save(&self) {
        persist(&*self.storage, CART_KEY, &self.items);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product, merging with an existing line.
    ///
    /// `quantity` defaults to the product's minimum order quantity. Adding a
    /// product already in the cart increases its quantity by `quantity`. A
    /// provided `shipping_option` replaces the line's previous selection.
    #[tracing::instrument(skip_all, fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: Option<u32>,
        shipping_option: Option<ShippingOption>,
    ) {
        let requested = quantity.unwrap_or_else(|| product.minimum_quantity());

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = product.clamp_quantity(item.quantity.saturating_add(requested));
            if shipping_option.is_some() {
                item.shipping_option = shipping_option;
            }
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: product.clamp_quantity(requested),
                shipping_option,
                freight_quote: None,
            });
        }

        tracing::debug!(lines = self.items.len(), "Cart updated");
        self.save();
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    /// Set a line's quantity.
    ///
    /// Non-positive quantities remove the line. Positive quantities are
    /// clamped to the minimum order quantity. Returns whether the line
    /// existed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_from_cart(product_id);
        }

        let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) else {
            return false;
        };
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        item.quantity = item.product.clamp_quantity(quantity);
        self.save();
        true
    }

    /// Select (or clear with `None`) the shipping option for a line.
    pub fn select_shipping(
        &mut self,
        product_id: ProductId,
        option: Option<ShippingOption>,
    ) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) else {
            return false;
        };
        item.shipping_option = option;
        self.save();
        true
    }

    /// Record a freight quote on a line.
    ///
    /// A priced quote also becomes the line's selected shipping option.
    pub fn attach_quote(&mut self, product_id: ProductId, quote: FreightQuote) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) else {
            return false;
        };
        let currency = item.product.price.currency_code;
        if let Some(option) = quote.to_shipping_option(currency) {
            item.shipping_option = Some(option);
        }
        item.freight_quote = Some(quote);
        self.save();
        true
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.save();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn currency(&self) -> CurrencyCode {
        self.items
            .first()
            .map_or_else(CurrencyCode::default, |i| i.product.price.currency_code)
    }

    /// Sum of `price × quantity` across lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items
            .iter()
            .fold(Price::zero(self.currency()), |acc, i| acc + i.line_price())
    }

    /// Sum of selected shipping prices.
    #[must_use]
    pub fn shipping_total(&self) -> Price {
        self.items
            .iter()
            .filter_map(|i| i.shipping_option.as_ref())
            .fold(Price::zero(self.currency()), |acc, o| acc + o.price)
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal() + self.shipping_total()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::Decimal;
    use tradeyard_core::{Handle, StockStatus, VendorId};

    use super::*;
    use crate::storage::MemoryStorage;

    pub(crate) fn product(id: u32, price_cents: i64, min_order_quantity: u32) -> Product {
        Product {
            id: ProductId::new(id),
            handle: Handle::from_name(&format!("product {id}")).unwrap(),
            name: format!("Product {id}"),
            description: String::new(),
            images: Vec::new(),
            price: Price::usd_cents(price_cents),
            compare_at_price: None,
            category: Handle::from_name("test").unwrap(),
            vendor_id: VendorId::new(1),
            stock: StockStatus::InStock,
            min_order_quantity,
            dimensions: None,
            shipping_options: Vec::new(),
        }
    }

    fn shipping(cents: i64) -> ShippingOption {
        ShippingOption {
            id: "ground".to_string(),
            carrier: "Ground".to_string(),
            price: Price::usd_cents(cents),
            estimated_days: Some(3),
        }
    }

    fn cart() -> (CartStore, Arc<dyn Storage>) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        (CartStore::load(Arc::clone(&storage)), storage)
    }

    #[test]
    fn test_add_clamps_to_minimum() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 5);
        cart.add_to_cart(&p, Some(2), None);
        assert_eq!(cart.get(p.id).unwrap().quantity, 5);

        let q = product(2, 1000, 5);
        cart.add_to_cart(&q, Some(9), None);
        assert_eq!(cart.get(q.id).unwrap().quantity, 9);
    }

    #[test]
    fn test_add_without_quantity_uses_minimum() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 3);
        cart.add_to_cart(&p, None, None);
        assert_eq!(cart.get(p.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_zero_minimum_treated_as_one() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 0);
        cart.add_to_cart(&p, Some(0), None);
        assert_eq!(cart.get(p.id).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_twice_merges() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 2);
        cart.add_to_cart(&p, Some(3), None);
        cart.add_to_cart(&p, Some(4), None);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get(p.id).unwrap().quantity, 7);
    }

    #[test]
    fn test_readd_replaces_shipping_only_when_given() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 1);
        cart.add_to_cart(&p, Some(1), Some(shipping(300)));
        cart.add_to_cart(&p, Some(1), None);
        assert_eq!(
            cart.get(p.id).unwrap().shipping_option.as_ref().unwrap().price,
            Price::usd_cents(300)
        );
        cart.add_to_cart(&p, Some(1), Some(shipping(700)));
        assert_eq!(cart.shipping_total(), Price::usd_cents(700));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let (mut cart, _) = cart();
        let a = product(1, 1000, 1);
        let b = product(2, 500, 1);
        cart.add_to_cart(&a, Some(2), None);
        cart.add_to_cart(&b, Some(1), None);

        assert!(cart.update_quantity(a.id, 0));
        assert!(cart.get(a.id).is_none());
        assert_eq!(cart.item_count(), 1);

        assert!(cart.update_quantity(b.id, -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 4);
        cart.add_to_cart(&p, Some(10), None);
        assert!(cart.update_quantity(p.id, 2));
        assert_eq!(cart.get(p.id).unwrap().quantity, 4);
        assert!(!cart.update_quantity(ProductId::new(99), 3));
    }

    #[test]
    fn test_total_includes_shipping() {
        let (mut cart, _) = cart();
        let a = product(1, 1000, 1);
        let b = product(2, 500, 1);
        cart.add_to_cart(&a, Some(2), None);
        cart.add_to_cart(&b, Some(1), Some(shipping(300)));

        assert_eq!(cart.subtotal().amount, Decimal::new(25, 0));
        assert_eq!(cart.shipping_total().amount, Decimal::new(3, 0));
        assert_eq!(cart.total().amount, Decimal::new(28, 0));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_empty_cart_totals() {
        let (cart, _) = cart();
        assert_eq!(cart.total().amount, Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_mutations_persist() {
        let (mut cart, storage) = cart();
        let p = product(1, 1000, 1);
        cart.add_to_cart(&p, Some(2), None);

        let reloaded = CartStore::load(Arc::clone(&storage));
        assert_eq!(reloaded.get(p.id).unwrap().quantity, 2);

        cart.clear_cart();
        let reloaded = CartStore::load(storage);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_malformed_storage_is_empty_cart() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.save(CART_KEY, "[{\"product\": 12}]").unwrap();
        let cart = CartStore::load(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_load_repairs_invariants() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let p = product(1, 1000, 5);
        let stored = vec![
            CartItem {
                product: p.clone(),
                quantity: 1,
                shipping_option: None,
                freight_quote: None,
            },
            CartItem {
                product: p.clone(),
                quantity: 6,
                shipping_option: None,
                freight_quote: None,
            },
        ];
        storage
            .save(CART_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let cart = CartStore::load(storage);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get(p.id).unwrap().quantity, 11);
    }

    #[test]
    fn test_attach_priced_quote_selects_shipping() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 1);
        cart.add_to_cart(&p, Some(1), None);

        let quote = FreightQuote {
            id: Some("q-1".to_string()),
            price: Some(Decimal::new(4250, 2)),
            estimated_days: Some(4),
            carrier: Some("Estes".to_string()),
        };
        assert!(cart.attach_quote(p.id, quote));

        let item = cart.get(p.id).unwrap();
        assert_eq!(item.shipping_option.as_ref().unwrap().carrier, "Estes");
        assert_eq!(cart.shipping_total(), Price::usd_cents(4250));
    }

    #[test]
    fn test_attach_unpriced_quote_keeps_selection() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 1);
        cart.add_to_cart(&p, Some(1), Some(shipping(300)));

        let quote = FreightQuote {
            id: None,
            price: None,
            estimated_days: None,
            carrier: Some("Estes".to_string()),
        };
        assert!(cart.attach_quote(p.id, quote));
        assert_eq!(cart.shipping_total(), Price::usd_cents(300));
        assert!(cart.get(p.id).unwrap().freight_quote.is_some());
    }

    #[test]
    fn test_select_shipping_clear() {
        let (mut cart, _) = cart();
        let p = product(1, 1000, 1);
        cart.add_to_cart(&p, Some(1), Some(shipping(300)));
        assert!(cart.select_shipping(p.id, None));
        assert_eq!(cart.shipping_total().amount, Decimal::ZERO);
        assert!(!cart.select_shipping(ProductId::new(42), None));
    }
}
