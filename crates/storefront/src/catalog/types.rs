//! Catalog reference types.
//!
//! These are immutable snapshots. Stores persist whole `Product` values so a
//! hydrated cart can render without consulting the catalog.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tradeyard_core::{Handle, Price, ProductId, StockStatus, VendorId};

// =============================================================================
// Image Types
// =============================================================================

/// Product or category image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

// =============================================================================
// Shipping Types
// =============================================================================

/// Package dimensions used to build freight quote requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in inches.
    pub length_in: f64,
    /// Width in inches.
    pub width_in: f64,
    /// Height in inches.
    pub height_in: f64,
    /// Shipping weight per unit in pounds.
    pub weight_lbs: f64,
}

/// A selectable shipping option for a cart line.
///
/// Either bundled with the product in the catalog or built from a live
/// freight quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    /// Option ID, unique within a product (or the quote ID).
    pub id: String,
    /// Carrier display name.
    pub carrier: String,
    /// Flat price for the whole line.
    pub price: Price,
    /// Estimated transit time.
    pub estimated_days: Option<u32>,
}

// =============================================================================
// Catalog Entities
// =============================================================================

/// A product category (shown as a collection page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub handle: Handle,
    pub name: String,
    pub description: String,
}

/// A supplier selling through the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    /// Ship-from postal code, used as the default freight quote origin.
    pub postal_code: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub handle: Handle,
    pub name: String,
    pub description: String,
    pub images: Vec<Image>,
    /// Unit price.
    pub price: Price,
    /// Original unit price, shown struck through when higher than `price`.
    pub compare_at_price: Option<Price>,
    /// Handle of the owning category.
    pub category: Handle,
    pub vendor_id: VendorId,
    pub stock: StockStatus,
    /// Smallest quantity a buyer may order.
    pub min_order_quantity: u32,
    pub dimensions: Option<Dimensions>,
    /// Static shipping options bundled with the product.
    #[serde(default)]
    pub shipping_options: Vec<ShippingOption>,
}

impl Product {
    /// Minimum order quantity, never less than one.
    #[must_use]
    pub fn minimum_quantity(&self) -> u32 {
        self.min_order_quantity.max(1)
    }

    /// Raise a requested quantity to the minimum order quantity.
    #[must_use]
    pub fn clamp_quantity(&self, quantity: u32) -> u32 {
        quantity.max(self.minimum_quantity())
    }

    /// Whole-percent savings against `compare_at_price`, if discounted.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let compare_at = self.compare_at_price?.amount;
        if compare_at <= self.price.amount || compare_at.is_zero() {
            return None;
        }
        let saved = (compare_at - self.price.amount) / compare_at * Decimal::ONE_HUNDRED;
        saved.floor().to_u32()
    }

    /// Look up one of the bundled shipping options.
    #[must_use]
    pub fn shipping_option(&self, id: &str) -> Option<&ShippingOption> {
        self.shipping_options.iter().find(|o| o.id == id)
    }

    /// Featured image (first image), if any.
    #[must_use]
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }
}
