//! Static catalog lookup.
//!
//! The catalog is mock reference data embedded in the binary
//! (`data/catalog.json`). Lookups are pure: unknown handles return `None`,
//! which the HTTP layer renders as a not-found response.

pub mod types;

pub use types::*;

use serde::Deserialize;
use thiserror::Error;
use tradeyard_core::{Handle, ProductId, VendorId};

const SEED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Errors that can occur while loading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document is not valid JSON for the expected shape.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A handle in the document is not in normalized form.
    #[error("invalid handle {handle:?}: {source}")]
    InvalidHandle {
        handle: String,
        source: tradeyard_core::HandleError,
    },

    /// A product references a category that does not exist.
    #[error("product {product} references unknown category {category}")]
    UnknownCategory { product: ProductId, category: Handle },

    /// A product references a vendor that does not exist.
    #[error("product {product} references unknown vendor {vendor}")]
    UnknownVendor { product: ProductId, vendor: VendorId },

    /// Two products share an ID or handle.
    #[error("duplicate product {0}")]
    DuplicateProduct(String),
}

#[derive(Deserialize)]
struct CatalogDocument {
    categories: Vec<Category>,
    vendors: Vec<Vendor>,
    products: Vec<Product>,
}

/// Read-only catalog of categories, vendors and products.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    vendors: Vec<Vendor>,
    products: Vec<Product>,
}

impl Catalog {
    /// Load the catalog bundled with the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document fails validation.
    pub fn seeded() -> Result<Self, CatalogError> {
        Self::from_json(SEED_CATALOG)
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, contains handles that are
    /// not normalized, duplicate products, or dangling category/vendor
    /// references.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let catalog = Self {
            categories: doc.categories,
            vendors: doc.vendors,
            products: doc.products,
        };
        catalog.validate()?;

        tracing::debug!(
            categories = catalog.categories.len(),
            products = catalog.products.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let handles = self
            .categories
            .iter()
            .map(|c| &c.handle)
            .chain(self.products.iter().map(|p| &p.handle));
        for handle in handles {
            Handle::parse(handle.as_str()).map_err(|source| CatalogError::InvalidHandle {
                handle: handle.to_string(),
                source,
            })?;
        }

        for (i, product) in self.products.iter().enumerate() {
            if self.category(product.category.as_str()).is_none() {
                return Err(CatalogError::UnknownCategory {
                    product: product.id,
                    category: product.category.clone(),
                });
            }
            if self.vendor(product.vendor_id).is_none() {
                return Err(CatalogError::UnknownVendor {
                    product: product.id,
                    vendor: product.vendor_id,
                });
            }
            let duplicate = self
                .products
                .iter()
                .take(i)
                .any(|other| other.id == product.id || other.handle == product.handle);
            if duplicate {
                return Err(CatalogError::DuplicateProduct(product.handle.to_string()));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by its handle.
    #[must_use]
    pub fn category(&self, handle: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.handle.as_str() == handle)
    }

    /// Resolve a human-readable category name (or a handle) to a category.
    ///
    /// The input is normalized first, so `"Safety & PPE"`, `"safety ppe"` and
    /// `"safety-ppe"` all resolve to the same category.
    #[must_use]
    pub fn resolve_category(&self, name: &str) -> Option<&Category> {
        let handle = Handle::normalize(name);
        if handle.is_empty() {
            return None;
        }
        self.category(&handle)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by its handle.
    #[must_use]
    pub fn product(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle.as_str() == handle)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products belonging to a category, in catalog order.
    pub fn products_in_category<'a>(
        &'a self,
        handle: &'a str,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| p.category.as_str() == handle)
    }

    /// Other products from the same category, up to `limit`.
    #[must_use]
    pub fn related_products<'a>(&'a self, product: &'a Product, limit: usize) -> Vec<&'a Product> {
        self.products_in_category(product.category.as_str())
            .filter(|p| p.id != product.id)
            .take(limit)
            .collect()
    }

    // =========================================================================
    // Vendors
    // =========================================================================

    /// Look up a vendor by ID.
    #[must_use]
    pub fn vendor(&self, id: VendorId) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }
}
