//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use tradeyard_core::{Handle, ProductId};

use crate::catalog::{Product, ShippingOption};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Number of related products shown on a detail page.
const RELATED_PRODUCTS: usize = 4;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub handle: Handle,
    pub name: String,
    pub description: String,
    pub price: String,
    pub price_amount: Decimal,
    pub compare_at_price: Option<String>,
    pub discount_percent: Option<u32>,
    pub category: Handle,
    pub in_stock: bool,
    pub min_order_quantity: u32,
    pub featured_image: Option<ImageView>,
    pub images: Vec<ImageView>,
    pub shipping_options: Vec<ShippingOptionView>,
}

/// Image display data.
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Shipping option display data.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingOptionView {
    pub id: String,
    pub carrier: String,
    pub price: String,
    pub estimated_days: Option<u32>,
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: ProductView,
    pub vendor: Option<String>,
    pub related_products: Vec<ProductView>,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&ShippingOption> for ShippingOptionView {
    fn from(option: &ShippingOption) -> Self {
        Self {
            id: option.id.clone(),
            carrier: option.carrier.clone(),
            price: option.price.display(),
            estimated_days: option.estimated_days,
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let images: Vec<ImageView> = product
            .images
            .iter()
            .map(|img| ImageView {
                url: img.url.clone(),
                alt: img.alt_text.clone().unwrap_or_else(|| product.name.clone()),
            })
            .collect();

        Self {
            id: product.id,
            handle: product.handle.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            price_amount: product.price.amount,
            compare_at_price: product
                .discount_percent()
                .and(product.compare_at_price)
                .map(|p| p.display()),
            discount_percent: product.discount_percent(),
            category: product.category.clone(),
            in_stock: product.stock.is_available(),
            min_order_quantity: product.minimum_quantity(),
            featured_image: images.first().cloned(),
            images,
            shipping_options: product
                .shipping_options
                .iter()
                .map(ShippingOptionView::from)
                .collect(),
        }
    }
}

/// Display product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<ProductDetail>> {
    let catalog = state.catalog();
    let product = catalog
        .product(&handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;

    Ok(Json(ProductDetail {
        product: ProductView::from(product),
        vendor: catalog.vendor(product.vendor_id).map(|v| v.name.clone()),
        related_products: catalog
            .related_products(product, RELATED_PRODUCTS)
            .into_iter()
            .map(ProductView::from)
            .collect(),
    }))
}
