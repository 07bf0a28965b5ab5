//! Cart route handlers.
//!
//! Every mutating handler returns the full cart so clients can re-render
//! totals without a second request.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tradeyard_core::{Handle, ProductId};

use crate::catalog::{Product, ShippingOption};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::stores::{CartItem, CartStore};

use super::products::ShippingOptionView;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub handle: Handle,
    pub name: String,
    pub quantity: u32,
    pub min_order_quantity: u32,
    pub price: String,
    pub line_price: String,
    pub shipping: Option<ShippingOptionView>,
    pub line_total: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping_total: String,
    pub total: String,
    pub total_amount: Decimal,
    pub item_count: u32,
    pub line_count: usize,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id,
            handle: item.product.handle.clone(),
            name: item.product.name.clone(),
            quantity: item.quantity,
            min_order_quantity: item.product.minimum_quantity(),
            price: item.product.price.display(),
            line_price: item.line_price().display(),
            shipping: item.shipping_option.as_ref().map(ShippingOptionView::from),
            line_total: item.line_total().display(),
        }
    }
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        let total = cart.total();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            shipping_total: cart.shipping_total().display(),
            total: total.display(),
            total_amount: total.amount,
            item_count: cart.item_count(),
            line_count: cart.line_count(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub shipping_option_id: Option<String>,
}

/// Update quantity request. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Select or clear a bundled shipping option.
#[derive(Debug, Deserialize)]
pub struct SelectShippingForm {
    pub product_id: ProductId,
    pub shipping_option_id: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

pub(super) fn find_product(state: &AppState, product_id: ProductId) -> Result<&Product> {
    state
        .catalog()
        .product_by_id(product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}

fn bundled_option(product: &Product, id: Option<&str>) -> Result<Option<ShippingOption>> {
    id.map(|id| {
        product.shipping_option(id).cloned().ok_or_else(|| {
            AppError::BadRequest(format!(
                "shipping option '{id}' is not offered for {}",
                product.handle
            ))
        })
    })
    .transpose()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let session = state.session().await;
    Json(CartView::from(&session.cart))
}

/// Add a product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = find_product(&state, form.product_id)?;
    if !product.stock.is_available() {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.handle
        )));
    }
    let shipping = bundled_option(product, form.shipping_option_id.as_deref())?;

    let mut session = state.session().await;
    session.cart.add_to_cart(product, form.quantity, shipping);

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &product.id.to_string())]),
    );
    Ok(Json(CartView::from(&session.cart)))
}

/// Update a line's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let mut session = state.session().await;
    if !session.cart.update_quantity(form.product_id, form.quantity) {
        return Err(AppError::NotFound(format!(
            "cart line {}",
            form.product_id
        )));
    }
    Ok(Json(CartView::from(&session.cart)))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<RemoveFromCartForm>,
) -> Json<CartView> {
    let mut session = state.session().await;
    if session.cart.remove_from_cart(form.product_id) {
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", &form.product_id.to_string())]),
        );
    }
    Json(CartView::from(&session.cart))
}

/// Select one of a line's bundled shipping options, or clear the selection.
#[instrument(skip(state))]
pub async fn select_shipping(
    State(state): State<AppState>,
    Json(form): Json<SelectShippingForm>,
) -> Result<Json<CartView>> {
    let product = find_product(&state, form.product_id)?;
    let option = bundled_option(product, form.shipping_option_id.as_deref())?;

    let mut session = state.session().await;
    if !session.cart.select_shipping(form.product_id, option) {
        return Err(AppError::NotFound(format!(
            "cart line {}",
            form.product_id
        )));
    }
    Ok(Json(CartView::from(&session.cart)))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut session = state.session().await;
    session.cart.clear_cart();
    Json(CartView::from(&session.cart))
}

/// Cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    let session = state.session().await;
    Json(CartCount {
        count: session.cart.item_count(),
    })
}
