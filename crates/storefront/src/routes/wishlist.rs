//! Wishlist route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tradeyard_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;
use crate::stores::WishlistStore;

use super::cart::find_product;
use super::products::ProductView;

/// Wishlist display data.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub products: Vec<ProductView>,
    pub count: usize,
}

/// Toggle or remove request.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: ProductId,
}

/// Toggle response, reporting whether the product is now saved.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub saved: bool,
    pub wishlist: WishlistView,
}

impl From<&WishlistStore> for WishlistView {
    fn from(wishlist: &WishlistStore) -> Self {
        Self {
            products: wishlist.items().iter().map(ProductView::from).collect(),
            count: wishlist.len(),
        }
    }
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    let session = state.session().await;
    Json(WishlistView::from(&session.wishlist))
}

/// Save the product if absent, otherwise remove it.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Json(form): Json<WishlistForm>,
) -> Result<Json<ToggleResponse>> {
    let product = find_product(&state, form.product_id)?;

    let mut session = state.session().await;
    let saved = session.wishlist.toggle(product);

    add_breadcrumb(
        "wishlist",
        if saved { "Saved to wishlist" } else { "Removed from wishlist" },
        Some(&[("product_id", &product.id.to_string())]),
    );
    Ok(Json(ToggleResponse {
        saved,
        wishlist: WishlistView::from(&session.wishlist),
    }))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<WishlistForm>,
) -> Json<WishlistView> {
    let mut session = state.session().await;
    session.wishlist.remove(form.product_id);
    Json(WishlistView::from(&session.wishlist))
}
