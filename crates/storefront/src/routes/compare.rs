//! Product comparison route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tradeyard_core::ProductId;

use crate::error::Result;
use crate::state::AppState;
use crate::stores::{COMPARISON_LIMIT, ComparisonStore};

use super::cart::find_product;
use super::products::ProductView;

/// Comparison display data.
#[derive(Debug, Serialize)]
pub struct ComparisonView {
    pub products: Vec<ProductView>,
    pub count: usize,
    pub limit: usize,
    pub is_full: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompareForm {
    pub product_id: ProductId,
}

/// Add response. `added` is false when the product was already present
/// or the comparison was full.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub added: bool,
    pub comparison: ComparisonView,
}

impl From<&ComparisonStore> for ComparisonView {
    fn from(comparison: &ComparisonStore) -> Self {
        Self {
            products: comparison.items().iter().map(ProductView::from).collect(),
            count: comparison.len(),
            limit: COMPARISON_LIMIT,
            is_full: comparison.is_full(),
        }
    }
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<ComparisonView> {
    let session = state.session().await;
    Json(ComparisonView::from(&session.comparison))
}

#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<CompareForm>,
) -> Result<Json<AddResponse>> {
    let product = find_product(&state, form.product_id)?;

    let mut session = state.session().await;
    let added = session.comparison.add(product);
    Ok(Json(AddResponse {
        added,
        comparison: ComparisonView::from(&session.comparison),
    }))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<CompareForm>,
) -> Json<ComparisonView> {
    let mut session = state.session().await;
    session.comparison.remove(form.product_id);
    Json(ComparisonView::from(&session.comparison))
}

#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<ComparisonView> {
    let mut session = state.session().await;
    session.comparison.clear();
    Json(ComparisonView::from(&session.comparison))
}
