//! Collection (category) route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tradeyard_core::Handle;

use crate::catalog::Category;
use crate::error::{AppError, Result};
use crate::state::AppState;

pub use super::products::ProductView;

/// Products per page for collection view.
const PRODUCTS_PER_PAGE: usize = 12;

/// Collection display data.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionView {
    pub handle: Handle,
    pub title: String,
    pub description: Option<String>,
    pub product_count: usize,
}

/// Collection detail response.
#[derive(Debug, Serialize)]
pub struct CollectionDetail {
    pub collection: CollectionView,
    pub products: Vec<ProductView>,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_more_pages: bool,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<usize>,
}

impl CollectionView {
    fn new(category: &Category, product_count: usize) -> Self {
        Self {
            handle: category.handle.clone(),
            title: category.name.clone(),
            description: if category.description.is_empty() {
                None
            } else {
                Some(category.description.clone())
            },
            product_count,
        }
    }
}

/// List all collections.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<CollectionView>> {
    let catalog = state.catalog();
    Json(
        catalog
            .categories()
            .iter()
            .map(|c| {
                let count = catalog.products_in_category(c.handle.as_str()).count();
                CollectionView::new(c, count)
            })
            .collect(),
    )
}

/// Display a collection with one page of its products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<CollectionDetail>> {
    let catalog = state.catalog();
    let category = catalog
        .category(&handle)
        .ok_or_else(|| AppError::NotFound(format!("collection {handle}")))?;

    let all: Vec<ProductView> = catalog
        .products_in_category(category.handle.as_str())
        .map(ProductView::from)
        .collect();

    let total_pages = all.len().div_ceil(PRODUCTS_PER_PAGE).max(1);
    let current_page = query.page.unwrap_or(1).clamp(1, total_pages);
    let products: Vec<ProductView> = all
        .iter()
        .skip((current_page - 1) * PRODUCTS_PER_PAGE)
        .take(PRODUCTS_PER_PAGE)
        .cloned()
        .collect();

    Ok(Json(CollectionDetail {
        collection: CollectionView::new(category, all.len()),
        products,
        current_page,
        total_pages,
        has_more_pages: current_page < total_pages,
    }))
}

/// Redirect a human-readable category name to its collection handle.
///
/// `/categories/Safety%20%26%20PPE` redirects to `/collections/safety-ppe`.
#[instrument(skip(state))]
pub async fn redirect(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Redirect> {
    let category = state
        .catalog()
        .resolve_category(&name)
        .ok_or_else(|| AppError::NotFound(format!("category {name}")))?;

    Ok(Redirect::permanent(&format!(
        "/collections/{}",
        category.handle
    )))
}
