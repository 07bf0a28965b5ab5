//! Freight quote route handlers.
//!
//! The session lock is released before the quote request goes out, so other
//! cart operations are not blocked behind a slow carrier. If the client
//! disconnects, the handler future drops its [`QuoteTask`](crate::freight::QuoteTask)
//! and the in-flight request is aborted.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tradeyard_core::{ProductId, QuoteStatus};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::freight::{FreightQuoteRequest, QuoteOption, format_quotes};
use crate::state::AppState;

use super::cart::CartView;

/// Quote request. Without `product_id` the whole cart is quoted.
#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    pub destination_postal_code: String,
    pub origin_postal_code: Option<String>,
    pub product_id: Option<ProductId>,
}

/// Quote attempt outcome.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub status: QuoteStatus,
    pub options: Vec<QuoteOption>,
    pub error: Option<String>,
}

/// Apply a formatted quote to a cart line.
#[derive(Debug, Deserialize)]
pub struct SelectQuoteForm {
    pub product_id: ProductId,
    pub quote: QuoteOption,
}

/// Request freight quotes for the cart or one of its lines.
#[instrument(skip(state, form), fields(destination = %form.destination_postal_code))]
pub async fn quote(State(state): State<AppState>, Json(form): Json<QuoteForm>) -> Result<Response> {
    let destination = form.destination_postal_code.trim();
    if destination.is_empty() {
        return Err(AppError::BadRequest(
            "destination postal code is required".to_string(),
        ));
    }

    let request = {
        let session = state.session().await;
        let cart = &session.cart;
        let first = match form.product_id {
            Some(id) => cart
                .get(id)
                .ok_or_else(|| AppError::NotFound(format!("cart line {id}")))?,
            None => cart
                .items()
                .first()
                .ok_or_else(|| AppError::BadRequest("cart is empty".to_string()))?,
        };

        let origin = form
            .origin_postal_code
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .or_else(|| {
                state
                    .catalog()
                    .vendor(first.product.vendor_id)
                    .map(|v| v.postal_code.clone())
            })
            .ok_or_else(|| AppError::BadRequest("origin postal code is required".to_string()))?;

        if form.product_id.is_some() {
            FreightQuoteRequest::for_item(first, &origin, destination)
        } else {
            FreightQuoteRequest::from_cart(cart, &origin, destination)
        }
    };

    let task = state.freight().spawn_quote(request);
    match task.await {
        Ok(quotes) => {
            add_breadcrumb("shipping", "Freight quotes received", None);
            Ok(Json(QuoteResponse {
                status: QuoteStatus::Success,
                options: format_quotes(&quotes),
                error: None,
            })
            .into_response())
        }
        Err(err) => {
            let err = AppError::Quote(err);
            let event_id = sentry::capture_error(&err);
            tracing::warn!(error = %err, sentry_event_id = %event_id, "Freight quote failed");

            let body = QuoteResponse {
                status: QuoteStatus::Error,
                options: Vec::new(),
                error: Some(err.public_message()),
            };
            Ok((err.status(), Json(body)).into_response())
        }
    }
}

/// Attach a selected quote to a cart line.
#[instrument(skip(state, form), fields(product_id = %form.product_id))]
pub async fn select(
    State(state): State<AppState>,
    Json(form): Json<SelectQuoteForm>,
) -> Result<Json<CartView>> {
    if !form.quote.is_selectable() {
        return Err(AppError::BadRequest(format!(
            "quote '{}' has no price",
            form.quote.id
        )));
    }

    let mut session = state.session().await;
    if !session.cart.attach_quote(form.product_id, form.quote.to_quote()) {
        return Err(AppError::NotFound(format!(
            "cart line {}",
            form.product_id
        )));
    }

    add_breadcrumb(
        "shipping",
        "Freight quote selected",
        Some(&[("carrier", &form.quote.carrier)]),
    );
    Ok(Json(CartView::from(&session.cart)))
}
