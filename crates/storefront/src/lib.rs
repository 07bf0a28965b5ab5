//! Tradeyard Storefront library.
//!
//! Catalog lookups, shopper stores (cart, wishlist, comparison), the freight
//! quote client and the JSON API that ties them together. Exposed as a
//! library so the CLI and integration tests can drive the same code paths.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod freight;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
pub mod stores;

use axum::{Router, body::Body, http::Request, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router with middleware applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
