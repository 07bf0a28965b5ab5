//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /collections            - Category listing
//! GET  /collections/{handle}   - Category detail (paginated products)
//! GET  /categories/{name}      - Redirect a display name to its collection
//! GET  /products/{handle}      - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart with totals
//! POST /cart/add               - Add a product
//! POST /cart/update            - Set a line quantity (<= 0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/shipping          - Select a bundled shipping option
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Wishlist
//! GET  /wishlist
//! POST /wishlist/toggle
//! POST /wishlist/remove
//!
//! # Comparison (max 4)
//! GET  /compare
//! POST /compare/add
//! POST /compare/remove
//! POST /compare/clear
//!
//! # Freight
//! POST /shipping/quote         - Request carrier quotes
//! POST /shipping/select        - Attach a quote to a cart line
//! ```

pub mod cart;
pub mod collections;
pub mod compare;
pub mod products;
pub mod shipping;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/shipping", post(cart::select_shipping))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
}

/// Create the comparison routes router.
pub fn compare_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(compare::show))
        .route("/add", post(compare::add))
        .route("/remove", post(compare::remove))
        .route("/clear", post(compare::clear))
}

/// Create the freight quote routes router.
pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/quote", post(shipping::quote))
        .route("/select", post(shipping::select))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/collections", collection_routes())
        .route("/categories/{name}", get(collections::redirect))
        .route("/products/{handle}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/compare", compare_routes())
        .nest("/shipping", shipping_routes())
}
