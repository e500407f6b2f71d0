//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Health check (in main)
//!
//! # Cart
//! GET  /api/cart                         - Current cart (JSON)
//! POST /api/cart                         - First-touch cart creation
//! POST /api/cart/add                     - Add item
//! POST /api/cart/update                  - Set item quantity
//! POST /api/cart/remove                  - Remove item
//! POST /api/cart/checkout                - Redirect to hosted checkout
//!
//! # Catalog (cached)
//! GET  /api/products/{handle}            - Product detail
//! GET  /api/collections                  - Collection listing
//! GET  /api/collections/{handle}/products - Products of a collection
//!
//! # Webhooks
//! POST /api/revalidate                   - Cache revalidation notification
//! ```

pub mod cart;
pub mod catalog;
pub mod revalidate;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).post(cart::init))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/checkout", post(cart::checkout))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products/{handle}", get(catalog::show_product))
        .route("/collections", get(catalog::list_collections))
        .route(
            "/collections/{handle}/products",
            get(catalog::collection_products),
        )
}

/// Create the full application router.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(cart_routes())
            .merge(catalog_routes())
            .route("/revalidate", post(revalidate::revalidate)),
    )
}
