//! HTTP route handlers for storefront.
//!
//! All endpoints speak JSON to the single-page frontend. Catalog reads are
//! public; everything under `/cart`, `/orders`, and `/addresses` requires an
//! authenticated session.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB ping)
//!
//! # Products (public)
//! GET  /products               - Full catalog
//! GET  /products/{id}          - One product by catalog ID
//!
//! # Cart
//! GET  /cart                   - Cart with recomputed summary
//! POST /cart/add               - Add item / increment existing line
//! POST /cart/update            - Set line quantity (clamped to >= 1)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # Orders
//! GET  /orders                 - Order history
//! POST /orders                 - Record a completed checkout
//! POST /orders/delete          - Delete an order by index
//!
//! # Addresses
//! GET  /addresses              - Address list
//! POST /addresses              - Add an address
//! POST /addresses/default      - Make an address the default by index
//! POST /addresses/delete       - Delete an address by index
//! ```

pub mod addresses;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::store))
        .route("/delete", post(orders::delete))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::list).post(addresses::add))
        .route("/default", post(addresses::make_default))
        .route("/delete", post(addresses::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/addresses", address_routes())
}
