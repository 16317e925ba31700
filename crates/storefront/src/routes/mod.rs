//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Storage readiness check
//!
//! # Products
//! GET    /api/products                      - Catalog listing (?category=X filters)
//! GET    /api/products/{id}                 - Product detail
//! POST   /api/products                      - Create product
//! PATCH  /api/products/{id}                 - Partial update
//! DELETE /api/products/{id}                 - Delete product
//!
//! # Cart
//! GET    /api/cart/{cartId}                 - Current cart lines
//! POST   /api/cart/{cartId}                 - Add line {productId, quantity}
//! PATCH  /api/cart/{cartId}/{productId}     - Set line quantity (0 removes)
//! DELETE /api/cart/{cartId}/{productId}     - Remove line
//! DELETE /api/cart/{cartId}                 - Clear cart
//!
//! # Orders
//! POST /api/orders                          - Place order {order, items}
//! GET  /api/orders/{id}                     - Order with its line items
//!
//! # Custom print requests
//! POST /api/custom-print-requests           - Submit quote request
//! POST /api/custom-print-requests/upload    - Upload design file (multipart)
//! GET  /api/custom-print-requests           - List quote requests
//! GET  /api/custom-print-requests/{id}      - Quote request detail
//! ```
//!
//! Uploaded design files are served statically under `/uploads`, mounted in
//! `main` alongside these routes.

pub mod cart;
pub mod health;
pub mod orders;
pub mod print_requests;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{cart_id}",
            get(cart::show).post(cart::add).delete(cart::clear),
        )
        .route(
            "/{cart_id}/{product_id}",
            axum::routing::patch(cart::update).delete(cart::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create the custom print request routes router.
pub fn print_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(print_requests::index).post(print_requests::create),
        )
        .route("/upload", post(print_requests::upload))
        .route("/{id}", get(print_requests::show))
}

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/custom-print-requests", print_request_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .nest("/api", api_routes())
}
