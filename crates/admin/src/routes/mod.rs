//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Redirect to product table
//! GET  /health                  - Health check
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Exchange credentials for a token
//! POST /auth/logout             - Drop the token
//!
//! # Products (token required)
//! GET  /products                - Product table (filter via ?q= and ?category=)
//! GET  /products/table          - Filtered table fragment (HTMX)
//! GET  /products/new            - Add product form
//! POST /products                - Create product (multipart)
//! GET  /products/{id}/edit      - Edit product form
//! POST /products/{id}           - Update product (multipart)
//! POST /products/{id}/delete    - Delete product
//!
//! # Orders (token required)
//! GET  /orders                  - Order review table
//! POST /orders/{id}/delete      - Delete order
//! ```

pub mod auth;
pub mod orders;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/table", get(products::table))
        .route("/new", get(products::new_page))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_page))
        .route("/{id}/delete", post(products::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/delete", post(orders::delete))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        // The console opens on the product table
        .route("/", get(|| async { Redirect::to("/products") }))
        // Auth routes
        .nest("/auth", auth_routes())
        // Product routes
        .nest("/products", product_routes())
        // Order routes
        .nest("/orders", order_routes())
}
