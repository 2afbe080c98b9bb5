//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//!
//! # Categories
//! GET  /category/{name}         - Category page (search via ?q=)
//! GET  /category/{name}/results - Filtered product grid fragment (HTMX)
//!
//! # Products
//! GET  /product/{id}            - Product detail
//! POST /product/{id}/order      - Buy Now single-product order
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add to cart (returns badge, triggers cart-updated)
//! POST /cart/update             - Update quantity (returns cart_items fragment)
//! POST /cart/remove             - Remove item (returns cart_items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /cart/checkout           - Shipping form + order summary
//! POST /cart/checkout           - Submit order; clears cart on success
//! ```

pub mod cart;
pub mod category;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/{name}", get(category::show))
        .route("/{name}/results", get(category::results))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/order", post(products::order))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/checkout", get(cart::checkout_page).post(cart::checkout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Category routes
        .nest("/category", category_routes())
        // Product routes
        .nest("/product", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
}
