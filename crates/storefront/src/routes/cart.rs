//! Cart route handlers.
//!
//! Cart mutations use HTMX for dynamic updates without full page reloads.
//! The ledger itself lives in the profile-scoped session under the `cart`
//! key; every handler loads a storage snapshot, runs the synchronous cart
//! operations, and writes the whole ledger back. Mutations answer with an
//! `HX-Trigger: cart-updated` event so the navbar badge refreshes, which is
//! the best-effort freshness channel between views (and tabs).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use baba_boutique_core::cart::{CartLine, CartStore};
use baba_boutique_core::{OrderDraft, OrderLineInput, ProductId, price::group_digits};

use crate::filters;
use crate::models::{Flash, FlashLevel, set_flash, take_flash};
use crate::state::AppState;
use crate::storage::SessionStorage;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: format_rupees(0),
            item_count: 0,
        }
    }

    /// Derive the view from a fresh ledger read.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let subtotal: u64 = lines.iter().map(CartLine::line_total).sum();
        let item_count = lines
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity));

        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            subtotal: format_rupees(subtotal),
            item_count,
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.to_string(),
            name: line.product.name.clone(),
            quantity: line.quantity,
            price: format!("₹{}", line.product.price.grouped()),
            line_price: format_rupees(line.line_total()),
            image: line.product.primary_image().map(ToOwned::to_owned),
        }
    }
}

/// Format a rupee amount with the currency symbol.
fn format_rupees(amount: u64) -> String {
    format!("₹{}", group_digits(amount))
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart store over a snapshot of the session.
async fn load_store(session: &Session) -> CartStore<SessionStorage> {
    CartStore::new(SessionStorage::load(session).await)
}

/// Write the store's backing snapshot back to the session.
async fn persist_store(store: CartStore<SessionStorage>, session: &Session) {
    if let Err(e) = store.into_storage().persist(session).await {
        tracing::error!("Failed to persist cart to session: {e}");
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
}

impl CheckoutForm {
    /// All shipping fields are required before any remote call is made.
    fn missing_fields(&self) -> bool {
        [&self.customer_name, &self.phone, &self.address]
            .iter()
            .any(|v| v.trim().is_empty())
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub flash: Option<Flash>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/checkout.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub form: CheckoutForm,
    pub error: Option<String>,
    pub flash: Option<Flash>,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let flash = take_flash(&session).await;
    let store = load_store(&session).await;
    let cart = CartView::from_lines(&store.read());

    CartShowTemplate { cart, flash }
}

/// Add item to cart (HTMX).
///
/// Fetches the product snapshot by id and appends or increments its line.
/// Returns the badge fragment with an HTMX trigger so other fragments can
/// refresh themselves.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let product = match state.catalog().product(&product_id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product for add-to-cart: {e}");
            return (
                StatusCode::BAD_GATEWAY,
                Html("<span class=\"inline-error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    let mut store = load_store(&session).await;
    store.add(product, form.quantity.unwrap_or(1));
    let count = store.item_count();
    persist_store(store, &session).await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Update cart item quantity (HTMX).
///
/// A non-positive quantity is a no-op in the store, so the re-rendered
/// fragment simply shows the unchanged line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut store = load_store(&session).await;
    store.update_quantity(&ProductId::new(form.product_id), form.quantity);
    let cart = CartView::from_lines(&store.read());
    persist_store(store, &session).await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut store = load_store(&session).await;
    store.remove(&ProductId::new(form.product_id));
    let cart = CartView::from_lines(&store.read());
    persist_store(store, &session).await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
///
/// The navbar polls this on page load and on every `cart-updated` trigger,
/// which keeps the badge in step with mutations made by any view.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let store = load_store(&session).await;

    CartCountTemplate {
        count: store.item_count(),
    }
}

/// Display the checkout form.
#[instrument(skip(session))]
pub async fn checkout_page(session: Session) -> Response {
    let flash = take_flash(&session).await;
    let store = load_store(&session).await;
    let cart = CartView::from_lines(&store.read());

    if cart.items.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate {
        cart,
        form: CheckoutForm::default(),
        error: None,
        flash,
    }
    .into_response()
}

/// Submit the checkout form.
///
/// The draft is built from the cart snapshot at submission time. Either the
/// submission succeeds and the cart is cleared, or it fails and the cart is
/// left untouched with the draft retained in the form for retry.
#[instrument(skip(state, session, form))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let mut store = load_store(&session).await;
    let lines = store.read();

    if lines.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    // Validate locally before any remote call.
    if form.missing_fields() {
        return CheckoutTemplate {
            cart: CartView::from_lines(&lines),
            form,
            error: Some("Please fill in your name, phone, and address.".to_string()),
            flash: None,
        }
        .into_response();
    }

    let draft = OrderDraft {
        customer_name: form.customer_name.trim().to_owned(),
        phone: form.phone.trim().to_owned(),
        address: form.address.trim().to_owned(),
        products: lines
            .iter()
            .map(|line| OrderLineInput {
                product: line.product.id.clone(),
                quantity: line.quantity,
            })
            .collect(),
    };

    match state.catalog().submit_order(&draft).await {
        Ok(()) => {
            store.clear();
            persist_store(store, &session).await;
            set_flash(&session, FlashLevel::Success, "Order placed successfully!").await;
            // The badge re-polls on page load, so no HTMX trigger is needed here
            Redirect::to("/cart").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to place order: {e}");
            CheckoutTemplate {
                cart: CartView::from_lines(&lines),
                form,
                error: Some("Failed to place order".to_string()),
                flash: None,
            }
            .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use baba_boutique_core::{Category, Price, Product};

    use super::*;

    fn line(id: &str, price: u32, quantity: u32) -> CartLine {
        CartLine {
            product: Product {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                description: String::new(),
                price: Price::new(price),
                category: Category::Sarees,
                size: Vec::new(),
                images: vec![format!("/uploads/{id}.jpg")],
            },
            quantity,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let view = CartView::from_lines(&[line("p1", 3000, 2), line("p2", 1200, 1)]);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "₹7,200");
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items.first().unwrap().line_price, "₹6,000");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, "₹0");
        assert!(view.items.is_empty());
    }

    #[test]
    fn test_checkout_form_requires_all_fields() {
        let mut form = CheckoutForm {
            customer_name: "Asha".to_owned(),
            phone: "9876543210".to_owned(),
            address: "12 MG Road".to_owned(),
        };
        assert!(!form.missing_fields());

        form.address = "   ".to_owned();
        assert!(form.missing_fields());
    }
}
