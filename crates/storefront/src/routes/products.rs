//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use baba_boutique_core::{OrderDraft, OrderLineInput, Product, ProductId};

use crate::catalog::CatalogError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Flash, FlashLevel, set_flash, take_flash};
use crate::state::AppState;

/// Product card data for listing grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    /// Joined size line, absent when the category hides sizes.
    pub sizes: Option<String>,
    pub image: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: format!("₹{}", product.price.grouped()),
            sizes: product.shows_sizes().then(|| product.size.join(", ")),
            image: product.primary_image().map(ToOwned::to_owned),
        }
    }
}

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub sizes: Option<String>,
    pub images: Vec<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("₹{}", product.price.grouped()),
            sizes: product.shows_sizes().then(|| product.size.join(", ")),
            images: product.images.clone(),
        }
    }
}

/// Buy Now form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub order_form: OrderForm,
    pub order_error: Option<String>,
    pub flash: Option<Flash>,
}

/// Fallback page when the catalog API cannot be reached.
#[derive(Template, WebTemplate)]
#[template(path = "pages/load_failed.html")]
pub struct LoadFailedTemplate {
    pub flash: Option<Flash>,
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let flash = take_flash(&session).await;
    let product = match state.catalog().product(&ProductId::new(id)).await {
        Ok(product) => product,
        Err(CatalogError::NotFound(_)) => {
            return Err(AppError::NotFound("product".to_string()));
        }
        Err(e) => {
            tracing::warn!("Failed to fetch product: {e}");
            return Ok(LoadFailedTemplate { flash }.into_response());
        }
    };

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        order_form: OrderForm::default(),
        order_error: None,
        flash,
    }
    .into_response())
}

/// Place a single-product order from the Buy Now form.
///
/// The cart is not involved: one line, quantity one, straight to the API.
#[instrument(skip(state, session, form))]
pub async fn order(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<OrderForm>,
) -> Result<Response> {
    let product_id = ProductId::new(id);

    // Validate locally before any remote call.
    let missing_fields = [&form.name, &form.phone, &form.address]
        .iter()
        .any(|v| v.trim().is_empty());
    if missing_fields {
        return render_with_error(
            &state,
            &product_id,
            form,
            "Please fill in your name, phone, and address.",
        )
        .await;
    }

    let draft = OrderDraft {
        customer_name: form.name.trim().to_owned(),
        phone: form.phone.trim().to_owned(),
        address: form.address.trim().to_owned(),
        products: vec![OrderLineInput {
            product: product_id.clone(),
            quantity: 1,
        }],
    };

    match state.catalog().submit_order(&draft).await {
        Ok(()) => {
            set_flash(&session, FlashLevel::Success, "Order placed successfully!").await;
            Ok(Redirect::to(&format!("/product/{product_id}")).into_response())
        }
        Err(e) => {
            tracing::error!("Failed to place order: {e}");
            render_with_error(&state, &product_id, form, "Failed to place order").await
        }
    }
}

/// Re-render the detail page with the draft retained and an inline error.
async fn render_with_error(
    state: &AppState,
    product_id: &ProductId,
    form: OrderForm,
    message: &str,
) -> Result<Response> {
    let product = state
        .catalog()
        .product(product_id)
        .await
        .map_err(AppError::from)?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        order_form: form,
        order_error: Some(message.to_string()),
        flash: None,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use baba_boutique_core::{Category, Price};

    use super::*;

    fn product(category: Category, sizes: &[&str]) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Cotton Nighty".to_owned(),
            description: "Soft".to_owned(),
            price: Price::new(1450),
            category,
            size: sizes.iter().map(|s| (*s).to_owned()).collect(),
            images: vec!["/uploads/a.jpg".to_owned(), "/uploads/b.jpg".to_owned()],
        }
    }

    #[test]
    fn test_card_view_formats_price_with_symbol() {
        let view = ProductCardView::from(&product(Category::Nighty, &["M", "L"]));
        assert_eq!(view.price, "₹1,450");
        assert_eq!(view.sizes.as_deref(), Some("M, L"));
        assert_eq!(view.image.as_deref(), Some("/uploads/a.jpg"));
    }

    #[test]
    fn test_card_view_hides_sizes_for_sarees() {
        let view = ProductCardView::from(&product(Category::Sarees, &["Free"]));
        assert!(view.sizes.is_none());
    }

    #[test]
    fn test_detail_view_keeps_all_images_in_order() {
        let view = ProductView::from(&product(Category::Nighty, &[]));
        assert_eq!(view.images, vec!["/uploads/a.jpg", "/uploads/b.jpg"]);
    }
}
