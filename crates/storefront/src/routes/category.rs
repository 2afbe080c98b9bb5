//! Category page route handlers.
//!
//! The product list arrives pre-scoped to the category from the API; the
//! search box narrows it further with the shared listing filter, re-rendering
//! the grid fragment on every keystroke via HTMX.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use baba_boutique_core::{Category, listing};

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Flash, take_flash};
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/category.html")]
pub struct CategoryTemplate {
    pub category: String,
    pub query: String,
    pub products: Vec<ProductCardView>,
    pub load_failed: bool,
    pub flash: Option<Flash>,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductCardView>,
    pub load_failed: bool,
}

/// Display a category page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<CategoryTemplate> {
    let category: Category = name
        .parse()
        .map_err(|_| AppError::NotFound(format!("category {name}")))?;
    let flash = take_flash(&session).await;

    let (products, load_failed) = fetch_filtered(&state, category, &query.q).await;

    Ok(CategoryTemplate {
        category: category.to_string(),
        query: query.q,
        products,
        load_failed,
        flash,
    })
}

/// Filtered product grid fragment (HTMX).
#[instrument(skip(state))]
pub async fn results(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<ProductGridTemplate> {
    let category: Category = name
        .parse()
        .map_err(|_| AppError::NotFound(format!("category {name}")))?;

    let (products, load_failed) = fetch_filtered(&state, category, &query.q).await;

    Ok(ProductGridTemplate {
        products,
        load_failed,
    })
}

/// Fetch the category's products and apply the listing filter.
///
/// Failures degrade to an empty grid with a failure banner.
async fn fetch_filtered(
    state: &AppState,
    category: Category,
    raw_query: &str,
) -> (Vec<ProductCardView>, bool) {
    match state.catalog().products_by_category(category).await {
        Ok(products) => {
            let cards = listing::filter_products(&products, raw_query)
                .into_iter()
                .map(ProductCardView::from)
                .collect();
            (cards, false)
        }
        Err(e) => {
            tracing::warn!("Failed to fetch category products: {e}");
            (Vec::new(), true)
        }
    }
}
