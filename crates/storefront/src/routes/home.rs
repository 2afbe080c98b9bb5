//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use baba_boutique_core::{Category, Product};

use crate::filters;
use crate::models::{Flash, take_flash};
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Featured section titles, in storefront display order.
const SECTION_TITLES: [(Category, &str); 5] = [
    (Category::Sarees, "Beautiful Sarees Collection"),
    (Category::SalwarKurti, "Trendy Salwar Kurtis"),
    (Category::Nighty, "Comfortable Nightwear"),
    (Category::Pickle, "Homemade Pickles"),
    (Category::Masalas, "Organic Masalas"),
];

/// How many products each home section features.
const SECTION_LIMIT: usize = 4;

/// One featured category strip.
pub struct CategorySection {
    pub name: String,
    pub title: String,
    pub products: Vec<ProductCardView>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub sections: Vec<CategorySection>,
    pub load_failed: bool,
    pub flash: Option<Flash>,
}

/// Display the home page.
///
/// A catalog failure degrades to an empty page with a failure banner; the
/// page itself stays up.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let flash = take_flash(&session).await;

    let (sections, load_failed) = match state.catalog().products().await {
        Ok(products) => (build_sections(&products), false),
        Err(e) => {
            tracing::warn!("Failed to fetch products for home page: {e}");
            (Vec::new(), true)
        }
    };

    HomeTemplate {
        sections,
        load_failed,
        flash,
    }
}

/// Group products into the fixed category sections, skipping empty ones.
fn build_sections(products: &[Product]) -> Vec<CategorySection> {
    SECTION_TITLES
        .iter()
        .filter_map(|(category, title)| {
            let cards: Vec<ProductCardView> = products
                .iter()
                .filter(|p| p.category == *category)
                .take(SECTION_LIMIT)
                .map(ProductCardView::from)
                .collect();

            (!cards.is_empty()).then(|| CategorySection {
                name: category.to_string(),
                title: (*title).to_owned(),
                products: cards,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use baba_boutique_core::{Price, ProductId};

    use super::*;

    fn product(id: &str, category: Category) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::new(500),
            category,
            size: Vec::new(),
            images: vec!["/uploads/x.jpg".to_owned()],
        }
    }

    #[test]
    fn test_sections_skip_empty_categories() {
        let products = vec![product("p1", Category::Pickle)];
        let sections = build_sections(&products);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.first().unwrap().name, "Pickle");
        assert_eq!(sections.first().unwrap().title, "Homemade Pickles");
    }

    #[test]
    fn test_sections_cap_at_four_products() {
        let products: Vec<Product> = (0..6)
            .map(|i| product(&format!("p{i}"), Category::Sarees))
            .collect();
        let sections = build_sections(&products);
        assert_eq!(sections.first().unwrap().products.len(), SECTION_LIMIT);
    }

    #[test]
    fn test_sections_follow_display_order() {
        let products = vec![
            product("m", Category::Masalas),
            product("s", Category::Sarees),
        ];
        let names: Vec<String> = build_sections(&products)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Sarees", "Masalas"]);
    }
}
