//! Product management route handlers.
//!
//! The table fetches the full product list and narrows it with the shared
//! listing filter plus a category pre-filter; create and update forward the
//! multipart form (text fields + image files) straight to the catalog API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use baba_boutique_core::{Category, CategoryFilter, Price, Product, ProductId, listing};

use crate::catalog::{CatalogError, ProductFields, UploadedImage};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminToken;
use crate::models::{Flash, FlashLevel, set_flash, take_flash};
use crate::state::AppState;

/// Category names for selects, in display order.
fn category_options() -> Vec<String> {
    Category::ALL.iter().map(ToString::to_string).collect()
}

/// One row of the product table.
#[derive(Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.to_string(),
            price: format!("₹{}", product.price.grouped()),
            image: product.primary_image().map(ToOwned::to_owned),
        }
    }
}

/// Table filter query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
}

/// Text values of the product form, kept for re-rendering on errors.
#[derive(Debug, Clone, Default)]
pub struct ProductFormValues {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub size: String,
}

/// A parsed product form: text values plus uploaded image files.
#[derive(Debug, Default)]
pub struct ProductFormData {
    pub values: ProductFormValues,
    pub images: Vec<UploadedImage>,
}

impl ProductFormData {
    /// Validate the form into API-ready fields.
    ///
    /// On failure the original values come back with a message so the form
    /// can be re-rendered with the draft retained. Browsers never re-fill
    /// file inputs, so images are not retained.
    fn validate(
        self,
        require_images: bool,
    ) -> std::result::Result<(ProductFields, Vec<UploadedImage>), (ProductFormValues, String)>
    {
        let values = self.values;

        if values.name.trim().is_empty() || values.description.trim().is_empty() {
            return Err((values, "Please fill in all required fields.".to_string()));
        }

        let Ok(category) = values.category.parse::<Category>() else {
            return Err((values, "Select a valid category.".to_string()));
        };

        let Ok(price) = values.price.trim().parse::<u32>() else {
            return Err((values, "Enter a valid price.".to_string()));
        };

        if require_images && self.images.is_empty() {
            return Err((values, "Upload at least one product image.".to_string()));
        }

        let fields = ProductFields {
            name: values.name.trim().to_owned(),
            description: values.description.trim().to_owned(),
            category,
            price: Price::new(price),
            size: values.size.trim().to_owned(),
        };
        Ok((fields, self.images))
    }
}

/// Product table page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct AdminProductsTemplate {
    pub rows: Vec<ProductRowView>,
    pub query: String,
    pub category: String,
    pub categories: Vec<String>,
    pub load_failed: bool,
    pub flash: Option<Flash>,
}

/// Product table fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_table.html")]
pub struct ProductTableTemplate {
    pub rows: Vec<ProductRowView>,
    pub load_failed: bool,
}

/// Add product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct ProductNewTemplate {
    pub form: ProductFormValues,
    pub categories: Vec<String>,
    pub error: Option<String>,
    pub flash: Option<Flash>,
}

/// Edit product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub id: String,
    pub form: ProductFormValues,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub error: Option<String>,
    pub flash: Option<Flash>,
}

/// Display the product table.
#[instrument(skip(_token, state, session))]
pub async fn index(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> AdminProductsTemplate {
    let flash = take_flash(&session).await;
    let (rows, load_failed) = fetch_rows(&state, &query).await;

    AdminProductsTemplate {
        rows,
        query: query.q,
        category: query.category,
        categories: category_options(),
        load_failed,
        flash,
    }
}

/// Filtered product table fragment (HTMX).
#[instrument(skip(_token, state))]
pub async fn table(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ProductTableTemplate {
    let (rows, load_failed) = fetch_rows(&state, &query).await;

    ProductTableTemplate { rows, load_failed }
}

/// Fetch all products and apply the category pre-filter plus the query.
///
/// Failures degrade to an empty table with a failure banner.
async fn fetch_rows(state: &AppState, query: &ListQuery) -> (Vec<ProductRowView>, bool) {
    let category = CategoryFilter::parse(&query.category).unwrap_or_default();

    match state.catalog().products().await {
        Ok(products) => {
            let rows = listing::filter_listing(&products, category, &query.q)
                .into_iter()
                .map(ProductRowView::from)
                .collect();
            (rows, false)
        }
        Err(e) => {
            tracing::warn!("Failed to fetch products: {e}");
            (Vec::new(), true)
        }
    }
}

/// Display the add-product form.
#[instrument(skip(_token, session))]
pub async fn new_page(_token: RequireAdminToken, session: Session) -> ProductNewTemplate {
    let flash = take_flash(&session).await;

    ProductNewTemplate {
        form: ProductFormValues::default(),
        categories: category_options(),
        error: None,
        flash,
    }
}

/// Create a product from the multipart form.
#[instrument(skip(_token, state, session, multipart))]
pub async fn create(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let form_data = read_product_form(multipart).await?;

    let (fields, images) = match form_data.validate(true) {
        Ok(parsed) => parsed,
        Err((values, message)) => {
            return Ok(new_template_with_error(values, message).into_response());
        }
    };

    match state.catalog().create_product(fields, images).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            set_flash(&session, FlashLevel::Success, "Product added successfully").await;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            Ok(new_template_with_error(
                ProductFormValues::default(),
                "Failed to add product".to_string(),
            )
            .into_response())
        }
    }
}

fn new_template_with_error(form: ProductFormValues, error: String) -> ProductNewTemplate {
    ProductNewTemplate {
        form,
        categories: category_options(),
        error: Some(error),
        flash: None,
    }
}

/// Display the edit-product form, prefilled from the API.
#[instrument(skip(_token, state, session))]
pub async fn edit_page(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let product_id = ProductId::new(id);
    let product = match state.catalog().product(&product_id).await {
        Ok(product) => product,
        Err(CatalogError::NotFound(_)) => {
            return Err(AppError::NotFound("product".to_string()));
        }
        Err(e) => {
            tracing::error!("Failed to load product for editing: {e}");
            set_flash(&session, FlashLevel::Error, "Failed to load product").await;
            return Ok(Redirect::to("/products").into_response());
        }
    };

    Ok(ProductEditTemplate {
        id: product.id.to_string(),
        form: ProductFormValues {
            name: product.name,
            description: product.description,
            category: product.category.to_string(),
            price: product.price.to_string(),
            size: product.size.join(", "),
        },
        images: product.images,
        categories: category_options(),
        error: None,
        flash: None,
    }
    .into_response())
}

/// Update a product from the multipart form.
///
/// Newly uploaded images replace the gallery server-side; submitting none
/// keeps the existing images.
#[instrument(skip(_token, state, session, multipart))]
pub async fn update(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let product_id = ProductId::new(id);
    let form_data = read_product_form(multipart).await?;

    let (fields, images) = match form_data.validate(false) {
        Ok(parsed) => parsed,
        Err((values, message)) => {
            return Ok(edit_template_with_error(&state, &product_id, values, message)
                .await
                .into_response());
        }
    };

    match state
        .catalog()
        .update_product(&product_id, fields, images)
        .await
    {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product updated");
            set_flash(&session, FlashLevel::Success, "Product updated successfully").await;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::error!("Failed to update product: {e}");
            Ok(edit_template_with_error(
                &state,
                &product_id,
                ProductFormValues::default(),
                "Failed to update product".to_string(),
            )
            .await
            .into_response())
        }
    }
}

/// Re-render the edit form with an error, refetching images best-effort.
async fn edit_template_with_error(
    state: &AppState,
    product_id: &ProductId,
    values: ProductFormValues,
    error: String,
) -> ProductEditTemplate {
    let images = state
        .catalog()
        .product(product_id)
        .await
        .map(|p| p.images)
        .unwrap_or_default();

    ProductEditTemplate {
        id: product_id.to_string(),
        form: values,
        images,
        categories: category_options(),
        error: Some(error),
        flash: None,
    }
}

/// Delete a product.
#[instrument(skip(_token, state, session))]
pub async fn delete(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let product_id = ProductId::new(id);
    match state.catalog().delete_product(&product_id).await {
        Ok(()) => {
            set_flash(&session, FlashLevel::Success, "Product deleted successfully").await;
        }
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            set_flash(&session, FlashLevel::Error, "Failed to delete product").await;
        }
    }

    Redirect::to("/products")
}

/// Read the product multipart form into text values and image files.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductFormData> {
    let mut data = ProductFormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "name" => data.values.name = read_text(field).await?,
            "description" => data.values.description = read_text(field).await?,
            "category" => data.values.category = read_text(field).await?,
            "price" => data.values.price = read_text(field).await?,
            "size" => data.values.size = read_text(field).await?,
            "images" => {
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field.content_type().map(ToOwned::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid image upload: {e}")))?;
                // A file input with no selection still submits an empty part
                if !bytes.is_empty() {
                    data.images.push(UploadedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(data)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, category: &str, price: &str, image_count: usize) -> ProductFormData {
        ProductFormData {
            values: ProductFormValues {
                name: name.to_owned(),
                description: "A fine product".to_owned(),
                category: category.to_owned(),
                price: price.to_owned(),
                size: "M, L".to_owned(),
            },
            images: (0..image_count)
                .map(|i| UploadedImage {
                    file_name: format!("img-{i}.jpg"),
                    content_type: Some("image/jpeg".to_owned()),
                    bytes: vec![0xff],
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_accepts_a_complete_form() {
        let (fields, images) = form("Silk Saree", "Sarees", "4000", 2).validate(true).unwrap();
        assert_eq!(fields.name, "Silk Saree");
        assert_eq!(fields.category, Category::Sarees);
        assert_eq!(fields.price, Price::new(4000));
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let err = form("  ", "Sarees", "4000", 1).validate(true).unwrap_err();
        assert_eq!(err.1, "Please fill in all required fields.");
    }

    #[test]
    fn test_validate_rejects_unknown_category() {
        let err = form("Saree", "Shoes", "4000", 1).validate(true).unwrap_err();
        assert_eq!(err.1, "Select a valid category.");
    }

    #[test]
    fn test_validate_rejects_non_numeric_price() {
        let err = form("Saree", "Sarees", "about 4000", 1)
            .validate(true)
            .unwrap_err();
        assert_eq!(err.1, "Enter a valid price.");
    }

    #[test]
    fn test_validate_requires_images_only_on_create() {
        assert!(form("Saree", "Sarees", "4000", 0).validate(true).is_err());
        assert!(form("Saree", "Sarees", "4000", 0).validate(false).is_ok());
    }

    #[test]
    fn test_row_view_formats_price() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Red Saree".to_owned(),
            description: String::new(),
            price: Price::new(3000),
            category: Category::Sarees,
            size: Vec::new(),
            images: vec!["/uploads/red.jpg".to_owned()],
        };
        let row = ProductRowView::from(&product);
        assert_eq!(row.price, "₹3,000");
        assert_eq!(row.category, "Sarees");
        assert_eq!(row.image.as_deref(), Some("/uploads/red.jpg"));
    }
}
