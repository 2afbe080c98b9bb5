//! Catalog REST API client (admin surface).
//!
//! # Architecture
//!
//! - The catalog API is the source of truth - NO local sync, direct calls
//! - Admin reads are never cached: the table must reflect CRUD immediately
//! - Product create/update ship image files as multipart form data
//!
//! # Endpoints consumed
//!
//! - `GET /products`, `GET /products/{id}` - product reads
//! - `POST /products`, `PUT /products/{id}` - create/update (multipart)
//! - `DELETE /products/{id}` - delete
//! - `GET /orders`, `DELETE /orders/{id}` - order review
//! - `POST /admin/login` - bearer token exchange

use std::sync::Arc;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use baba_boutique_core::{Category, Order, OrderId, Price, Product, ProductId};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, transport).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog API returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin login was rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Text fields of a product create/update form.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: Price,
    pub size: String,
}

/// An image file uploaded through the admin form, passed through to the API.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Admin login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Admin login response body.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Client for the catalog REST API's admin surface.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client for the given API base URL.
    #[must_use]
    pub fn new(api_base_url: &Url) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: api_base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Exchange admin credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidCredentials`] when the API rejects the
    /// credentials, and other variants on transport or parse failures.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, CatalogError> {
        let url = self.endpoint("/admin/login");
        let response = self
            .inner
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CatalogError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status,
                message: body.chars().take(200).collect(),
            });
        }

        let login: LoginResponse = serde_json::from_str(&response.text().await?)?;
        Ok(login.token)
    }

    /// Fetch the full product list, always fresh.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or parse failures.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.get_json("/products").await
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the product does not exist.
    #[instrument(skip(self))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let path = format!("/products/{}", urlencoding::encode(id.as_str()));
        self.get_json(&path).await
    }

    /// Create a product from form fields and uploaded images.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or parse failures.
    #[instrument(skip(self, fields, images), fields(name = %fields.name, images = images.len()))]
    pub async fn create_product(
        &self,
        fields: ProductFields,
        images: Vec<UploadedImage>,
    ) -> Result<Product, CatalogError> {
        let url = self.endpoint("/products");
        let form = build_product_form(fields, images)?;
        let response = self.inner.client.post(&url).multipart(form).send().await?;
        Self::read_product_response(response).await
    }

    /// Update a product from form fields and (optionally) new images.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or parse failures.
    #[instrument(skip(self, fields, images), fields(name = %fields.name, images = images.len()))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        fields: ProductFields,
        images: Vec<UploadedImage>,
    ) -> Result<Product, CatalogError> {
        let url = self.endpoint(&format!("/products/{}", urlencoding::encode(id.as_str())));
        let form = build_product_form(fields, images)?;
        let response = self.inner.client.put(&url).multipart(form).send().await?;
        Self::read_product_response(response).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport or status failures.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        let url = self.endpoint(&format!("/products/{}", urlencoding::encode(id.as_str())));
        let response = self.inner.client.delete(&url).send().await?;
        Self::check_status(response).await
    }

    /// Fetch all orders for review.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or parse failures.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, CatalogError> {
        self.get_json("/orders").await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport or status failures.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<(), CatalogError> {
        let url = self.endpoint(&format!("/orders/{}", urlencoding::encode(id.as_str())));
        let response = self.inner.client.delete(&url).send().await?;
        Self::check_status(response).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.endpoint(path);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_owned()));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(200).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                message: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(200).collect::<String>(),
                "Failed to parse catalog API response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Decode a created/updated product from a mutation response.
    async fn read_product_response(response: reqwest::Response) -> Result<Product, CatalogError> {
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(200).collect::<String>(),
                "Product mutation rejected by catalog API"
            );
            return Err(CatalogError::Status {
                status,
                message: response_text.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }

    /// Consume a response that only signals success or failure.
    async fn check_status(response: reqwest::Response) -> Result<(), CatalogError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(status.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status,
                message: body.chars().take(200).collect(),
            });
        }
        Ok(())
    }
}

/// Assemble the multipart form the API expects for product mutations.
fn build_product_form(
    fields: ProductFields,
    images: Vec<UploadedImage>,
) -> Result<reqwest::multipart::Form, CatalogError> {
    let mut form = reqwest::multipart::Form::new()
        .text("name", fields.name)
        .text("description", fields.description)
        .text("category", fields.category.as_str())
        .text("price", fields.price.to_string())
        .text("size", fields.size);

    for image in images {
        let mut part = reqwest::multipart::Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = &image.content_type {
            part = part.mime_str(content_type)?;
        }
        form = form.part("images", part);
    }

    Ok(form)
}
