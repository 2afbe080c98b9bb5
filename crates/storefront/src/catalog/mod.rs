//! Catalog REST API client (public storefront surface).
//!
//! # Architecture
//!
//! - The catalog API is the source of truth - NO local sync, direct calls
//! - In-memory caching via `moka` for product reads (5 minute TTL)
//! - Orders are single-shot, non-retrying, and never cached
//!
//! # Endpoints consumed
//!
//! - `GET /products` - full product list
//! - `GET /products/category/{name}` - products scoped to one category
//! - `GET /products/{id}` - single product
//! - `POST /orders` - order submission

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use baba_boutique_core::{Category, OrderDraft, Product, ProductId};

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
}

/// Cached API responses.
#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
}

/// Client for the catalog REST API.
///
/// Cheaply cloneable; product reads are cached for 5 minutes, which keeps
/// keystroke-driven filtering off the network.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client for the given API base URL.
    #[must_use]
    pub fn new(api_base_url: &Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: api_base_url.as_str().trim_end_matches('/').to_owned(),
                cache,
            }),
        }
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or parse failures.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let cache_key = "products:all".to_owned();
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            return Ok(products.as_ref().clone());
        }

        let products: Vec<Product> = self.get_json("/products").await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
            .await;
        Ok(products)
    }

    /// Fetch the products of one category.
    ///
    /// The API scopes the list server-side, so category pages never filter
    /// by category themselves.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or parse failures.
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Product>, CatalogError> {
        let cache_key = format!("products:category:{category}");
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            return Ok(products.as_ref().clone());
        }

        let path = format!(
            "/products/category/{}",
            urlencoding::encode(category.as_str())
        );
        let products: Vec<Product> = self.get_json(&path).await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
            .await;
        Ok(products)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the product does not exist,
    /// and other [`CatalogError`] variants on transport or parse failures.
    #[instrument(skip(self))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{id}");
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            return Ok(product.as_ref().clone());
        }

        let path = format!("/products/{}", urlencoding::encode(id.as_str()));
        let product: Product = self.get_json(&path).await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Arc::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Submit an order.
    ///
    /// Single-shot: no retries are performed, and the caller decides what to
    /// do with the cart based on the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport or status failures.
    #[instrument(skip(self, draft), fields(lines = draft.products.len()))]
    pub async fn submit_order(&self, draft: &OrderDraft) -> Result<(), CatalogError> {
        let url = self.endpoint("/orders");
        let response = self.inner.client.post(&url).json(draft).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Order submission rejected by catalog API"
            );
            return Err(CatalogError::Status {
                status,
                message: body.chars().take(200).collect(),
            });
        }

        Ok(())
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
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let base = Url::parse("http://localhost:5000/api/").unwrap();
        let client = CatalogClient::new(&base);
        assert_eq!(
            client.endpoint("/products"),
            "http://localhost:5000/api/products"
        );
    }

    #[test]
    fn test_category_paths_are_percent_encoded() {
        let encoded = urlencoding::encode(Category::SalwarKurti.as_str());
        assert_eq!(encoded, "Salwar%20Kurti");
    }
}
