//! Orders as exchanged with the catalog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrderId, Product, ProductId};

/// An order as returned by the admin order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque unique identifier.
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    /// Ordered line items. The API populates product snapshots; a product
    /// deleted after the order was placed comes back as `null`.
    #[serde(default)]
    pub products: Vec<OrderItem>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// One line of an order, with the product snapshot if it still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub product: Option<Product>,
    pub quantity: u32,
}

/// A checkout submission, built from the cart snapshot at submit time.
///
/// Transient by design: it exists for one `POST /orders` round trip and is
/// never persisted. On failure the cart is left untouched and the draft is
/// retained in the form for retry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub products: Vec<OrderLineInput>,
}

/// One submitted line: a product reference and a quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineInput {
    pub product: ProductId,
    pub quantity: u32,
}
