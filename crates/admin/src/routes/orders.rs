//! Order review route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use baba_boutique_core::{Order, OrderId};

use crate::filters;
use crate::middleware::RequireAdminToken;
use crate::models::{Flash, FlashLevel, set_flash, take_flash};
use crate::state::AppState;

/// One line of an order, with a placeholder for products deleted since.
#[derive(Clone)]
pub struct OrderItemView {
    pub name: String,
    pub quantity: u32,
    pub image: Option<String>,
}

/// One order in the review table.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<OrderItemView>,
    pub created_at: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.customer_name.clone(),
            phone: order.phone.clone(),
            address: order.address.clone(),
            items: order
                .products
                .iter()
                .map(|item| match &item.product {
                    Some(product) => OrderItemView {
                        name: product.name.clone(),
                        quantity: item.quantity,
                        image: product.primary_image().map(ToOwned::to_owned),
                    },
                    None => OrderItemView {
                        name: "Deleted Product".to_owned(),
                        quantity: item.quantity,
                        image: None,
                    },
                })
                .collect(),
            created_at: order.created_at.format("%d %b %Y, %H:%M").to_string(),
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct AdminOrdersTemplate {
    pub orders: Vec<OrderView>,
    pub load_failed: bool,
    pub flash: Option<Flash>,
}

/// Display the order review table.
#[instrument(skip(_token, state, session))]
pub async fn index(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    session: Session,
) -> AdminOrdersTemplate {
    let flash = take_flash(&session).await;

    let (orders, load_failed) = match state.catalog().orders().await {
        Ok(orders) => (orders.iter().map(OrderView::from).collect(), false),
        Err(e) => {
            tracing::warn!("Failed to fetch orders: {e}");
            (Vec::new(), true)
        }
    };

    AdminOrdersTemplate {
        orders,
        load_failed,
        flash,
    }
}

/// Delete an order.
#[instrument(skip(_token, state, session))]
pub async fn delete(
    _token: RequireAdminToken,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let order_id = OrderId::new(id);
    match state.catalog().delete_order(&order_id).await {
        Ok(()) => {
            set_flash(&session, FlashLevel::Success, "Order deleted successfully").await;
        }
        Err(e) => {
            tracing::error!("Failed to delete order: {e}");
            set_flash(&session, FlashLevel::Error, "Failed to delete order").await;
        }
    }

    Redirect::to("/orders")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use baba_boutique_core::{Category, OrderItem, Price, Product, ProductId};
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_order_view_uses_placeholder_for_deleted_products() {
        let order = Order {
            id: OrderId::new("o1"),
            customer_name: "Asha".to_owned(),
            phone: "9876543210".to_owned(),
            address: "12 MG Road".to_owned(),
            products: vec![
                OrderItem {
                    product: Some(Product {
                        id: ProductId::new("p1"),
                        name: "Red Saree".to_owned(),
                        description: String::new(),
                        price: Price::new(3000),
                        category: Category::Sarees,
                        size: Vec::new(),
                        images: vec!["/uploads/red.jpg".to_owned()],
                    }),
                    quantity: 2,
                },
                OrderItem {
                    product: None,
                    quantity: 1,
                },
            ],
            created_at: chrono::Utc.with_ymd_and_hms(2025, 4, 2, 10, 30, 0).unwrap(),
        };

        let view = OrderView::from(&order);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items.first().unwrap().name, "Red Saree");
        assert_eq!(view.items.get(1).unwrap().name, "Deleted Product");
        assert!(view.items.get(1).unwrap().image.is_none());
        assert_eq!(view.created_at, "02 Apr 2025, 10:30");
    }
}
