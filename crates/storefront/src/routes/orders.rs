//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use printforge_core::{Email, OrderId, Price};

use crate::error::{AppError, Result};
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::state::AppState;

/// Body for placing an order: the order header plus its line items.
#[derive(Debug, Deserialize)]
pub struct CreateOrderPayload {
    pub order: OrderPayload,
    pub items: Vec<OrderItemPayload>,
}

/// Order header fields as submitted by the checkout form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Decimal string.
    pub total: String,
}

/// One line item as submitted by the checkout form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: String,
    pub product_name: String,
    /// Decimal string.
    pub product_price: String,
    pub quantity: i32,
}

/// An order together with its line items.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl CreateOrderPayload {
    fn validate(self) -> std::result::Result<(NewOrder, Vec<NewOrderItem>), Vec<String>> {
        let mut errors = Vec::new();

        for (value, field) in [
            (&self.order.customer_name, "customerName"),
            (&self.order.customer_phone, "customerPhone"),
            (&self.order.address, "address"),
            (&self.order.city, "city"),
            (&self.order.state, "state"),
            (&self.order.zip_code, "zipCode"),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{field} must not be empty"));
            }
        }

        let email = match Email::parse(&self.order.customer_email) {
            Ok(email) => Some(email),
            Err(err) => {
                errors.push(format!("customerEmail: {err}"));
                None
            }
        };

        let total = match Price::parse(&self.order.total) {
            Ok(total) => Some(total),
            Err(err) => {
                errors.push(format!("total: {err}"));
                None
            }
        };

        if self.items.is_empty() {
            errors.push("items must not be empty".to_owned());
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.into_iter().enumerate() {
            match item.validate() {
                Ok(item) => items.push(item),
                Err(item_errors) => {
                    errors.extend(item_errors.into_iter().map(|e| format!("items[{index}]: {e}")));
                }
            }
        }

        match (email, total, errors.is_empty()) {
            (Some(customer_email), Some(total), true) => Ok((
                NewOrder {
                    customer_name: self.order.customer_name,
                    customer_email,
                    customer_phone: self.order.customer_phone,
                    address: self.order.address,
                    city: self.order.city,
                    state: self.order.state,
                    zip_code: self.order.zip_code,
                    total,
                },
                items,
            )),
            _ => Err(errors),
        }
    }
}

impl OrderItemPayload {
    fn validate(self) -> std::result::Result<NewOrderItem, Vec<String>> {
        let mut errors = Vec::new();

        let product_id = match self.product_id.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push("productId is not a valid id".to_owned());
                None
            }
        };

        if self.product_name.trim().is_empty() {
            errors.push("productName must not be empty".to_owned());
        }

        let product_price = match Price::parse(&self.product_price) {
            Ok(price) => Some(price),
            Err(err) => {
                errors.push(format!("productPrice: {err}"));
                None
            }
        };

        if self.quantity < 1 {
            errors.push("quantity must be at least 1".to_owned());
        }

        match (product_id, product_price, errors.is_empty()) {
            (Some(product_id), Some(product_price), true) => Ok(NewOrderItem {
                product_id,
                product_name: self.product_name,
                product_price,
                quantity: self.quantity,
            }),
            _ => Err(errors),
        }
    }
}

/// `POST /api/orders` — place an order with its line items.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let (new_order, new_items) = payload
        .validate()
        .map_err(|errors| AppError::validation("Invalid order data", errors))?;

    let (order, items) = state.storage().create_order(new_order, new_items).await?;
    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");

    Ok((StatusCode::CREATED, Json(OrderResponse { order, items })))
}

/// `GET /api/orders/{id}` — an order with its line items.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>> {
    let id: OrderId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid order id".to_owned()))?;

    let order = state
        .storage()
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_owned()))?;
    let items = state.storage().get_order_items(id).await?;

    Ok(Json(OrderResponse { order, items }))
}
