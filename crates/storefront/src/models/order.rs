//! Order and order line models.
//!
//! Orders snapshot the customer's contact details and each line's product
//! name and price at the moment of purchase, so later catalog edits don't
//! rewrite order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use printforge_core::{Email, OrderId, OrderItemId, OrderStatus, Price, ProductId};

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Order total, serialized as a decimal string.
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A line item belonging to an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Product name at time of purchase.
    pub product_name: String,
    /// Unit price at time of purchase.
    pub product_price: Price,
    pub quantity: i32,
}

/// Fields for creating an order. The storage backend assigns the id,
/// timestamp, and initial `Pending` status.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub total: Price,
}

/// Fields for creating an order line. The order id is supplied by
/// `Storage::create_order`, which inserts the order and its lines together.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Price,
    pub quantity: i32,
}

impl NewOrder {
    /// Materialize an order with the given id and creation time.
    #[must_use]
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            total: self.total,
            status: OrderStatus::Pending,
            created_at,
        }
    }
}

impl NewOrderItem {
    /// Materialize an order line with the given ids.
    #[must_use]
    pub fn into_order_item(self, id: OrderItemId, order_id: OrderId) -> OrderItem {
        OrderItem {
            id,
            order_id,
            product_id: self.product_id,
            product_name: self.product_name,
            product_price: self.product_price,
            quantity: self.quantity,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_starts_pending() {
        let new = NewOrder {
            customer_name: "Ada Lovelace".to_string(),
            customer_email: Email::parse("ada@example.com").unwrap(),
            customer_phone: "555-0100".to_string(),
            address: "1 Analytical Way".to_string(),
            city: "London".to_string(),
            state: "LN".to_string(),
            zip_code: "00001".to_string(),
            total: Price::parse("299").unwrap(),
        };

        let order = new.into_order(OrderId::generate(), Utc::now());
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_order_item_json_field_names() {
        let item = NewOrderItem {
            product_id: ProductId::generate(),
            product_name: "Modern Planter Pot".to_string(),
            product_price: Price::parse("449").unwrap(),
            quantity: 1,
        }
        .into_order_item(OrderItemId::generate(), OrderId::generate());

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("orderId").is_some());
        assert!(json.get("productName").is_some());
        assert_eq!(json["productPrice"], "449");
    }
}
