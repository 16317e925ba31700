//! Cart line models.

use serde::{Deserialize, Serialize};

use printforge_core::{CartToken, ProductId};

/// A single cart line.
///
/// Lines are keyed by (`cart_id`, `product_id`); the same product never
/// appears twice in one cart. Quantity is always >= 1 — a line whose quantity
/// drops to zero is removed instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub cart_id: CartToken,
    pub product_id: ProductId,
    pub quantity: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_json_field_names() {
        let item = CartItem {
            cart_id: CartToken::from("cart-1"),
            product_id: ProductId::generate(),
            quantity: 2,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["cartId"], "cart-1");
        assert!(json.get("productId").is_some());
        assert_eq!(json["quantity"], 2);
    }
}
