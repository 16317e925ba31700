//! Catalog product models.

use serde::{Deserialize, Serialize};

use printforge_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price, serialized as a decimal string.
    pub price: Price,
    /// Storefront image URL.
    pub image: String,
    pub category: String,
    /// Units in stock. Informational only; no reservation on checkout.
    pub stock: i32,
}

/// Fields for creating a product. The storage backend assigns the id.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    pub stock: i32,
}

/// Partial product update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i32>,
}

impl ProductPatch {
    /// Apply this patch to an existing product, preserving its id.
    #[must_use]
    pub fn apply(self, product: &Product) -> Product {
        Product {
            id: product.id,
            name: self.name.unwrap_or_else(|| product.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| product.description.clone()),
            price: self.price.unwrap_or(product.price),
            image: self.image.unwrap_or_else(|| product.image.clone()),
            category: self.category.unwrap_or_else(|| product.category.clone()),
            stock: self.stock.unwrap_or(product.stock),
        }
    }
}

impl NewProduct {
    /// Materialize a product with the given id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            stock: self.stock,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::generate(),
            name: "Geometric Phone Stand".to_string(),
            description: "Angular desk stand".to_string(),
            price: Price::parse("299").unwrap(),
            image: "/images/phone-stand.png".to_string(),
            category: "Accessories".to_string(),
            stock: 25,
        }
    }

    #[test]
    fn test_patch_apply_changes_only_set_fields() {
        let product = sample();
        let patch = ProductPatch {
            stock: Some(5),
            ..ProductPatch::default()
        };

        let updated = patch.apply(&product);
        assert_eq!(updated.stock, 5);
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, product.name);
        assert_eq!(updated.price, product.price);
    }

    #[test]
    fn test_product_json_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("price").is_some());
        assert_eq!(json["price"], "299");
        assert_eq!(json["stock"], 25);
    }
}
