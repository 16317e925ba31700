//! In-memory storage backend.
//!
//! Every entity lives in a `HashMap` behind one `RwLock`; filtered queries
//! are linear scans. This backend is the default when no database URL is
//! configured and is what the integration tests run against.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use printforge_core::{CartToken, OrderId, OrderItemId, PrintRequestId, ProductId, UserId};

use super::{MAX_LINE_QUANTITY, Storage, StorageError, starter_catalog};
use crate::models::{
    CartItem, CustomPrintRequest, NewOrder, NewOrderItem, NewPrintRequest, NewProduct, NewUser,
    Order, OrderItem, Product, ProductPatch, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    carts: HashMap<CartToken, Vec<CartItem>>,
    orders: HashMap<OrderId, Order>,
    order_items: HashMap<OrderItemId, OrderItem>,
    print_requests: HashMap<PrintRequestId, CustomPrintRequest>,
}

/// In-memory storage backend.
///
/// Handlers run concurrently, so every operation takes the table lock.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the starter catalog.
    #[must_use]
    pub fn seeded() -> Self {
        let mut tables = Tables::default();
        for new in starter_catalog() {
            let product = new.into_product(ProductId::generate());
            tables.products.insert(product.id, product);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl Storage for MemStorage {
    // =========================================================================
    // Users
    // =========================================================================

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(StorageError::Conflict("username already exists".to_owned()));
        }
        let user = new.into_user(UserId::generate());
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    // =========================================================================
    // Products
    // =========================================================================

    async fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, StorageError> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|product| product.category == category)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, StorageError> {
        let product = new.into_product(ProductId::generate());
        self.tables
            .write()
            .await
            .products
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StorageError> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.products.get(&id) else {
            return Ok(None);
        };
        let updated = patch.apply(existing);
        tables.products.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn update_product_stock(
        &self,
        id: ProductId,
        stock: i32,
    ) -> Result<Option<Product>, StorageError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        product.stock = stock;
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    async fn get_cart(&self, cart_id: &CartToken) -> Result<Vec<CartItem>, StorageError> {
        Ok(self
            .tables
            .read()
            .await
            .carts
            .get(cart_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_to_cart(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartItem>, StorageError> {
        let mut tables = self.tables.write().await;
        let cart = tables.carts.entry(cart_id.clone()).or_default();

        if let Some(line) = cart.iter_mut().find(|item| item.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
        } else {
            cart.push(CartItem {
                cart_id: cart_id.clone(),
                product_id,
                quantity: quantity.min(MAX_LINE_QUANTITY),
            });
        }

        Ok(cart.clone())
    }

    async fn update_cart_item(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartItem>, StorageError> {
        let mut tables = self.tables.write().await;
        let cart = tables.carts.entry(cart_id.clone()).or_default();

        if quantity <= 0 {
            cart.retain(|item| item.product_id != product_id);
        } else if let Some(line) = cart.iter_mut().find(|item| item.product_id == product_id) {
            line.quantity = quantity;
        }

        Ok(cart.clone())
    }

    async fn remove_from_cart(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
    ) -> Result<Vec<CartItem>, StorageError> {
        let mut tables = self.tables.write().await;
        let cart = tables.carts.entry(cart_id.clone()).or_default();
        cart.retain(|item| item.product_id != product_id);
        Ok(cart.clone())
    }

    async fn clear_cart(&self, cart_id: &CartToken) -> Result<(), StorageError> {
        self.tables.write().await.carts.remove(cart_id);
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    async fn create_order(
        &self,
        new: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), StorageError> {
        let mut tables = self.tables.write().await;

        let order = new.into_order(OrderId::generate(), Utc::now());
        tables.orders.insert(order.id, order.clone());

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let order_item = item.into_order_item(OrderItemId::generate(), order.id);
            tables.order_items.insert(order_item.id, order_item.clone());
            created.push(order_item);
        }

        Ok((order, created))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StorageError> {
        let tables = self.tables.read().await;
        let mut items: Vec<OrderItem> = tables
            .order_items
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.product_name.cmp(&b.product_name));
        Ok(items)
    }

    // =========================================================================
    // Custom print requests
    // =========================================================================

    async fn create_print_request(
        &self,
        new: NewPrintRequest,
    ) -> Result<CustomPrintRequest, StorageError> {
        let request = new.into_request(PrintRequestId::generate(), Utc::now());
        self.tables
            .write()
            .await
            .print_requests
            .insert(request.id, request.clone());
        Ok(request)
    }

    async fn list_print_requests(&self) -> Result<Vec<CustomPrintRequest>, StorageError> {
        let tables = self.tables.read().await;
        let mut requests: Vec<CustomPrintRequest> =
            tables.print_requests.values().cloned().collect();
        requests.sort_by_key(|request| request.created_at);
        Ok(requests)
    }

    async fn get_print_request(
        &self,
        id: PrintRequestId,
    ) -> Result<Option<CustomPrintRequest>, StorageError> {
        Ok(self.tables.read().await.print_requests.get(&id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use printforge_core::{Email, OrderStatus, Price};

    use super::*;

    fn new_product(name: &str, category: &str, price: &str, stock: i32) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            description: format!("{name} description"),
            price: Price::parse(price).unwrap(),
            image: "/images/test.png".to_owned(),
            category: category.to_owned(),
            stock,
        }
    }

    fn new_order(total: &str) -> NewOrder {
        NewOrder {
            customer_name: "Test Customer".to_owned(),
            customer_email: Email::parse("test@example.com").unwrap(),
            customer_phone: "555-0100".to_owned(),
            address: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: "62704".to_owned(),
            total: Price::parse(total).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_product_assigns_unique_id_and_is_retrievable() {
        let storage = MemStorage::new();

        let a = storage
            .create_product(new_product("Stand", "Accessories", "9.99", 3))
            .await
            .unwrap();
        let b = storage
            .create_product(new_product("Pot", "Home Decor", "4.99", 1))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        let fetched = storage.get_product(a.id).await.unwrap().unwrap();
        assert_eq!(fetched, a);
    }

    #[tokio::test]
    async fn test_update_stock_leaves_other_fields_unchanged() {
        let storage = MemStorage::new();
        let product = storage
            .create_product(new_product("Stand", "Accessories", "9.99", 3))
            .await
            .unwrap();

        let updated = storage
            .update_product_stock(product.id, 5)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.stock, 5);
        assert_eq!(updated.name, product.name);
        assert_eq!(updated.description, product.description);
        assert_eq!(updated.price, product.price);
        assert_eq!(updated.category, product.category);
    }

    #[tokio::test]
    async fn test_update_product_partial_patch() {
        let storage = MemStorage::new();
        let product = storage
            .create_product(new_product("Stand", "Accessories", "9.99", 3))
            .await
            .unwrap();

        let patch = ProductPatch {
            price: Some(Price::parse("12.50").unwrap()),
            ..ProductPatch::default()
        };
        let updated = storage
            .update_product(product.id, patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, Price::parse("12.50").unwrap());
        assert_eq!(updated.name, product.name);
        assert_eq!(updated.stock, product.stock);
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_none() {
        let storage = MemStorage::new();
        let result = storage
            .update_product(ProductId::generate(), ProductPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_product_makes_get_return_none() {
        let storage = MemStorage::new();
        let product = storage
            .create_product(new_product("Stand", "Accessories", "9.99", 3))
            .await
            .unwrap();

        assert!(storage.delete_product(product.id).await.unwrap());
        assert!(storage.get_product(product.id).await.unwrap().is_none());
        // Second delete reports nothing was removed
        assert!(!storage.delete_product(product.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_category_filters() {
        let storage = MemStorage::new();
        storage
            .create_product(new_product("Stand", "Accessories", "9.99", 3))
            .await
            .unwrap();
        storage
            .create_product(new_product("Pot", "Home Decor", "4.99", 1))
            .await
            .unwrap();

        let accessories = storage
            .list_products_by_category("Accessories")
            .await
            .unwrap();
        assert_eq!(accessories.len(), 1);
        assert_eq!(accessories.first().unwrap().name, "Stand");

        assert!(
            storage
                .list_products_by_category("Bundles")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_seeded_store_has_starter_catalog() {
        let storage = MemStorage::seeded();
        let products = storage.list_products().await.unwrap();
        assert_eq!(products.len(), 6);
        assert!(products.iter().any(|p| p.name == "Custom Keychains"));
    }

    #[tokio::test]
    async fn test_add_same_product_twice_accumulates_quantity() {
        let storage = MemStorage::new();
        let cart = CartToken::from("cart-1");
        let product_id = ProductId::generate();

        let lines = storage.add_to_cart(&cart, product_id, 2).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 2);

        let lines = storage.add_to_cart(&cart, product_id, 3).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_accumulated_quantity_clamps_instead_of_overflowing() {
        let storage = MemStorage::new();
        let cart = CartToken::from("cart-1");
        let product_id = ProductId::generate();

        let lines = storage
            .add_to_cart(&cart, product_id, i32::MAX)
            .await
            .unwrap();
        assert_eq!(lines.first().unwrap().quantity, MAX_LINE_QUANTITY);

        // A further add must not panic or wrap negative
        let lines = storage.add_to_cart(&cart, product_id, 1).await.unwrap();
        assert_eq!(lines.first().unwrap().quantity, MAX_LINE_QUANTITY);
    }

    #[tokio::test]
    async fn test_update_quantity_to_zero_removes_line() {
        let storage = MemStorage::new();
        let cart = CartToken::from("cart-1");
        let product_id = ProductId::generate();

        storage.add_to_cart(&cart, product_id, 2).await.unwrap();
        let lines = storage.update_cart_item(&cart, product_id, 0).await.unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_sets_value() {
        let storage = MemStorage::new();
        let cart = CartToken::from("cart-1");
        let product_id = ProductId::generate();

        storage.add_to_cart(&cart, product_id, 2).await.unwrap();
        let lines = storage.update_cart_item(&cart, product_id, 7).await.unwrap();
        assert_eq!(lines.first().unwrap().quantity, 7);
    }

    #[tokio::test]
    async fn test_update_unknown_line_is_noop() {
        let storage = MemStorage::new();
        let cart = CartToken::from("cart-1");
        storage
            .add_to_cart(&cart, ProductId::generate(), 1)
            .await
            .unwrap();

        let lines = storage
            .update_cart_item(&cart, ProductId::generate(), 4)
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_from_cart() {
        let storage = MemStorage::new();
        let cart = CartToken::from("cart-1");
        let keep = ProductId::generate();
        let drop = ProductId::generate();

        storage.add_to_cart(&cart, keep, 1).await.unwrap();
        storage.add_to_cart(&cart, drop, 1).await.unwrap();

        let lines = storage.remove_from_cart(&cart, drop).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().product_id, keep);
    }

    #[tokio::test]
    async fn test_clear_cart_leaves_other_carts_alone() {
        let storage = MemStorage::new();
        let mine = CartToken::from("cart-mine");
        let theirs = CartToken::from("cart-theirs");
        let product_id = ProductId::generate();

        storage.add_to_cart(&mine, product_id, 1).await.unwrap();
        storage.add_to_cart(&theirs, product_id, 2).await.unwrap();

        storage.clear_cart(&mine).await.unwrap();

        assert!(storage.get_cart(&mine).await.unwrap().is_empty());
        assert_eq!(storage.get_cart(&theirs).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_cart_is_empty() {
        let storage = MemStorage::new();
        let lines = storage.get_cart(&CartToken::from("nope")).await.unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn test_create_order_with_items() {
        let storage = MemStorage::new();
        let product_id = ProductId::generate();

        let (order, items) = storage
            .create_order(
                new_order("29.97"),
                vec![NewOrderItem {
                    product_id,
                    product_name: "Stand".to_owned(),
                    product_price: Price::parse("9.99").unwrap(),
                    quantity: 3,
                }],
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().order_id, order.id);

        let fetched = storage.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.customer_name, "Test Customer");

        let fetched_items = storage.get_order_items(order.id).await.unwrap();
        assert_eq!(fetched_items, items);
    }

    #[tokio::test]
    async fn test_order_items_do_not_leak_across_orders() {
        let storage = MemStorage::new();
        let item = |name: &str| NewOrderItem {
            product_id: ProductId::generate(),
            product_name: name.to_owned(),
            product_price: Price::parse("1").unwrap(),
            quantity: 1,
        };

        let (first, _) = storage
            .create_order(new_order("1"), vec![item("A")])
            .await
            .unwrap();
        let (second, _) = storage
            .create_order(new_order("2"), vec![item("B"), item("C")])
            .await
            .unwrap();

        assert_eq!(storage.get_order_items(first.id).await.unwrap().len(), 1);
        assert_eq!(storage.get_order_items(second.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_print_request_lifecycle() {
        let storage = MemStorage::new();
        let created = storage
            .create_print_request(NewPrintRequest {
                name: "Grace".to_owned(),
                email: Email::parse("grace@example.com").unwrap(),
                phone: "555-0199".to_owned(),
                material: Some("PLA".to_owned()),
                quantity: 1,
                size: None,
                color: None,
                project_description: "A bracket for a server rack".to_owned(),
                file_name: None,
                file_url: None,
            })
            .await
            .unwrap();

        let fetched = storage
            .get_print_request(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, created);

        let all = storage.list_print_requests().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let storage = MemStorage::new();
        storage
            .create_user(NewUser {
                username: "ada".to_owned(),
                password: "hash".to_owned(),
            })
            .await
            .unwrap();

        let result = storage
            .create_user(NewUser {
                username: "ada".to_owned(),
                password: "other".to_owned(),
            })
            .await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_username() {
        let storage = MemStorage::new();
        let created = storage
            .create_user(NewUser {
                username: "ada".to_owned(),
                password: "hash".to_owned(),
            })
            .await
            .unwrap();

        let fetched = storage
            .get_user_by_username("ada")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, created.id);

        assert!(storage.get_user_by_username("bob").await.unwrap().is_none());
        assert_eq!(
            storage.get_user(created.id).await.unwrap().unwrap().username,
            "ada"
        );
    }
}
