//! Storage abstraction for the storefront.
//!
//! One trait, two backends: [`MemStorage`] keeps everything in maps and is
//! the default for development, [`PgStorage`] persists to `PostgreSQL`.
//! Route handlers only ever see `dyn Storage`, so the HTTP layer is
//! indifferent to which backend is running.
//!
//! # Contract notes
//!
//! - Cart mutations are idempotent upserts/deletes keyed by
//!   (`cart_id`, `product_id`); a quantity of zero or less deletes the line.
//! - `create_order` inserts the order and its line items together; the
//!   Postgres backend wraps the pair in a single transaction.
//! - `get_*` operations return `Ok(None)` for missing entities; `NotFound`
//!   errors are reserved for mutations against missing rows.

pub mod memory;
pub mod postgres;

pub use memory::MemStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;
use thiserror::Error;

use printforge_core::{CartToken, OrderId, PrintRequestId, Price, ProductId, UserId};

use crate::models::{
    CartItem, CustomPrintRequest, NewOrder, NewOrderItem, NewPrintRequest, NewProduct, NewUser,
    Order, OrderItem, Product, ProductPatch, User,
};

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Upper bound on a single cart line's quantity.
///
/// Both backends clamp accumulation at this value and the cart routes reject
/// larger requests outright, so a line quantity can never overflow `i32`.
pub const MAX_LINE_QUANTITY: i32 = 1_000_000;

/// The storage contract consumed by all route handlers.
#[async_trait]
pub trait Storage: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Get a user by id.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Get a user by username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    /// Create a user. Fails with `Conflict` if the username is taken.
    async fn create_user(&self, new: NewUser) -> Result<User, StorageError>;

    // =========================================================================
    // Products
    // =========================================================================

    /// List the entire catalog.
    async fn list_products(&self) -> Result<Vec<Product>, StorageError>;

    /// List products in one category.
    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, StorageError>;

    /// Get a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError>;

    /// Create a product and assign it an id.
    async fn create_product(&self, new: NewProduct) -> Result<Product, StorageError>;

    /// Partially update a product. Fields absent from the patch are unchanged.
    /// Returns `None` if the product does not exist.
    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StorageError>;

    /// Update only a product's stock count.
    /// Returns `None` if the product does not exist.
    async fn update_product_stock(
        &self,
        id: ProductId,
        stock: i32,
    ) -> Result<Option<Product>, StorageError>;

    /// Delete a product. Returns `false` if it did not exist.
    async fn delete_product(&self, id: ProductId) -> Result<bool, StorageError>;

    // =========================================================================
    // Cart
    // =========================================================================

    /// Get all lines for a cart. Unknown carts are empty, not errors.
    async fn get_cart(&self, cart_id: &CartToken) -> Result<Vec<CartItem>, StorageError>;

    /// Add a line to a cart. Adding a product already in the cart accumulates
    /// quantity instead of duplicating the line, clamped at
    /// [`MAX_LINE_QUANTITY`]. Returns the full cart.
    async fn add_to_cart(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartItem>, StorageError>;

    /// Set a line's quantity. A quantity of zero or less deletes the line;
    /// updating a line that isn't in the cart is a no-op. Returns the full cart.
    async fn update_cart_item(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartItem>, StorageError>;

    /// Remove a line from a cart. Returns the full cart.
    async fn remove_from_cart(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
    ) -> Result<Vec<CartItem>, StorageError>;

    /// Remove every line for a cart. Other carts are unaffected.
    async fn clear_cart(&self, cart_id: &CartToken) -> Result<(), StorageError>;

    // =========================================================================
    // Orders
    // =========================================================================

    /// Create an order together with its line items.
    ///
    /// The order and items are written as a unit so a crash cannot leave an
    /// order without its lines.
    async fn create_order(
        &self,
        new: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), StorageError>;

    /// Get an order by id.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StorageError>;

    /// Get the line items for an order.
    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StorageError>;

    // =========================================================================
    // Custom print requests
    // =========================================================================

    /// Create a custom print request.
    async fn create_print_request(
        &self,
        new: NewPrintRequest,
    ) -> Result<CustomPrintRequest, StorageError>;

    /// List all custom print requests.
    async fn list_print_requests(&self) -> Result<Vec<CustomPrintRequest>, StorageError>;

    /// Get a custom print request by id.
    async fn get_print_request(
        &self,
        id: PrintRequestId,
    ) -> Result<Option<CustomPrintRequest>, StorageError>;
}

/// The starter catalog: the six products the store launches with.
///
/// Seeded automatically by [`MemStorage::seeded`] and inserted into Postgres
/// by `printforge-cli seed`.
#[must_use]
pub fn starter_catalog() -> Vec<NewProduct> {
    let entry = |name: &str, description: &str, price: &str, image: &str, category: &str, stock| {
        NewProduct {
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::parse(price).unwrap_or(Price::ZERO),
            image: image.to_owned(),
            category: category.to_owned(),
            stock,
        }
    };

    vec![
        entry(
            "Geometric Phone Stand",
            "A sleek and modern phone stand with geometric design, perfect for any desk setup.",
            "299",
            "/images/products/phone-stand-black.png",
            "Accessories",
            25,
        ),
        entry(
            "Modern Planter Pot",
            "Stylish planter pot with a contemporary design, ideal for small plants and succulents.",
            "449",
            "/images/products/planter-teal.png",
            "Home Decor",
            15,
        ),
        entry(
            "Custom Keychains",
            "Personalized 3D printed keychains in vibrant colors, great as gifts or accessories.",
            "99",
            "/images/products/keychains-set.png",
            "Accessories",
            50,
        ),
        entry(
            "Product Collection",
            "A curated bundle of our most popular 3D printed items at a special price.",
            "999",
            "/images/products/collection.png",
            "Bundles",
            10,
        ),
        entry(
            "Premium Phone Stand",
            "High-quality phone stand with premium finish and adjustable angle for optimal viewing.",
            "499",
            "/images/products/phone-stand-premium.png",
            "Accessories",
            20,
        ),
        entry(
            "Designer Planter",
            "Elegant designer planter with unique patterns, perfect for modern home decor.",
            "599",
            "/images/products/planter-designer.png",
            "Home Decor",
            12,
        ),
    ]
}
