//! `PostgreSQL` storage backend.
//!
//! Delegates every operation to SQL via sqlx's runtime query API. Row structs
//! are decoded with `FromRow` and converted into domain models, surfacing
//! invalid stored data (e.g. an unknown status string) as
//! [`StorageError::DataCorruption`].
//!
//! Cart lines are persisted in a `cart_items` table keyed by
//! (`cart_id`, `product_id`) and upserted with `ON CONFLICT`. Order creation
//! wraps the order row and its line items in a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use printforge_core::{
    CartToken, Email, OrderId, OrderItemId, OrderStatus, PrintRequestId, PrintRequestStatus,
    Price, ProductId, UserId,
};

use super::{Storage, StorageError};
use crate::models::{
    CartItem, CustomPrintRequest, NewOrder, NewOrderItem, NewPrintRequest, NewProduct, NewUser,
    Order, OrderItem, Product, ProductPatch, User,
};

/// `PostgreSQL`-backed storage.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Create a new Postgres storage backend over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =============================================================================
// Row types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password: row.password,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    image: String,
    category: String,
    stock: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            category: row.category,
            stock: row.stock,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    cart_id: CartToken,
    product_id: ProductId,
    quantity: i32,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            cart_id: row.cart_id,
            product_id: row.product_id,
            quantity: row.quantity,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_name: String,
    customer_email: Email,
    customer_phone: String,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    total: Price,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StorageError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e: String| {
            StorageError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            total: row.total,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    product_price: Price,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_price: row.product_price,
            quantity: row.quantity,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PrintRequestRow {
    id: PrintRequestId,
    name: String,
    email: Email,
    phone: String,
    material: Option<String>,
    quantity: i32,
    size: Option<String>,
    color: Option<String>,
    project_description: String,
    file_name: Option<String>,
    file_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PrintRequestRow> for CustomPrintRequest {
    type Error = StorageError;

    fn try_from(row: PrintRequestRow) -> Result<Self, Self::Error> {
        let status: PrintRequestStatus = row.status.parse().map_err(|e: String| {
            StorageError::DataCorruption(format!("invalid print request status in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            material: row.material,
            quantity: row.quantity,
            size: row.size,
            color: row.color,
            project_description: row.project_description,
            file_name: row.file_name,
            file_url: row.file_url,
            status,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Storage implementation
// =============================================================================

#[async_trait]
impl Storage for PgStorage {
    // =========================================================================
    // Users
    // =========================================================================

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password
            ",
        )
        .bind(&new.username)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StorageError::Conflict("username already exists".to_owned());
            }
            StorageError::Database(e)
        })?;

        Ok(row.into())
    }

    // =========================================================================
    // Products
    // =========================================================================

    async fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, category, stock
            FROM products
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, category, stock
            FROM products
            WHERE category = $1
            ORDER BY name
            ",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, category, stock
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, StorageError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, description, price, image, category, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, image, category, stock
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.image)
        .bind(&new.category)
        .bind(new.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image = COALESCE($5, image),
                category = COALESCE($6, category),
                stock = COALESCE($7, stock)
            WHERE id = $1
            RETURNING id, name, description, price, image, category, stock
            ",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.image)
        .bind(patch.category)
        .bind(patch.stock)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn update_product_stock(
        &self,
        id: ProductId,
        stock: i32,
    ) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products SET stock = $2
            WHERE id = $1
            RETURNING id, name, description, price, image, category, stock
            ",
        )
        .bind(id)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    async fn get_cart(&self, cart_id: &CartToken) -> Result<Vec<CartItem>, StorageError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT cart_id, product_id, quantity
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY added_at
            ",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn add_to_cart(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartItem>, StorageError> {
        // Accumulation happens in bigint and is clamped so the int4 column
        // can never overflow, mirroring the in-memory backend.
        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, LEAST($3, $4))
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = LEAST(
                cart_items.quantity::bigint + EXCLUDED.quantity::bigint,
                $4::bigint
            )::int
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(super::MAX_LINE_QUANTITY)
        .execute(&self.pool)
        .await?;

        self.get_cart(cart_id).await
    }

    async fn update_cart_item(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartItem>, StorageError> {
        if quantity <= 0 {
            return self.remove_from_cart(cart_id, product_id).await;
        }

        // Absent lines are left absent: a plain UPDATE is the intended no-op.
        sqlx::query(
            r"
            UPDATE cart_items SET quantity = $3
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        self.get_cart(cart_id).await
    }

    async fn remove_from_cart(
        &self,
        cart_id: &CartToken,
        product_id: ProductId,
    ) -> Result<Vec<CartItem>, StorageError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        self.get_cart(cart_id).await
    }

    async fn clear_cart(&self, cart_id: &CartToken) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;

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
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders
                (customer_name, customer_email, customer_phone,
                 address, city, state, zip_code, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, customer_name, customer_email, customer_phone,
                      address, city, state, zip_code, total, status, created_at
            ",
        )
        .bind(&new.customer_name)
        .bind(&new.customer_email)
        .bind(&new.customer_phone)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip_code)
        .bind(new.total)
        .fetch_one(&mut *tx)
        .await?;

        let order = Order::try_from(order_row)?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                r"
                INSERT INTO order_items
                    (order_id, product_id, product_name, product_price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, product_id, product_name, product_price, quantity
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.product_price)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;

            created.push(item_row.into());
        }

        tx.commit().await?;

        Ok((order, created))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_name, customer_email, customer_phone,
                   address, city, state, zip_code, total, status, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StorageError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, product_name, product_price, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY product_name
            ",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    // =========================================================================
    // Custom print requests
    // =========================================================================

    async fn create_print_request(
        &self,
        new: NewPrintRequest,
    ) -> Result<CustomPrintRequest, StorageError> {
        let row = sqlx::query_as::<_, PrintRequestRow>(
            r"
            INSERT INTO custom_print_requests
                (name, email, phone, material, quantity, size, color,
                 project_description, file_name, file_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, email, phone, material, quantity, size, color,
                      project_description, file_name, file_url, status, created_at
            ",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.material)
        .bind(new.quantity)
        .bind(&new.size)
        .bind(&new.color)
        .bind(&new.project_description)
        .bind(&new.file_name)
        .bind(&new.file_url)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_print_requests(&self) -> Result<Vec<CustomPrintRequest>, StorageError> {
        let rows = sqlx::query_as::<_, PrintRequestRow>(
            r"
            SELECT id, name, email, phone, material, quantity, size, color,
                   project_description, file_name, file_url, status, created_at
            FROM custom_print_requests
            ORDER BY created_at
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CustomPrintRequest::try_from).collect()
    }

    async fn get_print_request(
        &self,
        id: PrintRequestId,
    ) -> Result<Option<CustomPrintRequest>, StorageError> {
        let row = sqlx::query_as::<_, PrintRequestRow>(
            r"
            SELECT id, name, email, phone, material, quantity, size, color,
                   project_description, file_name, file_url, status, created_at
            FROM custom_print_requests
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomPrintRequest::try_from).transpose()
    }
}
