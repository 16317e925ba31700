//! `PostgreSQL` connection pool setup.
//!
//! # Database: `printforge`
//!
//! ## Tables
//!
//! - `users` - Storage contract users (no HTTP surface)
//! - `products` - Catalog
//! - `cart_items` - Cart lines keyed by (`cart_id`, `product_id`)
//! - `orders` / `order_items` - Placed orders with price snapshots
//! - `custom_print_requests` - Quote submissions
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p printforge-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
