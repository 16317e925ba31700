//! Seed the database with the starter catalog.
//!
//! Idempotent: products whose name already exists in their category are
//! skipped, so re-running the command never duplicates the catalog.

use printforge_storefront::db;
use printforge_storefront::storage::{PgStorage, Storage, StorageError, starter_catalog};

/// Errors from the seed command.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Insert the starter catalog into the configured database.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;
    let storage = PgStorage::new(pool);

    let mut inserted = 0_usize;
    let mut skipped = 0_usize;

    for new in starter_catalog() {
        let existing = storage.list_products_by_category(&new.category).await?;
        if existing.iter().any(|p| p.name == new.name) {
            tracing::debug!(name = %new.name, "Product already seeded, skipping");
            skipped += 1;
            continue;
        }

        let product = storage.create_product(new).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Seeded product");
        inserted += 1;
    }

    tracing::info!(inserted, skipped, "Seeding complete");
    Ok(())
}
