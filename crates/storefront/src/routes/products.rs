//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use printforge_core::{Price, ProductId};

use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

/// Query parameters for the catalog listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Body for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub name: String,
    pub description: String,
    /// Decimal string, e.g. `"299"` or `"449.50"`.
    pub price: String,
    pub image: String,
    pub category: String,
    pub stock: Option<i32>,
}

impl CreateProductPayload {
    fn validate(self) -> std::result::Result<NewProduct, Vec<String>> {
        let mut errors = Vec::new();

        for (value, field) in [
            (&self.name, "name"),
            (&self.description, "description"),
            (&self.image, "image"),
            (&self.category, "category"),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{field} must not be empty"));
            }
        }

        let price = match Price::parse(&self.price) {
            Ok(price) => Some(price),
            Err(err) => {
                errors.push(format!("price: {err}"));
                None
            }
        };

        let stock = self.stock.unwrap_or(0);
        if stock < 0 {
            errors.push("stock must not be negative".to_owned());
        }

        match (price, errors.is_empty()) {
            (Some(price), true) => Ok(NewProduct {
                name: self.name,
                description: self.description,
                price,
                image: self.image,
                category: self.category,
                stock,
            }),
            _ => Err(errors),
        }
    }
}

/// Body for partially updating a product. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i32>,
}

impl UpdateProductPayload {
    fn validate(self) -> std::result::Result<ProductPatch, Vec<String>> {
        let mut errors = Vec::new();

        for (value, field) in [
            (&self.name, "name"),
            (&self.description, "description"),
            (&self.image, "image"),
            (&self.category, "category"),
        ] {
            if value.as_ref().is_some_and(|v| v.trim().is_empty()) {
                errors.push(format!("{field} must not be empty"));
            }
        }

        let price = match self.price.as_deref().map(Price::parse) {
            None => None,
            Some(Ok(price)) => Some(price),
            Some(Err(err)) => {
                errors.push(format!("price: {err}"));
                None
            }
        };

        if self.stock.is_some_and(|s| s < 0) {
            errors.push("stock must not be negative".to_owned());
        }

        if errors.is_empty() {
            Ok(ProductPatch {
                name: self.name,
                description: self.description,
                price,
                image: self.image,
                category: self.category,
                stock: self.stock,
            })
        } else {
            Err(errors)
        }
    }
}

fn parse_id(id: &str) -> Result<ProductId> {
    id.parse()
        .map_err(|_| AppError::BadRequest("Invalid product id".to_owned()))
}

/// `GET /api/products` — list the catalog, optionally filtered by category.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = match query.category.as_deref() {
        Some(category) => state.storage().list_products_by_category(category).await?,
        None => state.storage().list_products().await?,
    };

    Ok(Json(products))
}

/// `GET /api/products/{id}` — product detail.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let product = state
        .storage()
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(product))
}

/// `POST /api/products` — create a product.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<(StatusCode, Json<Product>)> {
    let new = payload
        .validate()
        .map_err(|errors| AppError::validation("Invalid product data", errors))?;

    let product = state.storage().create_product(new).await?;
    tracing::info!(product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PATCH /api/products/{id}` — partial update.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let patch = payload
        .validate()
        .map_err(|errors| AppError::validation("Invalid product data", errors))?;

    let product = state
        .storage()
        .update_product(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}` — delete a product.
#[instrument(skip_all)]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let id = parse_id(&id)?;

    if state.storage().delete_product(id).await? {
        Ok(Json(json!({ "message": "Product deleted successfully" })))
    } else {
        Err(AppError::NotFound("Product".to_owned()))
    }
}
