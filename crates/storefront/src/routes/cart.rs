//! Cart route handlers.
//!
//! Carts are keyed by a client-generated opaque token, so there is no cart
//! creation step: the first add under a token brings the cart into
//! existence, and reading an unknown token yields an empty cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use printforge_core::{CartToken, ProductId};

use crate::error::{AppError, Result};
use crate::models::CartItem;
use crate::state::AppState;
use crate::storage::MAX_LINE_QUANTITY;

/// Body for adding a line to a cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
    pub product_id: String,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

/// Body for setting a line's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateCartPayload {
    pub quantity: i32,
}

fn parse_product_id(id: &str) -> Result<ProductId> {
    id.parse()
        .map_err(|_| AppError::BadRequest("Invalid product id".to_owned()))
}

fn check_quantity(quantity: i32, min: i32) -> Result<()> {
    if quantity < min {
        let bound = if min == 0 {
            "must not be negative".to_owned()
        } else {
            format!("must be at least {min}")
        };
        return Err(AppError::validation(
            "Invalid cart data",
            vec![format!("quantity {bound}")],
        ));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::validation(
            "Invalid cart data",
            vec![format!("quantity must be at most {MAX_LINE_QUANTITY}")],
        ));
    }
    Ok(())
}

/// `GET /api/cart/{cartId}` — current cart lines.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Result<Json<Vec<CartItem>>> {
    let cart_id = CartToken::from(cart_id);
    let items = state.storage().get_cart(&cart_id).await?;

    Ok(Json(items))
}

/// `POST /api/cart/{cartId}` — add a line. Adding a product already in the
/// cart accumulates quantity.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(payload): Json<AddToCartPayload>,
) -> Result<(StatusCode, Json<Vec<CartItem>>)> {
    let product_id = parse_product_id(&payload.product_id)?;
    let quantity = payload.quantity.unwrap_or(1);
    check_quantity(quantity, 1)?;

    let cart_id = CartToken::from(cart_id);
    let items = state
        .storage()
        .add_to_cart(&cart_id, product_id, quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(items)))
}

/// `PATCH /api/cart/{cartId}/{productId}` — set a line's quantity. A
/// quantity of zero removes the line.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(String, String)>,
    Json(payload): Json<UpdateCartPayload>,
) -> Result<Json<Vec<CartItem>>> {
    let product_id = parse_product_id(&product_id)?;
    check_quantity(payload.quantity, 0)?;

    let cart_id = CartToken::from(cart_id);
    let items = state
        .storage()
        .update_cart_item(&cart_id, product_id, payload.quantity)
        .await?;

    Ok(Json(items))
}

/// `DELETE /api/cart/{cartId}/{productId}` — remove a line.
#[instrument(skip_all)]
pub async fn remove(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(String, String)>,
) -> Result<Json<Vec<CartItem>>> {
    let product_id = parse_product_id(&product_id)?;
    let cart_id = CartToken::from(cart_id);
    let items = state
        .storage()
        .remove_from_cart(&cart_id, product_id)
        .await?;

    Ok(Json(items))
}

/// `DELETE /api/cart/{cartId}` — clear the whole cart.
#[instrument(skip_all)]
pub async fn clear(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let cart_id = CartToken::from(cart_id);
    state.storage().clear_cart(&cart_id).await?;

    Ok(Json(json!({ "message": "Cart cleared" })))
}
