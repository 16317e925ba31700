//! Health check handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use printforge_core::ProductId;

use crate::state::AppState;

/// Liveness check. Answers as long as the process is serving requests.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check. Issues a cheap lookup against the storage backend so a
/// dead database connection flips the probe to 503.
pub async fn ready(State(state): State<AppState>) -> Response {
    match state.storage().get_product(ProductId::new(Uuid::nil())).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}
