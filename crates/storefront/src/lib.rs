//! PrintForge Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
pub mod uploads;

use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the full application router over the given state.
///
/// Includes the API routes, health checks, static serving of uploaded
/// design files, and the tracing/CORS layers. Sentry layers are added by
/// the binary so tests don't need a Sentry hub.
#[must_use]
pub fn app(state: AppState) -> Router {
    let uploads_dir = state.uploads().root().to_path_buf();

    routes::routes()
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
