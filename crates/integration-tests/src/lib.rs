//! Integration tests for PrintForge.
//!
//! Tests drive the full axum router in-process over the in-memory storage
//! backend, so no server or database is needed:
//!
//! ```bash
//! cargo test -p printforge-integration-tests
//! ```
//!
//! [`TestApp`] builds the same router the binary serves (minus the Sentry
//! layers) and exposes small request helpers that decode JSON responses.

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use printforge_storefront::app;
use printforge_storefront::config::StorefrontConfig;
use printforge_storefront::state::AppState;
use printforge_storefront::storage::{MemStorage, Storage};
use printforge_storefront::uploads::UploadStore;

/// An in-process instance of the storefront application.
pub struct TestApp {
    router: Router,
    // Held so uploaded files live as long as the app under test.
    _upload_dir: TempDir,
}

impl TestApp {
    /// App over an in-memory store seeded with the starter catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_storage(Arc::new(MemStorage::seeded()))
    }

    /// App over an empty in-memory store.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_storage(Arc::new(MemStorage::new()))
    }

    fn with_storage(storage: Arc<dyn Storage>) -> Self {
        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        let config = StorefrontConfig {
            database_url: None,
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            upload_dir: upload_dir.path().to_path_buf(),
            sentry_dsn: None,
        };

        let uploads = UploadStore::new(upload_dir.path());
        let state = AppState::new(config, storage, uploads);

        Self {
            router: app(state),
            _upload_dir: upload_dir,
        }
    }

    /// Send a request and return the status with the raw response body.
    pub async fn request_raw(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        (status, bytes)
    }

    /// Send a request with an optional JSON body and decode a JSON response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).expect("Failed to encode request body"))
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("Failed to build request");
        let (status, bytes) = self.request_raw(request).await;

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        (status, json)
    }

    /// `GET` a path, expecting a JSON response.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// `PATCH` a JSON body.
    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    /// `DELETE` a path.
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}
