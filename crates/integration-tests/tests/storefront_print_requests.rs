//! Integration tests for the custom print request API.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use uuid::Uuid;

use printforge_integration_tests::TestApp;

fn sample_request_payload() -> Value {
    json!({
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "phone": "555-0199",
        "material": "PLA",
        "quantity": 2,
        "color": "Teal",
        "projectDescription": "A replacement bracket for a server rack door hinge."
    })
}

#[tokio::test]
async fn test_submit_print_request() {
    let app = TestApp::seeded();

    let (status, body) = app
        .post("/api/custom-print-requests", sample_request_payload())
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["email"], "grace@example.com");
    assert_eq!(body["quantity"], 2);
    assert!(body["fileName"].is_null());
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_submit_with_attached_file_url() {
    let app = TestApp::seeded();

    let mut payload = sample_request_payload();
    payload["fileName"] = json!("bracket.stl");
    payload["fileUrl"] = json!("/uploads/1234-bracket.stl");

    let (status, body) = app.post("/api/custom-print-requests", payload).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fileName"], "bracket.stl");
    assert_eq!(body["fileUrl"], "/uploads/1234-bracket.stl");
}

#[tokio::test]
async fn test_print_request_validation() {
    let app = TestApp::seeded();

    let (status, body) = app
        .post(
            "/api/custom-print-requests",
            json!({
                "name": "",
                "email": "grace",
                "phone": "555-0199",
                "projectDescription": "too short"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid print request data");

    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert!(errors.iter().any(|e| e.contains("name")));
    assert!(errors.iter().any(|e| e.contains("email")));
    assert!(errors.iter().any(|e| e.contains("projectDescription")));
}

#[tokio::test]
async fn test_list_and_get_print_requests() {
    let app = TestApp::seeded();

    let (_, created) = app
        .post("/api/custom-print-requests", sample_request_payload())
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, listing) = app.get("/api/custom-print-requests").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let (status, fetched) = app.get(&format!("/api/custom-print-requests/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_print_request_is_404() {
    let app = TestApp::seeded();

    let (status, body) = app
        .get(&format!("/api/custom-print-requests/{}", Uuid::new_v4()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Print request not found");
}

// ============================================================================
// Design file uploads
// ============================================================================

const BOUNDARY: &str = "printforge-test-boundary";

fn multipart_request(uri: &str, field_name: &str, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_stores_file_and_serves_it() {
    let app = TestApp::seeded();

    let request = multipart_request(
        "/api/custom-print-requests/upload",
        "file",
        "bracket.stl",
        "solid bracket",
    );
    let (status, bytes) = app.request_raw(request).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["fileName"], "bracket.stl");
    let file_url = body["fileUrl"].as_str().unwrap();
    assert!(file_url.starts_with("/uploads/"));
    assert!(file_url.ends_with("-bracket.stl"));

    // The stored file is served back under /uploads
    let request = Request::builder()
        .method(Method::GET)
        .uri(file_url)
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = app.request_raw(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], b"solid bracket");
}

#[tokio::test]
async fn test_upload_without_file_part_is_400() {
    let app = TestApp::seeded();

    let request = multipart_request(
        "/api/custom-print-requests/upload",
        "attachment",
        "bracket.stl",
        "solid bracket",
    );
    let (status, _) = app.request_raw(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
