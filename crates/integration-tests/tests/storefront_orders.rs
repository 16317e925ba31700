//! Integration tests for the order API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use printforge_integration_tests::TestApp;

fn sample_order_payload(product_id: &str) -> Value {
    json!({
        "order": {
            "customerName": "Ada Lovelace",
            "customerEmail": "ada@example.com",
            "customerPhone": "555-0100",
            "address": "1 Analytical Way",
            "city": "London",
            "state": "LN",
            "zipCode": "00001",
            "total": "598"
        },
        "items": [
            {
                "productId": product_id,
                "productName": "Geometric Phone Stand",
                "productPrice": "299",
                "quantity": 2
            }
        ]
    })
}

async fn first_product_id(app: &TestApp) -> String {
    let (_, listing) = app.get("/api/products").await;
    listing.as_array().unwrap()[0]["id"]
        .as_str()
        .unwrap()
        .to_owned()
}

#[tokio::test]
async fn test_place_order() {
    let app = TestApp::seeded();
    let product_id = first_product_id(&app).await;

    let (status, body) = app
        .post("/api/orders", sample_order_payload(&product_id))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["total"], "598");
    assert_eq!(body["order"]["customerEmail"], "ada@example.com");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["orderId"], body["order"]["id"]);
    assert_eq!(items[0]["productPrice"], "299");
    assert_eq!(items[0]["quantity"], 2);
}

#[tokio::test]
async fn test_get_order_with_items() {
    let app = TestApp::seeded();
    let product_id = first_product_id(&app).await;

    let (_, created) = app
        .post("/api/orders", sample_order_payload(&product_id))
        .await;
    let order_id = created["order"]["id"].as_str().unwrap();

    let (status, body) = app.get(&format!("/api/orders/{order_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["id"].as_str().unwrap(), order_id);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_unknown_order_is_404() {
    let app = TestApp::seeded();

    let (status, body) = app.get(&format!("/api/orders/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");
}

#[tokio::test]
async fn test_order_validation_collects_errors() {
    let app = TestApp::seeded();

    let (status, body) = app
        .post(
            "/api/orders",
            json!({
                "order": {
                    "customerName": "",
                    "customerEmail": "not-an-email",
                    "customerPhone": "555-0100",
                    "address": "1 Main St",
                    "city": "Springfield",
                    "state": "IL",
                    "zipCode": "62704",
                    "total": "100"
                },
                "items": []
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid order data");

    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert!(errors.iter().any(|e| e.contains("customerName")));
    assert!(errors.iter().any(|e| e.contains("customerEmail")));
    assert!(errors.iter().any(|e| e.contains("items")));
}

#[tokio::test]
async fn test_order_rejects_zero_quantity_item() {
    let app = TestApp::seeded();
    let product_id = first_product_id(&app).await;

    let mut payload = sample_order_payload(&product_id);
    payload["items"][0]["quantity"] = json!(0);

    let (status, body) = app.post("/api/orders", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert!(
        errors
            .iter()
            .any(|e| e.as_str().unwrap().contains("items[0]"))
    );
}
