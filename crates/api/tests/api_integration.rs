//! Integration tests for the API server.

use std::sync::OnceLock;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{InMemoryObjectStore, InMemoryRecordStore, ObjectKey};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> (axum::Router, InMemoryObjectStore, InMemoryRecordStore) {
    let (state, objects, records) = api::create_memory_state("test-images");
    let app = api::create_app(state, get_metrics_handle(), Duration::from_secs(30));
    (app, objects, records)
}

fn png_data_url(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

fn create_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn mug_request() -> Request<Body> {
    create_request(serde_json::json!({
        "name": "Mug",
        "description": "Ceramic mug",
        "price": 9.99,
        "imageData": png_data_url(b"fake png bytes"),
    }))
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_product() {
    let (app, objects, records) = setup();

    let response = app.oneshot(mug_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Product created successfully");

    let product = &json["product"];
    assert_eq!(product["name"], "Mug");
    assert_eq!(product["price"], 9.99);
    assert!(product["id"].as_str().is_some());
    assert_eq!(product["createdAt"], product["updatedAt"]);

    let image_url = product["imageUrl"].as_str().unwrap();
    assert!(image_url.ends_with(".png"));

    // The uploaded bytes are retrievable under the key in the URL.
    let key = ObjectKey::new(image_url.splitn(4, '/').nth(3).unwrap());
    let stored = objects.get_object(&key).await.unwrap();
    assert_eq!(stored.bytes, b"fake png bytes");
    assert_eq!(records.record_count().await, 1);
}

#[tokio::test]
async fn test_create_with_empty_name_is_rejected() {
    let (app, objects, records) = setup();

    let response = app
        .oneshot(create_request(serde_json::json!({
            "name": "",
            "description": "Ceramic mug",
            "price": 9.99,
            "imageData": png_data_url(b"bytes"),
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["message"].as_str().unwrap().contains("name"));

    assert_eq!(objects.object_count().await, 0);
    assert_eq!(records.record_count().await, 0);
}

#[tokio::test]
async fn test_create_with_negative_price_is_rejected() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(create_request(serde_json::json!({
            "name": "Mug",
            "description": "Ceramic mug",
            "price": -1.0,
            "imageData": png_data_url(b"bytes"),
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_invalid_base64_is_rejected() {
    let (app, objects, _) = setup();

    let response = app
        .oneshot(create_request(serde_json::json!({
            "name": "Mug",
            "description": "Ceramic mug",
            "price": 9.99,
            "imageData": "data:image/png;base64,!!! not base64 !!!",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(objects.object_count().await, 0);
}

#[tokio::test]
async fn test_create_upload_failure_returns_500() {
    let (app, objects, records) = setup();
    objects.set_fail_on_put(true).await;

    let response = app.oneshot(mug_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(records.record_count().await, 0);
}

#[tokio::test]
async fn test_list_on_empty_store_returns_empty_array() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_returns_newest_first() {
    let (app, _, _) = setup();

    for name in ["first", "second"] {
        let response = app
            .clone()
            .oneshot(create_request(serde_json::json!({
                "name": name,
                "description": "test",
                "price": 1.0,
                "imageData": png_data_url(b"bytes"),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        // Keep createdAt timestamps distinct.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = json_body(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["second", "first"]);
}

#[tokio::test]
async fn test_list_scan_failure_returns_500() {
    let (app, _, records) = setup();
    records.set_fail_on_scan(true).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_delete_fetch_failure_returns_500() {
    let (app, _, records) = setup();

    let create_response = app.clone().oneshot(mug_request()).await.unwrap();
    let created = json_body(create_response).await;
    let id = created["product"]["id"].as_str().unwrap().to_string();

    records.set_fail_on_get(true).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(records.record_count().await, 1);
}

#[tokio::test]
async fn test_delete_unknown_product_returns_404() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/products/00000000-0000-0000-0000-000000000001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_malformed_id_returns_400() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/products/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_then_delete_removes_record_and_image() {
    let (app, objects, records) = setup();

    let create_response = app.clone().oneshot(mug_request()).await.unwrap();
    let created = json_body(create_response).await;
    let id = created["product"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Product deleted successfully");
    assert_eq!(json["productId"], id);

    assert_eq!(records.record_count().await, 0);
    assert_eq!(objects.object_count().await, 0);
}

#[tokio::test]
async fn test_delete_tolerates_object_store_failure() {
    let (app, objects, records) = setup();

    let create_response = app.clone().oneshot(mug_request()).await.unwrap();
    let created = json_body(create_response).await;
    let id = created["product"]["id"].as_str().unwrap().to_string();

    objects.set_fail_on_delete(true).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Image delete failures are swallowed; the record is still removed.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(records.record_count().await, 0);
    assert_eq!(objects.object_count().await, 1);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
