//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use list_cache::{api::create_router, AppState, Driver};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(Driver::Redis, 3))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, body_to_json(response.into_body()).await)
}

fn fake_list() -> Value {
    let elements: Vec<Value> = (1..=10)
        .map(|i| json!({"id": i, "title": format!("Fake title {}", i)}))
        .collect();
    json!({
        "elements": elements,
        "options": {
            "uuid": "fake-list",
            "element-uuid": "id",
            "headers": {"expires": "Sat, 26 Jul 1997 05:00:00 GMT"}
        }
    })
}

// == Create Endpoint Tests ==

#[tokio::test]
async fn test_create_endpoint_success() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/lists", Some(fake_list())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["uuid"], "fake-list");
    assert_eq!(json["elements"].as_object().unwrap().len(), 10);
    assert_eq!(json["elements"]["3"]["title"], "Fake title 3");
}

#[tokio::test]
async fn test_create_generates_list_id() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/lists", Some(json!({"elements": [1, 2]}))).await;

    assert_eq!(status, StatusCode::CREATED);
    let uuid = json["uuid"].as_str().unwrap().to_string();
    let (status, _) = send(&app, "GET", &format!("/lists/{}", uuid), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_duplicate_conflict() {
    let app = create_test_app();
    send(&app, "POST", "/lists", Some(fake_list())).await;

    let (status, json) = send(&app, "POST", "/lists", Some(fake_list())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("fake-list"));
}

#[tokio::test]
async fn test_create_unknown_option() {
    let app = create_test_app();
    let body = json!({"elements": [1], "options": {"not-allowed": true}});

    let (status, json) = send(&app, "POST", "/lists", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_create_reserved_element_id() {
    let app = create_test_app();
    let body = json!({
        "elements": [{"id": "a:b"}],
        "options": {"element-uuid": "id"}
    });

    let (status, _) = send(&app, "POST", "/lists", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Element Endpoint Tests ==

#[tokio::test]
async fn test_element_lifecycle() {
    let app = create_test_app();
    send(&app, "POST", "/lists", Some(fake_list())).await;

    let (status, json) = send(&app, "GET", "/lists/fake-list/elements/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["body"]["title"], "Fake title 7");

    let (status, json) = send(
        &app,
        "PATCH",
        "/lists/fake-list/elements/7",
        Some(json!({"title": "Changed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["body"], json!({"id": 7, "title": "Changed"}));

    let (status, _) = send(&app, "DELETE", "/lists/fake-list/elements/7", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/lists/fake-list/elements/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, "GET", "/lists/fake-list/counter", None).await;
    assert_eq!(json["size"], 9);
}

#[tokio::test]
async fn test_push_element() {
    let app = create_test_app();
    send(&app, "POST", "/lists", Some(fake_list())).await;

    let body = json!({"uuid": "11", "body": {"id": 11, "title": "Fake title 11"}});
    let (status, json) = send(&app, "POST", "/lists/fake-list/elements", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["uuid"], "11");

    let (_, json) = send(&app, "GET", "/index/fake-list", None).await;
    assert_eq!(json["size"], 11);
    assert_eq!(json["chunks"], 4);
}

#[tokio::test]
async fn test_push_to_missing_list() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/lists/nowhere/elements",
        Some(json!({"body": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == List Endpoint Tests ==

#[tokio::test]
async fn test_headers_and_ttl() {
    let app = create_test_app();
    send(&app, "POST", "/lists", Some(fake_list())).await;

    let (status, json) = send(&app, "GET", "/lists/fake-list/headers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["headers"]["expires"], "Sat, 26 Jul 1997 05:00:00 GMT");

    let (status, json) = send(&app, "PUT", "/lists/fake-list/ttl", Some(json!({"ttl": 7200}))).await;
    assert_eq!(status, StatusCode::OK);
    let ttl = json["ttl"].as_u64().unwrap();
    assert!(ttl > 7190 && ttl <= 7200);
}

#[tokio::test]
async fn test_zero_ttl_rejected() {
    let app = create_test_app();
    send(&app, "POST", "/lists", Some(fake_list())).await;

    let (status, _) = send(&app, "PUT", "/lists/fake-list/ttl", Some(json!({"ttl": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/lists/fake-list", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_list() {
    let app = create_test_app();
    send(&app, "POST", "/lists", Some(fake_list())).await;

    let (status, json) = send(&app, "DELETE", "/lists/fake-list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("fake-list"));

    let (status, _) = send(&app, "GET", "/lists/fake-list", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_and_flush() {
    let app = create_test_app();
    send(&app, "POST", "/lists", Some(fake_list())).await;

    let (status, json) = send(&app, "GET", "/index", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fake-list"]["chunks"], 4);

    let (status, _) = send(&app, "POST", "/flush", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = send(&app, "GET", "/index", None).await;
    assert!(json.as_object().unwrap().is_empty());
}

// == Stats and Health Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["total_keys"].is_number());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["driver"], "redis");
}

// == Error Response Tests ==

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/lists")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
