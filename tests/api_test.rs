//! HTTP flow tests against the in-process store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use todo_api::api::{create_router, AppState};
use todo_api::storage::memory::MemoryStore;

fn test_app() -> Router {
    create_router(AppState::new(Arc::new(MemoryStore::new())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!(
            "non-JSON response: status={} body={}",
            status,
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, json)
}

async fn create(app: &Router, title: &str) -> Value {
    let (status, body) = send(app, "POST", "/todos", Some(json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body["todo"].clone()
}

#[tokio::test]
async fn health_reports_service_and_time() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "api");
    let time = body["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
}

#[tokio::test]
async fn db_probe_returns_store_time() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/db", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["db_time"].is_string());
}

#[tokio::test]
async fn buy_milk_scenario() {
    let app = test_app();

    let todo = create(&app, "buy milk").await;
    assert_eq!(todo["id"], 1);
    assert_eq!(todo["title"], "buy milk");
    assert_eq!(todo["done"], false);
    assert!(todo["created_at"].is_string());

    let (status, body) = send(&app, "GET", "/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["todos"].as_array().unwrap().len(), 1);
    assert_eq!(body["todos"][0], todo);

    let (status, body) = send(&app, "PATCH", "/todos/1", Some(json!({ "done": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["done"], true);
    assert_eq!(body["todo"]["title"], "buy milk");
    assert_eq!(body["todo"]["created_at"], todo["created_at"]);

    let (status, body) = send(&app, "DELETE", "/todos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "deleted": 1 }));

    let (_, body) = send(&app, "GET", "/todos", None).await;
    assert_eq!(body["todos"], json!([]));
}

#[tokio::test]
async fn created_items_are_listed_in_id_order() {
    let app = test_app();
    for title in ["first", "second", "third"] {
        create(&app, title).await;
    }

    let (_, body) = send(&app, "GET", "/todos", None).await;
    let todos = body["todos"].as_array().unwrap();
    let titles: Vec<_> = todos.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
    assert!(todos.iter().all(|t| t["done"] == false));
}

#[tokio::test]
async fn create_without_title_fails_and_creates_nothing() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/todos", Some(json!({ "done": true }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "title is required");

    let (_, body) = send(&app, "GET", "/todos", None).await;
    assert_eq!(body["todos"], json!([]));
}

#[tokio::test]
async fn create_with_malformed_body_uses_error_envelope() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/todos")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn patch_title_only_keeps_done() {
    let app = test_app();
    create(&app, "draft").await;
    send(&app, "PATCH", "/todos/1", Some(json!({ "done": true }))).await;

    let (status, body) = send(&app, "PATCH", "/todos/1", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["title"], "x");
    assert_eq!(body["todo"]["done"], true);
}

#[tokio::test]
async fn empty_patch_returns_current_row() {
    let app = test_app();
    let todo = create(&app, "unchanged").await;

    let (status, body) = send(&app, "PATCH", "/todos/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["todo"], todo);
}

#[tokio::test]
async fn patch_missing_id_is_not_found() {
    let app = test_app();

    let (status, body) = send(&app, "PATCH", "/todos/99", Some(json!({ "done": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "ok": false, "error": "Todo not found" }));

    let (_, body) = send(&app, "GET", "/todos", None).await;
    assert_eq!(body["todos"], json!([]));
}

#[tokio::test]
async fn patch_with_wrong_type_is_rejected() {
    let app = test_app();
    create(&app, "typed").await;

    let (status, body) = send(&app, "PATCH", "/todos/1", Some(json!({ "done": "yes" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);

    let (_, body) = send(&app, "GET", "/todos", None).await;
    assert_eq!(body["todos"][0]["done"], false);
}

#[tokio::test]
async fn delete_twice_reports_one_then_zero() {
    let app = test_app();
    create(&app, "ephemeral").await;

    let (status, body) = send(&app, "DELETE", "/todos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (status, body) = send(&app, "DELETE", "/todos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "deleted": 0 }));
}

#[tokio::test]
async fn non_numeric_id_uses_error_envelope() {
    let app = test_app();

    let (status, body) = send(&app, "DELETE", "/todos/abc", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
}
