//! HTTP API tests driving the router directly.

#![cfg(feature = "http-server")]

mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crm_statistics::config::AppConfig;
use crm_statistics::http::{create_router, AppState};
use support::seeded_repository;

fn app() -> axum::Router {
    let state = AppState::with_repository(&AppConfig::default(), seeded_repository());
    create_router(state)
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn percent_encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("connected"));
}

#[tokio::test]
async fn test_list_statistics() {
    let (status, body) = send(get("/v1/statistics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"], json!(["accounts-new-by-month"]));
    assert_eq!(body["total"], json!(1));
}

#[tokio::test]
async fn test_get_statistic() {
    let (status, body) = send(get("/v1/statistics/accounts-new-by-month?module=accounts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], json!("accounts-new-by-month"));
    assert_eq!(body["series"][0]["name"], json!("Customer"));
    assert_eq!(body["series"][0]["points"][10], json!([11, 1]));
}

#[tokio::test]
async fn test_get_statistic_with_criteria() {
    let criteria = percent_encode(
        r#"{"filters":{"account_type":{"operator":"=","values":["Customer"]}}}"#,
    );
    let uri = format!(
        "/v1/statistics/accounts-new-by-month?module=accounts&criteria={}",
        criteria
    );

    let (status, body) = send(get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["series"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_statistic_rejects_bad_criteria() {
    let (status, body) = send(get(
        "/v1/statistics/accounts-new-by-month?module=accounts&criteria=%5B1%5D",
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_post_statistic() {
    let (status, body) = send(post_json(
        "/v1/statistics/accounts-new-by-month",
        r#"{"module": "leads", "id": ""}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "key": "accounts-new-by-month",
            "dataType": "int",
            "series": [],
            "options": {"xAxisTicks": [], "yAxisTickFormatting": false}
        })
    );
}

#[tokio::test]
async fn test_post_statistic_requires_object_body() {
    let (status, _) = send(post_json("/v1/statistics/accounts-new-by-month", "[1, 2]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_statistic_is_404() {
    let (status, body) = send(get("/v1/statistics/nope?module=accounts")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_store_failure_is_503() {
    let repo = seeded_repository();
    repo.set_healthy(false);
    let router = create_router(AppState::with_repository(&AppConfig::default(), repo));

    let response = router
        .oneshot(get("/v1/statistics/accounts-new-by-month?module=accounts"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_user_preferences() {
    let (status, body) = send(get("/v1/user-preferences/global")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!("global"));
    assert_eq!(body["items"]["date_format"], json!("MM/dd/yyyy"));

    let (status, _) = send(get("/v1/user-preferences/dbconfig")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
