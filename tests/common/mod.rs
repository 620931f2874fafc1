//! Shared helpers for the integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use travelaura::config::Config;
use travelaura::database::{init_db, AppState};
use travelaura::route::create_app;

/// Default configuration with a cheap bcrypt cost
pub fn test_config() -> Config {
    Config {
        bcrypt_cost: 4,
        ..Config::default()
    }
}

/// Creates a test application backed by a temporary database file
pub fn setup_test_app() -> (Router, NamedTempFile) {
    setup_test_app_with(test_config())
}

pub fn setup_test_app_with(config: Config) -> (Router, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap();
    let db = init_db(db_path).expect("Failed to initialize test database");
    (create_app(AppState::new(db, config)), temp_db)
}

/// Parses a response body as JSON, `Null` for an empty body
pub async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// Sends a raw body through the router
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: &str,
    body: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, response_json(response.into_body()).await)
}

/// Sends one request through the router
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, response_json(response.into_body()).await)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, &[]).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body), &[]).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body), &[]).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None, &[]).await
}

/// `YYYY-MM-DD` for today plus `offset` days
pub fn day(offset: i64) -> String {
    (Utc::now() + Duration::days(offset))
        .format("%Y-%m-%d")
        .to_string()
}

/// Creates a destination and returns its id
pub async fn create_destination(app: &Router, name: &str, kind: &str, rating: f64) -> String {
    let (status, body) = post(
        app,
        "/destinations",
        json!({
            "name": name,
            "type": kind,
            "rating": rating,
            "description": format!("{name} description"),
            "imageUrl": format!("{}.jpg", name.to_lowercase()),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["destination"]["_id"].as_str().unwrap().to_string()
}

/// Creates a booking and returns the response body
pub async fn create_booking(
    app: &Router,
    user_id: &str,
    destination_id: &str,
    start_offset: i64,
    end_offset: i64,
) -> Value {
    let (status, body) = post(
        app,
        "/api/bookings",
        json!({
            "userId": user_id,
            "destination": destination_id,
            "startDate": day(start_offset),
            "endDate": day(end_offset),
            "travelers": 2,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body
}
