//! Tests for signup, login, profile updates and the admin surface

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{get, post, put, send, setup_test_app, setup_test_app_with, test_config};
use travelaura::config::Config;

fn signup_payload(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "phone": "9876543210",
        "address": "12 Beach Road",
        "password": "hunter22",
    })
}

#[tokio::test]
async fn test_signup_success() {
    let (app, _temp_db) = setup_test_app();

    let (status, body) = post(&app, "/signup", signup_payload("asha", "asha@example.com")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered!");
    assert_eq!(body["user"]["username"], "asha");
    assert_eq!(body["user"]["email"], "asha@example.com");
    assert!(body["user"]["_id"].as_str().is_some_and(|id| id.len() == 24));
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_signup_missing_field() {
    let (app, _temp_db) = setup_test_app();

    let mut payload = signup_payload("asha", "asha@example.com");
    payload["phone"] = json!("   ");

    let (status, body) = post(&app, "/signup", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn test_signup_duplicate_username_or_email() {
    let (app, _temp_db) = setup_test_app();
    post(&app, "/signup", signup_payload("asha", "asha@example.com")).await;

    let (status, body) = post(&app, "/signup", signup_payload("asha", "other@example.com")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username or email already exists");

    // Email comparison ignores case
    let (status, _) = post(&app, "/signup", signup_payload("ravi", "ASHA@example.com")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, users) = get(&app, "/admin/users").await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_login() {
    let (app, _temp_db) = setup_test_app();
    let (_, created) = post(&app, "/signup", signup_payload("asha", "asha@example.com")).await;

    let (status, body) = post(
        &app,
        "/login",
        json!({ "username": "asha", "password": "hunter22" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["_id"], created["user"]["_id"]);
    assert!(body["user"].get("password").is_none());

    let (status, body) = post(
        &app,
        "/login",
        json!({ "username": "asha", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = post(
        &app,
        "/login",
        json!({ "username": "nobody", "password": "hunter22" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login() {
    let (app, _temp_db) = setup_test_app();

    let (status, body) = post(
        &app,
        "/admin/login",
        json!({ "username": "admin", "password": "admin123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"]["_id"], "static-admin-001");
    assert_eq!(body["admin"]["email"], "admin@travelaura.com");
    assert!(body["admin"].get("password").is_none());

    let (status, body) = post(
        &app,
        "/admin/login",
        json!({ "username": "admin", "password": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid admin credentials");
}

#[tokio::test]
async fn test_admin_login_uses_configured_credentials() {
    let mut config = test_config();
    config.admin.username = "root".to_string();
    config.admin.password = "s3cret".to_string();
    let (app, _temp_db) = setup_test_app_with(config);

    let (status, _) = post(
        &app,
        "/admin/login",
        json!({ "username": "admin", "password": "admin123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(
        &app,
        "/admin/login",
        json!({ "username": "root", "password": "s3cret" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile() {
    let (app, _temp_db) = setup_test_app();
    let (_, created) = post(&app, "/signup", signup_payload("asha", "asha@example.com")).await;
    let id = created["user"]["_id"].as_str().unwrap();

    let (status, body) = put(
        &app,
        &format!("/api/users/{id}"),
        json!({
            "username": "asha_k",
            "email": "asha.k@example.com",
            "phone": "111",
            "address": "7 Hill View",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["user"]["username"], "asha_k");
    assert_eq!(body["user"]["address"], "7 Hill View");

    // The password is untouched and the new username is usable
    let (status, _) = post(
        &app,
        "/login",
        json!({ "username": "asha_k", "password": "hunter22" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The old username and email are free again
    let (status, _) = post(&app, "/signup", signup_payload("asha", "asha@example.com")).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_profile_conflict() {
    let (app, _temp_db) = setup_test_app();
    let (_, first) = post(&app, "/signup", signup_payload("asha", "asha@example.com")).await;
    post(&app, "/signup", signup_payload("ravi", "ravi@example.com")).await;
    let id = first["user"]["_id"].as_str().unwrap();

    let (status, _) = put(
        &app,
        &format!("/api/users/{id}"),
        json!({
            "username": "asha",
            "email": "Ravi@Example.com",
            "phone": "111",
            "address": "x",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Keeping one's own username is not a conflict
    let (status, _) = put(
        &app,
        &format!("/api/users/{id}"),
        json!({
            "username": "asha",
            "email": "asha@example.com",
            "phone": "222",
            "address": "y",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile_errors() {
    let (app, _temp_db) = setup_test_app();

    let full = json!({
        "username": "ghost",
        "email": "ghost@example.com",
        "phone": "1",
        "address": "nowhere",
    });
    let (status, body) = put(&app, "/api/users/missing", full).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = put(&app, "/api/users/missing", json!({ "username": "ghost" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_users_hide_passwords() {
    let (app, _temp_db) = setup_test_app();
    post(&app, "/signup", signup_payload("asha", "asha@example.com")).await;
    post(&app, "/signup", signup_payload("ravi", "ravi@example.com")).await;

    let (status, users) = get(&app, "/admin/users").await;

    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn test_admin_guard_with_key() {
    let config = Config {
        admin_key: Some("secret".to_string()),
        ..test_config()
    };
    let (app, _temp_db) = setup_test_app_with(config);

    let (status, body) = get(&app, "/admin/users").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, "GET", "/admin/bookings", None, &[("authorization", "wrong")]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "GET",
        "/admin/destinations",
        None,
        &[("authorization", "secret")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    // Login stays reachable without the key
    let (status, _) = post(
        &app,
        "/admin/login",
        json!({ "username": "admin", "password": "admin123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
