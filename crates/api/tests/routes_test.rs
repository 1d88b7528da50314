//! Integration tests for the HTTP routes: auth flow, validation and message persistence.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use parley_api::{create_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "routes-test-secret-at-least-32-characters";

fn app() -> (Router, AppState) {
    let state = AppState::new(Config::for_secret(SECRET));
    (create_router(state.clone()), state)
}

async fn call(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn signup(app: &Router, name: &str, email: &str) -> (String, String) {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "fullName": name, "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

    (
        body["user"]["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();

    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["onlineUsers"], 0);
    assert_eq!(body["connections"], 0);

    let (status, _) = call(&app, "GET", "/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_login_check() {
    let (app, _) = app();
    let (user_id, token) = signup(&app, "Ada Lovelace", "ada@example.com").await;

    let (status, body) = call(&app, "GET", "/api/auth/check", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["fullName"], "Ada Lovelace");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ADA@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert!(body["token"].as_str().is_some());

    let (status, body) = call(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");
}

#[tokio::test]
async fn test_signup_validation() {
    let (app, _) = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "fullName": "", "email": "ada@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "fullName": "Ada", "email": "ada@example.com", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    signup(&app, "Ada", "ada@example.com").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "fullName": "Ada Again", "email": "ada@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "EMAIL_EXISTS");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _) = app();
    signup(&app, "Ada", "ada@example.com").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _) = app();

    let (status, _) = call(&app, "GET", "/api/auth/check", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, "GET", "/api/messages/users", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_send_and_fetch_messages() {
    let (app, state) = app();
    let (ada_id, ada_token) = signup(&app, "Ada", "ada@example.com").await;
    let (bob_id, bob_token) = signup(&app, "Bob", "bob@example.com").await;

    let (status, body) = call(&app, "GET", "/api/messages/users", Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], bob_id.as_str());

    // Bob is offline: sending still succeeds
    let (status, sent) = call(
        &app,
        "POST",
        &format!("/api/messages/send/{bob_id}"),
        Some(&ada_token),
        Some(json!({ "text": "hi bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["senderId"], ada_id.as_str());
    assert_eq!(sent["receiverId"], bob_id.as_str());
    assert_eq!(sent["seen"], false);

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/messages/send/{ada_id}"),
        Some(&bob_token),
        Some(json!({ "text": "hi ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Pull-style history from either side
    let (status, body) = call(&app, "GET", &format!("/api/messages/{ada_id}"), Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["hi bob", "hi ada"]);

    assert_eq!(state.messages.count().await, 2);
}

#[tokio::test]
async fn test_send_message_validation() {
    let (app, _) = app();
    let (_, ada_token) = signup(&app, "Ada", "ada@example.com").await;
    let (bob_id, _) = signup(&app, "Bob", "bob@example.com").await;

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/messages/send/{bob_id}"),
        Some(&ada_token),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/messages/send/{}", uuid::Uuid::new_v4()),
        Some(&ada_token),
        Some(json!({ "text": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // No image host configured
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/messages/send/{bob_id}"),
        Some(&ada_token),
        Some(json!({ "image": "data:image/png;base64,iVBORw0KGgo=" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UPLOAD_UNAVAILABLE");
}

#[tokio::test]
async fn test_update_profile_uploads_image() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/upload")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"secure_url":"https://img.example/ada.png"}"#)
        .create_async()
        .await;

    let mut config = Config::for_secret(SECRET);
    config.image_upload_url = Some(format!("{}/upload", server.url()));
    let app = create_router(AppState::new(config));

    let (_, token) = signup(&app, "Ada", "ada@example.com").await;

    let (status, _) = call(
        &app,
        "PUT",
        "/api/auth/update-profile",
        Some(&token),
        Some(json!({ "profilePic": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "PUT",
        "/api/auth/update-profile",
        Some(&token),
        Some(json!({ "profilePic": "data:image/png;base64,iVBORw0KGgo=" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profilePic"], "https://img.example/ada.png");
}
