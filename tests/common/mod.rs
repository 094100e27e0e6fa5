//! Shared helpers for the router integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use taskboard_server::auth::{JwtService, PasswordService};
use taskboard_server::config::{PasswordHashConfig, ServerConfig};
use taskboard_server::database::{InMemoryCredentialStore, InMemoryTaskStore};
use taskboard_server::server::{AppState, build_router};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Argon2 at its minimum cost so tests stay fast
pub fn fast_hash_config() -> PasswordHashConfig {
    PasswordHashConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        base_path: String::new(),
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(test_server_config())
}

pub fn create_test_app_with(server: ServerConfig) -> TestApp {
    let state = AppState::new(
        JwtService::new(TEST_SECRET, chrono::Duration::hours(1)),
        PasswordService::new(fast_hash_config()).unwrap(),
        Arc::new(InMemoryCredentialStore::new()),
        Arc::new(InMemoryTaskStore::new()),
    );
    let router = build_router(state.clone(), &server).unwrap();
    TestApp { router, state }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    TestResponse { status, body }
}

pub async fn signup(app: &TestApp, name: &str, email: &str, password: &str) -> TestResponse {
    send(
        app,
        "POST",
        "/signup",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": password })),
    )
    .await
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> TestResponse {
    send(
        app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await
}

/// Sign up and log in, returning the bearer token
pub async fn register_and_login(app: &TestApp, name: &str, email: &str, password: &str) -> String {
    assert_eq!(signup(app, name, email, password).await.status, StatusCode::CREATED);
    let response = login(app, email, password).await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()["token"].as_str().unwrap().to_string()
}
