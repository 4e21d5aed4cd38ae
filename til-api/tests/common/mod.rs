//! Common test utilities for integration tests
//!
//! Each [`TestContext`] owns a fresh in-memory store, the full router, and a
//! logged-in admin user, so tests run without a database and never share
//! state.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use std::sync::Arc;
use til_api::{
    app::{build_router, AppState},
    config::{AdminConfig, ApiConfig, Config, LogFormat, StoreBackend, StoreConfig},
};
use til_shared::{
    services::users::UserService,
    store::{memory::MemoryStore, Store},
};
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password-for-tests";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub store: Arc<dyn Store>,
    pub user_id: String,
    pub token: String,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            hsts: false,
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
        },
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
        log_format: LogFormat::Pretty,
    }
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

impl TestContext {
    /// Fresh store, admin bootstrapped, token obtained through the login route
    pub async fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        UserService::new(store.clone())
            .ensure_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("admin bootstrap");

        let app = build_router(AppState::new(store.clone(), test_config()));

        let (status, token) = send(
            &app,
            Method::POST,
            "/api/users/login",
            Some(basic(ADMIN_USERNAME, ADMIN_PASSWORD)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", token);

        Self {
            app,
            store,
            user_id: token["user_id"].as_str().expect("user_id").to_string(),
            token: token["value"].as_str().expect("token value").to_string(),
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.app, Method::GET, uri, None, None).await
    }

    /// Request authenticated with the admin's bearer token
    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.app, method, uri, Some(bearer(&self.token)), body).await
    }

    /// Request with no `Authorization` header
    pub async fn anonymous(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.app, method, uri, None, body).await
    }

    pub async fn create_acronym(&self, short: &str, long: &str) -> Value {
        let (status, body) = self
            .authed(
                Method::POST,
                "/api/acronyms",
                Some(serde_json::json!({ "short": short, "long": long })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create acronym failed: {}", body);
        body
    }

    pub async fn create_category(&self, name: &str) -> Value {
        let (status, body) = self
            .authed(
                Method::POST,
                "/api/categories",
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create category failed: {}", body);
        body
    }

    /// Creates a user through the API and logs them in, returning the token
    pub async fn create_user_and_login(&self, username: &str, password: &str) -> (Value, String) {
        let (status, user) = self
            .authed(
                Method::POST,
                "/api/users",
                Some(serde_json::json!({
                    "name": format!("{} tester", username),
                    "username": username,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {}", user);

        let (status, token) = send(
            &self.app,
            Method::POST,
            "/api/users/login",
            Some(basic(username, password)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", token);

        (user, token["value"].as_str().expect("token value").to_string())
    }
}

/// Sends one request through the router; empty bodies decode as `Null`
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<String>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}
