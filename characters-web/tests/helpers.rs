//! Integration test helpers
//!
//! Builds the full application router over an in-process table and drives it
//! with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use characters_core::AppConfig;
use characters_store::{DocumentTable, MemoryTable};
use characters_web::{create_app, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const SECRET: &str = "integration-secret";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.secret = SECRET.to_string();
    config.auth.username = USER.to_string();
    config.auth.password = PASSWORD.to_string();
    config
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_table(Arc::new(MemoryTable::new()))
    }

    pub fn with_table(table: Arc<dyn DocumentTable>) -> Self {
        let state = AppState::with_table(test_config(), table);
        Self {
            router: create_app(state.clone()),
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body.");
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn post_login(&self, user: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/login",
            Some(serde_json::json!({"user": user, "password": password})),
            None,
        )
        .await
    }

    /// Log in with the configured credentials and return the token
    pub async fn login(&self) -> String {
        let response = self.post_login(USER, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }

    /// Create a character and return the id parsed from the confirmation message
    pub async fn create_character(&self, token: &str, body: Value) -> String {
        let response = self
            .request("POST", "/characters", Some(body), Some(token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["message"]
            .as_str()
            .and_then(|m| m.strip_prefix("character added with id "))
            .expect("confirmation carries the id")
            .to_string()
    }
}
