//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for HTTP tests:
//! - A router backed by a freshly seeded in-memory store
//! - Login helpers returning bearer tokens
//! - A request helper returning status and JSON body

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use notesaas_api::{
    app::{build_router, AppState},
    config::Config,
};
use notesaas_shared::{
    seed::{seed_demo_data, DEMO_PASSWORD},
    store::{memory::MemoryStore, Store},
};
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with the demo tenants and users
    pub async fn new() -> anyhow::Result<Self> {
        let vars: HashMap<&str, &str> = [
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", JWT_SECRET),
            ("SEED_DEMO_DATA", "true"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))?;

        let store = Arc::new(MemoryStore::new());
        seed_demo_data(store.as_ref()).await?;

        let state = AppState::new(store.clone() as Arc<dyn Store>, config.clone());
        let app = build_router(state);

        Ok(TestContext { store, app, config })
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("Non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, value)
    }

    /// Logs in with the demo password and returns the token
    pub async fn login(&self, email: &str) -> String {
        self.login_with(email, DEMO_PASSWORD).await
    }

    /// Logs in and returns the token, panicking on failure
    pub async fn login_with(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a note and returns status and body
    pub async fn create_note(&self, token: &str, title: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/notes",
            Some(token),
            Some(json!({ "title": title, "content": format!("{} content", title) })),
        )
        .await
    }
}
