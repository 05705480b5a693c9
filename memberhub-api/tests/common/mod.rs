//! Common test utilities for API tests
//!
//! Builds the router over an in-memory store so the HTTP surface can be
//! exercised without a database, and wraps request/response plumbing.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Local};
use memberhub_api::app::{build_router, AppState};
use memberhub_api::config::Config;
use memberhub_shared::repository::InMemoryStore;
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;

/// Test context holding a router over a fresh in-memory store
pub struct TestContext {
    pub app: axum::Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::with_store(store, Config::default());

        TestContext {
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status with the decoded JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a member through the API and returns its ID
    pub async fn create_member(&self, name: &str, email: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/member",
                serde_json::json!({ "name": name, "email": email }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create member failed: {}", body);
        body["newMember"]["id"].as_i64().unwrap()
    }

    /// Creates a membership through the API and returns its ID
    pub async fn create_membership(&self, member_id: i64, start: &str, end: &str) -> i64 {
        let (status, body) = self
            .post(
                &format!("/api/membership/{}", member_id),
                serde_json::json!({ "startDate": start, "endDate": end }),
            )
            .await;
        assert_eq!(
            status,
            StatusCode::CREATED,
            "create membership failed: {}",
            body
        );
        body["newMembership"]["id"].as_i64().unwrap()
    }
}

/// Local date `days` from today, formatted `YYYY-MM-DD`
pub fn date_in_days(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
