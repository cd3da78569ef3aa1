//! Common test utilities for rentdesk integration tests
//!
//! This file contains shared functions for all integration tests: building
//! a test application on a private in-memory database, sending requests
//! through the router, and creating the records most tests start from.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rentdesk::{
    config::base_config,
    create_app,
    db::init_pool,
    notify::{Email, Mailer},
    run_migrations, AppState,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Mailer that keeps every message it is given
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &Email) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

impl RecordingMailer {
    /// Waits until at least `count` messages arrived and returns them
    pub async fn wait_for(&self, count: usize) -> Vec<Email> {
        for _ in 0..100 {
            {
                let sent = self.sent.lock().unwrap();
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} email(s)", count);
    }
}

/// Creates a test application with a fresh in-memory SQLite database
///
/// Every pooled connection shares the same named in-memory database, which
/// lives as long as the pool.
pub fn create_test_app() -> Router {
    create_test_app_with_mailer().0
}

/// Like `create_test_app`, also returning the mailer the app sends through
pub fn create_test_app_with_mailer() -> (Router, Arc<RecordingMailer>) {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = init_pool(&database_url).unwrap();
    run_migrations(&mut pool.get().unwrap()).unwrap();

    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(Arc::new(pool), mailer.clone(), base_config(None));
    (create_app(state), mailer)
}

/// Sends a request through the router
///
/// ### Returns
///
/// The status and the body as JSON; non-JSON bodies come back as a JSON string
pub async fn send(app: &Router, method: &str, uri: &str, tenant: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(tenant) = tenant {
        builder = builder.header("X-Tenant-Id", tenant);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Creates a tenant and returns its ID
pub async fn create_tenant(app: &Router, slug: &str) -> String {
    let (status, tenant) = send(
        app,
        "POST",
        "/tenants",
        None,
        Some(json!({ "name": format!("Tenant {}", slug), "slug": slug })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    tenant["id"].as_str().unwrap().to_string()
}

/// Creates a vehicle and returns its ID
pub async fn create_item(app: &Router, tenant: &str, name: &str, daily_rate: f64) -> String {
    let (status, item) = send(
        app,
        "POST",
        "/items",
        Some(tenant),
        Some(json!({ "kind": "vehicle", "name": name, "daily_rate": daily_rate })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    item["id"].as_str().unwrap().to_string()
}

/// Creates a customer with an email address and returns its ID
pub async fn create_customer(app: &Router, tenant: &str, name: &str) -> String {
    let (status, customer) = send(
        app,
        "POST",
        "/customers",
        Some(tenant),
        Some(json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    customer["id"].as_str().unwrap().to_string()
}

/// Attempts to book an item, returning the raw response
pub async fn create_booking(app: &Router, tenant: &str, item_id: &str, customer_id: &str, start: &str, end: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/bookings",
        Some(tenant),
        Some(json!({
            "item_id": item_id,
            "customer_id": customer_id,
            "start_date": start,
            "end_date": end,
        })),
    )
    .await
}

/// Moves a booking to a new status, returning the raw response
pub async fn set_status(app: &Router, tenant: &str, booking_id: &str, status: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/bookings/{}/status", booking_id),
        Some(tenant),
        Some(json!({ "status": status })),
    )
    .await
}
