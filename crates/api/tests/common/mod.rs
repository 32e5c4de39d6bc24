//! Common test utilities for integration tests.
//!
//! The integration tests run the full router against the in-memory store
//! backend; no external services are required.

// Allow dead code in this module - these are helper utilities that may not
// be used by all integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use guestlist_api::app::create_app;
use guestlist_api::config::Config;
use persistence::MemoryStore;

/// Test configuration: memory store, two events, rate limiting off.
pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to build test config")
}

/// Create a test application router over the given store.
pub fn create_test_app(config: Config, store: Arc<MemoryStore>) -> Router {
    create_app(config, store)
}

/// Build a JSON request.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodyless GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Parse a response body into JSON.
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

/// Percent-encode a string for use in a query parameter.
pub fn query_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-_.~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{:02X}", b)
            }
        })
        .collect()
}

/// A valid registration payload for the default event.
pub fn registration_body() -> serde_json::Value {
    serde_json::json!({
        "inviterName": "Raphael",
        "firstName": "Anna",
        "lastName": "Lee",
        "phone": "50 123 4567",
        "countryCode": "971",
        "email": "anna@example.com",
        "eventName": "Opening Night"
    })
}
