//! Integration tests for the guest registry endpoints.
//!
//! Run with: cargo test --test guests_integration

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{
    create_test_app, get_request, json_request, parse_response_body, registration_body,
    test_config,
};
use guestlist_api::config::Config;
use persistence::MemoryStore;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_returns_record_and_referral_material() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    let response = app
        .oneshot(json_request(Method::POST, "/api/guests", registration_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["inviterName"], "Raphael");
    // Phone is stored digits-only.
    assert_eq!(body["data"]["phone"], "501234567");
    assert_eq!(body["data"]["countryCode"], "971");

    // The response mints the next hop of the referral chain.
    let slug = body["referralSlug"].as_str().unwrap();
    assert!(slug.starts_with("anna-lee-"));
    let token = body["inviteToken"].as_str().unwrap();
    let invitee = shared::invite_token::decode(token).unwrap();
    assert_eq!(invitee.name, "Anna Lee");
    assert_eq!(invitee.phone, "501234567");

    // Header plus exactly one data row landed in the default event's sheet.
    let rows = store.rows("sheet-opening-night").await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "Inviter Name");
    assert_eq!(rows[1][3], "501234567");
}

#[tokio::test]
async fn test_register_same_phone_again_conflicts() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    let first = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/guests", registration_body()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // Same phone and country code, different formatting.
    let mut retry = registration_body();
    retry["phone"] = json!("5012 34 567");
    let second = app
        .oneshot(json_request(Method::POST, "/api/guests", retry))
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = parse_response_body(second).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "You have already RSVP'd for this event");
    assert_eq!(body["duplicate"], true);

    // Row count unchanged: header plus the single original registration.
    assert_eq!(store.rows("sheet-opening-night").await.len(), 2);
}

#[tokio::test]
async fn test_register_same_phone_other_country_code_succeeds() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    app.clone()
        .oneshot(json_request(Method::POST, "/api/guests", registration_body()))
        .await
        .unwrap();

    let mut other = registration_body();
    other["countryCode"] = json!("1");
    let response = app
        .oneshot(json_request(Method::POST, "/api/guests", other))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.rows("sheet-opening-night").await.len(), 3);
}

#[tokio::test]
async fn test_register_blank_required_field_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    let mut invalid = registration_body();
    invalid["firstName"] = json!("   ");
    let response = app
        .oneshot(json_request(Method::POST, "/api/guests", invalid))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);

    // No store access happened.
    assert!(store.rows("sheet-opening-night").await.is_empty());
}

#[tokio::test]
async fn test_register_unknown_store_ref_is_server_error() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    let mut request = registration_body();
    request["storeRef"] = json!("no-such-event");
    let response = app
        .oneshot(json_request(Method::POST, "/api/guests", request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Event registry is not configured");
}

#[tokio::test]
async fn test_register_explicit_store_ref_targets_that_event() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    let mut request = registration_body();
    request["storeRef"] = json!("closing-party");
    let response = app
        .oneshot(json_request(Method::POST, "/api/guests", request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.rows("sheet-closing-party").await.len(), 2);
    assert!(store.rows("sheet-opening-night").await.is_empty());
}

#[tokio::test]
async fn test_register_succeeds_while_reads_are_degraded() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    // Dedup goes blind but registration stays available.
    store.set_fail_reads(true);
    let response = app
        .oneshot(json_request(Method::POST, "/api/guests", registration_body()))
        .await
        .unwrap();
    store.set_fail_reads(false);

    assert_eq!(response.status(), StatusCode::OK);
    let rows = store.rows("sheet-opening-night").await;
    assert_eq!(rows.last().unwrap()[3], "501234567");
}

#[tokio::test]
async fn test_register_append_failure_is_honest_server_error() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store.clone());

    store.set_fail_writes(true);
    let response = app
        .oneshot(json_request(Method::POST, "/api/guests", registration_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to process RSVP. Please try again.");
}

#[tokio::test]
async fn test_list_guests_counts_registrations() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app(test_config(), store);

    app.clone()
        .oneshot(json_request(Method::POST, "/api/guests", registration_body()))
        .await
        .unwrap();
    let mut second = registration_body();
    second["firstName"] = json!("Omar");
    second["phone"] = json!("502222222");
    app.clone()
        .oneshot(json_request(Method::POST, "/api/guests", second))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/guests"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // The other event's registry is independent and still empty.
    let other = app
        .oneshot(get_request("/api/guests?storeRef=closing-party"))
        .await
        .unwrap();
    let body = parse_response_body(other).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_registry_rate_limit_applies_per_client() {
    let config = Config::load_for_test(&[("security.rate_limit_per_minute", "1")]).unwrap();
    let app = create_test_app(config, Arc::new(MemoryStore::new()));

    let limited_request = |phone: &str| {
        let mut body = registration_body();
        body["phone"] = json!(phone);
        Request::builder()
            .method(Method::POST)
            .uri("/api/guests")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let first = app.clone().oneshot(limited_request("501234567")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(limited_request("502222222")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key(header::RETRY_AFTER));
}
