//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` constructs the production router (same middleware
//! stack as `main.rs`) over a test database pool. Request helpers drive it
//! through `tower::ServiceExt::oneshot`.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use grimoire_api::config::{ServerConfig, TokenConfig};
use grimoire_api::router::build_app_router;
use grimoire_api::state::AppState;

/// Webhook signing secret used by all tests.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        tokens: TokenConfig {
            access_ttl_secs: 3600,
            refresh_ttl_days: 30,
        },
        billing_webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
    }
}

/// Build the full application router over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Send a POST with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Send a POST with a JSON body and a bearer credential.
pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    bearer: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {bearer}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Send a POST with a raw body and arbitrary extra headers.
pub async fn post_raw(
    app: &Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: Vec<u8>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body)).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Domain fixtures
// ---------------------------------------------------------------------------

/// Create a developer key via the API; returns `(key_id, key_secret)`.
pub async fn create_key(app: &Router, owner: &str) -> (i64, String) {
    let response = post_json(
        app,
        "/api/v1/developer-keys",
        serde_json::json!({ "owner_subject": owner }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["key_id"].as_i64().unwrap(),
        json["key_secret"].as_str().unwrap().to_string(),
    )
}

/// Define a scope and grant it to a key via the API.
pub async fn define_and_grant_scope(app: &Router, key_id: i64, scope: &str) {
    let response = post_json(
        app,
        "/api/v1/scopes",
        serde_json::json!({ "scope_key": scope }),
    )
    .await;
    assert!(
        response.status() == StatusCode::CREATED || response.status() == StatusCode::CONFLICT,
        "scope definition should be created or already present"
    );

    let response = post_json(
        app,
        &format!("/api/v1/developer-keys/{key_id}/scopes"),
        serde_json::json!({ "scope": scope, "action": "grant", "conditionType": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Issue tokens for a key secret; returns the parsed response JSON.
pub async fn issue_tokens(app: &Router, secret: &str, scopes: &[&str]) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/v1/tokens",
        secret,
        serde_json::json!({ "scopes": scopes }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Register a spell requiring the given scopes; returns its id.
pub async fn register_spell(app: &Router, sku: &str, required_scopes: &[&str]) -> i64 {
    let response = post_json(
        app,
        "/api/v1/spells",
        serde_json::json!({
            "name": format!("Spell {sku}"),
            "sku": sku,
            "spell_type": "invocation",
            "required_scopes": required_scopes,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Build a signed billing webhook body + signature header value.
pub fn signed_billing_payload(
    event_id: &str,
    event_type: &str,
    spell_id: i64,
    subject: &str,
) -> (Vec<u8>, String) {
    let body = serde_json::json!({
        "event_id": event_id,
        "event_type": event_type,
        "spell_id": spell_id,
        "subject_identifier": subject,
    })
    .to_string()
    .into_bytes();
    let signature = grimoire_core::secrets::compute_billing_signature(TEST_WEBHOOK_SECRET, &body);
    (body, signature)
}
