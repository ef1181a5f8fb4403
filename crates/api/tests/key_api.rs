//! HTTP-level integration tests for developer-key lifecycle.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_key, post_json};
use sqlx::PgPool;

/// Creating a key returns the plaintext secret exactly once, plus ids.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_key_returns_secret_once(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        &app,
        "/api/v1/developer-keys",
        serde_json::json!({ "owner_subject": "integrator-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let secret = json["key_secret"].as_str().unwrap();
    assert_eq!(secret.len(), 48);
    assert!(json["key_id"].is_number());
    assert_eq!(json["key_prefix"].as_str().unwrap(), &secret[..8]);

    // The secret never lands in the database, only its Argon2id hash.
    let stored: String =
        sqlx::query_scalar("SELECT secret_hash FROM developer_keys WHERE id = $1")
            .bind(json["key_id"].as_i64().unwrap())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(stored.starts_with("$argon2id$"));
    assert!(!stored.contains(secret));
}

/// Creating a key with an empty owner fails validation.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_key_empty_owner_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/developer-keys",
        serde_json::json!({ "owner_subject": "  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Revocation succeeds, is idempotent, and writes a single audit entry.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_revoke_key_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (key_id, _secret) = create_key(&app, "integrator-1").await;

    let body = serde_json::json!({ "owner_subject": "integrator-1" });

    let response = post_json(
        &app,
        &format!("/api/v1/developer-keys/{key_id}/revoke"),
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "revoked");

    // Second revoke: still a success.
    let response = post_json(
        &app,
        &format!("/api/v1/developer-keys/{key_id}/revoke"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Only the actual transition is audited.
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_entries WHERE event_name = 'key_revoked' AND target_id = $1",
    )
    .bind(key_id.to_string())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

/// Revoking with the wrong owner is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_revoke_key_wrong_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (key_id, _secret) = create_key(&app, "integrator-1").await;

    let response = post_json(
        &app,
        &format!("/api/v1/developer-keys/{key_id}/revoke"),
        serde_json::json!({ "owner_subject": "someone-else" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Revoking an unknown key is a 404, not a silent success.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_revoke_unknown_key(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/developer-keys/999999/revoke",
        serde_json::json!({ "owner_subject": "anyone" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Granting an undefined scope fails before touching the ledger.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_grant_unknown_scope_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (key_id, _secret) = create_key(&app, "integrator-1").await;

    let response = post_json(
        &app,
        &format!("/api/v1/developer-keys/{key_id}/scopes"),
        serde_json::json!({ "scope": "never.defined", "action": "grant", "conditionType": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scope_grants")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

/// Effective scopes reflect grant-then-revoke immediately.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_effective_scopes_live(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (key_id, _secret) = create_key(&app, "integrator-1").await;
    common::define_and_grant_scope(&app, key_id, "spell.check").await;
    common::define_and_grant_scope(&app, key_id, "ledger.read").await;

    let response = common::get(&app, &format!("/api/v1/developer-keys/{key_id}/scopes")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let scopes = body_json(response).await["scopes"].clone();
    assert_eq!(scopes, serde_json::json!(["ledger.read", "spell.check"]));

    let response = post_json(
        &app,
        &format!("/api/v1/developer-keys/{key_id}/scopes"),
        serde_json::json!({ "scope": "ledger.read", "action": "revoke", "conditionType": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = common::get(&app, &format!("/api/v1/developer-keys/{key_id}/scopes")).await;
    let scopes = body_json(response).await["scopes"].clone();
    assert_eq!(scopes, serde_json::json!(["spell.check"]));
}
