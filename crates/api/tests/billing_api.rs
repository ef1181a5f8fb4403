//! HTTP-level integration tests for billing webhook ingestion and the
//! reconciliation sweep.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, post_raw, register_spell, signed_billing_payload};
use sqlx::PgPool;

const SIGNATURE_HEADER: &str = "x-billing-signature";

/// A correctly signed delivery is accepted and applied.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ingest_applies_entitlement(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let spell_id = register_spell(&app, "SPL-001", &["spell.check"]).await;

    let (body, signature) =
        signed_billing_payload("evt_1", "entitlement.activated", spell_id, "customer-7");
    let response = post_raw(
        &app,
        "/api/v1/webhooks/billing",
        &[(SIGNATURE_HEADER, signature.as_str())],
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let status: String = sqlx::query_scalar(
        "SELECT status FROM entitlements WHERE spell_id = $1 AND subject_identifier = $2",
    )
    .bind(spell_id)
    .bind("customer-7")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "active");
}

/// A missing or wrong signature rejects the delivery before any storage.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ingest_bad_signature_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let spell_id = register_spell(&app, "SPL-001", &["spell.check"]).await;

    let (body, _signature) =
        signed_billing_payload("evt_1", "entitlement.activated", spell_id, "customer-7");

    let response = post_raw(&app, "/api/v1/webhooks/billing", &[], body.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bad = "0".repeat(64);
    let response = post_raw(
        &app,
        "/api/v1/webhooks/billing",
        &[(SIGNATURE_HEADER, bad.as_str())],
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_SIGNATURE");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM billing_events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "rejected deliveries must not be stored");
}

/// Redelivery of the same event id is ignored and has no further effect.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ingest_duplicate_event_ignored(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let spell_id = register_spell(&app, "SPL-001", &["spell.check"]).await;

    let (body, signature) =
        signed_billing_payload("evt_dup", "entitlement.activated", spell_id, "customer-7");

    let first = post_raw(
        &app,
        "/api/v1/webhooks/billing",
        &[(SIGNATURE_HEADER, signature.as_str())],
        body.clone(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await["status"], "ok");

    // Flip the entitlement off out-of-band so redelivery would be visible.
    sqlx::query("UPDATE entitlements SET status = 'revoked'")
        .execute(&pool)
        .await
        .unwrap();

    let second = post_raw(
        &app,
        "/api/v1/webhooks/billing",
        &[(SIGNATURE_HEADER, signature.as_str())],
        body,
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["status"], "ignored");

    let status: String = sqlx::query_scalar("SELECT status FROM entitlements")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "revoked", "a duplicate must not re-apply its effect");

    let audits: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_entries
         WHERE event_name = 'billing_event_processed' AND target_id = 'evt_dup'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(audits, 1, "at most one audit entry per event id");
}

/// An unknown event type is stored and marked processed without effect.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_ingest_unknown_event_type_no_effect(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let spell_id = register_spell(&app, "SPL-001", &["spell.check"]).await;

    let (body, signature) =
        signed_billing_payload("evt_odd", "invoice.finalized", spell_id, "customer-7");
    let response = post_raw(
        &app,
        "/api/v1/webhooks/billing",
        &[(SIGNATURE_HEADER, signature.as_str())],
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let processed: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT processed_at FROM billing_events WHERE event_id = 'evt_odd'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(processed.is_some(), "the event is settled, not retried forever");

    let entitlements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entitlements")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(entitlements, 0);
}

/// The reconcile sweep re-drives rows that were stored but never applied.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reconcile_processes_backlog(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let spell_id = register_spell(&app, "SPL-001", &["spell.check"]).await;

    // Simulate deliveries that were persisted but crashed before apply.
    for (event_id, subject) in [("evt_a", "customer-1"), ("evt_b", "customer-2")] {
        let payload = serde_json::json!({
            "event_id": event_id,
            "event_type": "entitlement.activated",
            "spell_id": spell_id,
            "subject_identifier": subject,
        });
        sqlx::query("INSERT INTO billing_events (event_id, raw_payload) VALUES ($1, $2)")
            .bind(event_id)
            .bind(payload)
            .execute(&pool)
            .await
            .unwrap();
    }

    let response = post_json(
        &app,
        "/api/v1/webhooks/billing/reconcile",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["processed"], 2);

    let active: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM entitlements WHERE status = 'active'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(active, 2);

    // Nothing left to do: a second sweep is a no-op.
    let response = post_json(
        &app,
        "/api/v1/webhooks/billing/reconcile",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(body_json(response).await["processed"], 0);
}
