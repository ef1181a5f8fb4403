//! Billing webhook ingress and the crash-recovery reconcile sweep.
//!
//! The provider delivers events at-least-once; the uniqueness constraint
//! on `billing_events.event_id` is the idempotency boundary. Each event's
//! effect is a set-status upsert on entitlements, so re-driving a row is
//! naturally convergent.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use grimoire_core::audit;
use grimoire_core::error::CoreError;
use grimoire_core::secrets::verify_billing_signature;
use grimoire_db::models::billing_event::{
    event_types, BillingEventPayload, IngestResponse, ReconcileResponse,
};
use grimoire_db::repositories::{AuditRepo, BillingEventRepo, EntitlementRepo, SpellRepo};
use serde_json::json;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the provider's hex-encoded HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "x-billing-signature";

/// POST /api/v1/webhooks/billing
///
/// Steps: verify the signature over the raw body (the only authentication
/// for inbound events), insert-if-absent on `event_id`, apply the effect,
/// mark processed, audit. A duplicate delivery -- even a concurrent one --
/// returns `ignored` without reprocessing.
pub async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Core(CoreError::InvalidSignature))?;

    if !verify_billing_signature(&state.config.billing_webhook_secret, &body, signature) {
        return Err(AppError::Core(CoreError::InvalidSignature));
    }

    let raw: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Core(CoreError::Validation(format!("Malformed payload: {e}"))))?;
    let payload: BillingEventPayload = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::Core(CoreError::Validation(format!("Malformed payload: {e}"))))?;

    // Idempotency boundary: the store rejects the second insert.
    let Some(event) = BillingEventRepo::insert_if_absent(&state.pool, &payload.event_id, &raw)
        .await?
    else {
        tracing::info!(event_id = %payload.event_id, "Duplicate billing event ignored");
        return Ok(Json(IngestResponse { status: "ignored" }));
    };

    apply_event(&state.pool, &payload).await?;
    BillingEventRepo::mark_processed(&state.pool, event.id).await?;

    AuditRepo::record(
        &state.pool,
        audit::BILLING_EVENT_PROCESSED,
        &payload.event_id,
        &json!({
            "event_type": payload.event_type,
            "spell_id": payload.spell_id,
            "subject_identifier": payload.subject_identifier,
        }),
    )
    .await?;

    tracing::info!(
        event_id = %payload.event_id,
        event_type = %payload.event_type,
        "Billing event processed"
    );

    Ok(Json(IngestResponse { status: "ok" }))
}

/// POST /api/v1/webhooks/billing/reconcile
///
/// Re-drive events that were inserted but never marked processed (crash or
/// partial failure between insert and apply). Idempotent per row: the
/// entitlement write is a status upsert.
pub async fn reconcile(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pending = BillingEventRepo::list_unprocessed(&state.pool).await?;
    let mut processed: u64 = 0;

    for event in pending {
        match serde_json::from_value::<BillingEventPayload>(event.raw_payload.clone()) {
            Ok(payload) => {
                apply_event(&state.pool, &payload).await?;
                BillingEventRepo::mark_processed(&state.pool, event.id).await?;

                AuditRepo::record(
                    &state.pool,
                    audit::BILLING_EVENT_PROCESSED,
                    &payload.event_id,
                    &json!({
                        "event_type": payload.event_type,
                        "spell_id": payload.spell_id,
                        "subject_identifier": payload.subject_identifier,
                        "reconciled": true,
                    }),
                )
                .await?;
                processed += 1;
            }
            Err(e) => {
                // A stored payload that no longer parses cannot be applied;
                // park it as processed so the sweep does not spin on it.
                tracing::warn!(event_id = %event.event_id, error = %e,
                    "Unparseable stored billing event marked processed without effect");
                BillingEventRepo::mark_processed(&state.pool, event.id).await?;
            }
        }
    }

    tracing::info!(processed, "Billing reconcile sweep complete");

    Ok(Json(ReconcileResponse { processed }))
}

/// Apply a billing event's effect to the entitlement store.
///
/// Unknown event types and references to unregistered spells are skipped:
/// the event row is still stored and marked processed, so the provider is
/// not driven into a retry loop over events this service does not act on.
async fn apply_event(pool: &PgPool, payload: &BillingEventPayload) -> Result<(), AppError> {
    let status = match payload.event_type.as_str() {
        event_types::ENTITLEMENT_ACTIVATED => "active",
        event_types::ENTITLEMENT_REVOKED => "revoked",
        other => {
            tracing::info!(event_id = %payload.event_id, event_type = %other,
                "Billing event type has no entitlement effect");
            return Ok(());
        }
    };

    if SpellRepo::find_by_id(pool, payload.spell_id).await?.is_none() {
        tracing::warn!(event_id = %payload.event_id, spell_id = payload.spell_id,
            "Billing event references unregistered spell; no entitlement written");
        return Ok(());
    }

    EntitlementRepo::set_status(pool, payload.spell_id, &payload.subject_identifier, status)
        .await?;
    Ok(())
}
