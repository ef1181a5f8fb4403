//! Billing event models: the webhook wire format and the stored row.

use grimoire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Billing event types this service acts on. The provider may deliver
/// other types; those are stored and marked processed without effect.
pub mod event_types {
    pub const ENTITLEMENT_ACTIVATED: &str = "entitlement.activated";
    pub const ENTITLEMENT_REVOKED: &str = "entitlement.revoked";
}

/// A row from the `billing_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BillingEvent {
    pub id: DbId,
    pub event_id: String,
    pub raw_payload: serde_json::Value,
    pub received_at: Timestamp,
    pub processed_at: Option<Timestamp>,
}

/// The provider's webhook payload, parsed from the raw body after
/// signature verification.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingEventPayload {
    pub event_id: String,
    pub event_type: String,
    pub spell_id: DbId,
    pub subject_identifier: String,
}

/// Response for `POST /webhooks/billing`.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// `"ok"` for a first delivery, `"ignored"` for a duplicate.
    pub status: &'static str,
}

/// Response for `POST /webhooks/billing/reconcile`.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    /// Number of previously unprocessed events that were (re)applied.
    pub processed: u64,
}
