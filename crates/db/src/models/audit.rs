//! Audit log entry model.

use grimoire_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `audit_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    pub event_name: String,
    pub target_id: String,
    pub metadata: serde_json::Value,
    pub recorded_at: Timestamp,
}
