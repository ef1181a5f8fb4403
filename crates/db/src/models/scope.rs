//! Scope definition and scope grant models.

use grimoire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scope_definitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScopeDefinition {
    pub id: DbId,
    pub scope_key: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the append-only `scope_grants` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScopeGrant {
    pub id: DbId,
    pub key_id: DbId,
    pub scope_key: String,
    pub condition_type: Option<String>,
    pub granted_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// DTO for creating a scope definition.
#[derive(Debug, Deserialize)]
pub struct CreateScopeDefinition {
    pub scope_key: String,
    pub description: Option<String>,
}

/// Grant/revoke action on `POST /developer-keys/{id}/scopes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeAction {
    Grant,
    Revoke,
}

/// Request body for `POST /developer-keys/{id}/scopes`.
#[derive(Debug, Deserialize)]
pub struct ScopeChangeRequest {
    pub scope: String,
    pub action: ScopeAction,
    #[serde(rename = "conditionType")]
    pub condition_type: Option<String>,
}
