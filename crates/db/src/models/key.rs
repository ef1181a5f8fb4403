//! Developer-key row model and DTOs.

use grimoire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `developer_keys` table.
///
/// **Note:** `secret_hash` is never serialized to responses. The
/// `key_prefix` is the human-visible identifier for support tooling.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeveloperKey {
    pub id: DbId,
    pub owner_subject: String,
    pub key_prefix: String,
    #[serde(skip_serializing)]
    pub secret_hash: String,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl DeveloperKey {
    /// Whether the key is currently live.
    ///
    /// The single liveness check for developer keys; callers must not
    /// re-derive `revoked_at IS NULL` semantics themselves.
    pub fn is_live(&self) -> bool {
        self.revoked_at.is_none()
    }
}

/// Request body for `POST /developer-keys`.
#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(alias = "owner_user_id")]
    pub owner_subject: String,
}

/// Request body for `POST /developer-keys/{id}/revoke`.
///
/// Accepts `owner_user_id` as an alias; older integrations send that name.
#[derive(Debug, Deserialize)]
pub struct RevokeKeyRequest {
    #[serde(alias = "owner_user_id")]
    pub owner_subject: String,
}

/// Response returned when a key is created. Includes the plaintext secret,
/// shown exactly once and never stored.
#[derive(Debug, Serialize)]
pub struct KeyCreatedResponse {
    pub key_id: DbId,
    pub key_secret: String,
    pub key_prefix: String,
    pub created_at: Timestamp,
}
