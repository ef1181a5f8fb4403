//! Repository for the `developer_keys` table.

use grimoire_core::types::DbId;
use sqlx::PgPool;

use crate::models::key::DeveloperKey;

const KEY_COLUMNS: &str = "id, owner_subject, key_prefix, secret_hash, created_at, revoked_at";

/// CRUD operations for developer keys. The plaintext secret never passes
/// through this layer; callers hash before storing and verify after lookup.
pub struct KeyRepo;

impl KeyRepo {
    /// Insert a new developer key. Returns the full row (with hash).
    pub async fn create(
        pool: &PgPool,
        owner_subject: &str,
        key_prefix: &str,
        secret_hash: &str,
    ) -> Result<DeveloperKey, sqlx::Error> {
        let query = format!(
            "INSERT INTO developer_keys (owner_subject, key_prefix, secret_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {KEY_COLUMNS}"
        );
        sqlx::query_as::<_, DeveloperKey>(&query)
            .bind(owner_subject)
            .bind(key_prefix)
            .bind(secret_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a key by its id, revoked or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DeveloperKey>, sqlx::Error> {
        let query = format!("SELECT {KEY_COLUMNS} FROM developer_keys WHERE id = $1");
        sqlx::query_as::<_, DeveloperKey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a key by its unique plaintext prefix.
    ///
    /// Used during secret verification; the caller still checks
    /// [`DeveloperKey::is_live`] and the Argon2 hash.
    pub async fn find_by_prefix(
        pool: &PgPool,
        key_prefix: &str,
    ) -> Result<Option<DeveloperKey>, sqlx::Error> {
        let query = format!("SELECT {KEY_COLUMNS} FROM developer_keys WHERE key_prefix = $1");
        sqlx::query_as::<_, DeveloperKey>(&query)
            .bind(key_prefix)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a key by setting `revoked_at`, once.
    ///
    /// Returns `None` if no live row matched; the handler distinguishes
    /// "already revoked" (idempotent success) from "unknown key" via
    /// [`KeyRepo::find_by_id`].
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<Option<DeveloperKey>, sqlx::Error> {
        let query = format!(
            "UPDATE developer_keys SET revoked_at = NOW() \
             WHERE id = $1 AND revoked_at IS NULL \
             RETURNING {KEY_COLUMNS}"
        );
        sqlx::query_as::<_, DeveloperKey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
