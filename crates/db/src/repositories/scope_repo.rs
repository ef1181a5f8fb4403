//! Repository for the `scope_definitions` table and the append-only
//! `scope_grants` ledger.

use grimoire_core::types::DbId;
use sqlx::PgPool;

use crate::models::scope::{ScopeDefinition, ScopeGrant};

const DEFINITION_COLUMNS: &str = "id, scope_key, description, created_at";

const GRANT_COLUMNS: &str = "id, key_id, scope_key, condition_type, granted_at, revoked_at";

/// Operations on scope definitions and grants. Grant rows are never
/// mutated in place; revocation sets `revoked_at` on the grant row.
pub struct ScopeRepo;

impl ScopeRepo {
    // -----------------------------------------------------------------------
    // Scope definitions
    // -----------------------------------------------------------------------

    /// Create a scope definition. Fails on duplicate `scope_key`
    /// (unique constraint `uq_scope_definitions_scope_key`).
    pub async fn create_definition(
        pool: &PgPool,
        scope_key: &str,
        description: Option<&str>,
    ) -> Result<ScopeDefinition, sqlx::Error> {
        let query = format!(
            "INSERT INTO scope_definitions (scope_key, description) \
             VALUES ($1, $2) \
             RETURNING {DEFINITION_COLUMNS}"
        );
        sqlx::query_as::<_, ScopeDefinition>(&query)
            .bind(scope_key)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// List all scope definitions.
    pub async fn list_definitions(pool: &PgPool) -> Result<Vec<ScopeDefinition>, sqlx::Error> {
        let query = format!("SELECT {DEFINITION_COLUMNS} FROM scope_definitions ORDER BY scope_key");
        sqlx::query_as::<_, ScopeDefinition>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a scope definition by key.
    pub async fn find_definition(
        pool: &PgPool,
        scope_key: &str,
    ) -> Result<Option<ScopeDefinition>, sqlx::Error> {
        let query = format!("SELECT {DEFINITION_COLUMNS} FROM scope_definitions WHERE scope_key = $1");
        sqlx::query_as::<_, ScopeDefinition>(&query)
            .bind(scope_key)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Scope grants
    // -----------------------------------------------------------------------

    /// Append a grant row binding a key to a scope.
    pub async fn grant(
        pool: &PgPool,
        key_id: DbId,
        scope_key: &str,
        condition_type: Option<&str>,
    ) -> Result<ScopeGrant, sqlx::Error> {
        let query = format!(
            "INSERT INTO scope_grants (key_id, scope_key, condition_type) \
             VALUES ($1, $2, $3) \
             RETURNING {GRANT_COLUMNS}"
        );
        sqlx::query_as::<_, ScopeGrant>(&query)
            .bind(key_id)
            .bind(scope_key)
            .bind(condition_type)
            .fetch_one(pool)
            .await
    }

    /// Revoke all live grants of a scope for a key by setting `revoked_at`.
    ///
    /// Returns the number of grant rows revoked. Revoking a scope with no
    /// live grant is a no-op (idempotent), not an error.
    pub async fn revoke_scope(
        pool: &PgPool,
        key_id: DbId,
        scope_key: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scope_grants SET revoked_at = NOW() \
             WHERE key_id = $1 AND scope_key = $2 AND revoked_at IS NULL",
        )
        .bind(key_id)
        .bind(scope_key)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// The set of scope keys with a live grant for a key, evaluated now.
    ///
    /// Never cached: grants and revocations must change access immediately.
    pub async fn effective_scopes(pool: &PgPool, key_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT scope_key FROM scope_grants \
             WHERE key_id = $1 AND revoked_at IS NULL \
             ORDER BY scope_key",
        )
        .bind(key_id)
        .fetch_all(pool)
        .await
    }
}
