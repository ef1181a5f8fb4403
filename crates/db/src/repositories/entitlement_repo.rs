//! Repository for the `entitlements` table.
//!
//! Written only by the billing reconciler. The write is a set-status
//! upsert, so re-applying an already-applied billing event converges to
//! the same state instead of compounding.

use grimoire_core::types::DbId;
use sqlx::PgPool;

use crate::models::entitlement::Entitlement;

const ENTITLEMENT_COLUMNS: &str = "id, spell_id, subject_identifier, status, updated_at";

pub struct EntitlementRepo;

impl EntitlementRepo {
    /// Upsert the entitlement status for a (spell, subject) pair.
    pub async fn set_status(
        pool: &PgPool,
        spell_id: DbId,
        subject_identifier: &str,
        status: &str,
    ) -> Result<Entitlement, sqlx::Error> {
        let query = format!(
            "INSERT INTO entitlements (spell_id, subject_identifier, status) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_entitlements_spell_subject \
             DO UPDATE SET status = EXCLUDED.status, updated_at = NOW() \
             RETURNING {ENTITLEMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Entitlement>(&query)
            .bind(spell_id)
            .bind(subject_identifier)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Read the current entitlement for a (spell, subject) pair, live.
    pub async fn find(
        pool: &PgPool,
        spell_id: DbId,
        subject_identifier: &str,
    ) -> Result<Option<Entitlement>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTITLEMENT_COLUMNS} FROM entitlements \
             WHERE spell_id = $1 AND subject_identifier = $2"
        );
        sqlx::query_as::<_, Entitlement>(&query)
            .bind(spell_id)
            .bind(subject_identifier)
            .fetch_optional(pool)
            .await
    }
}
