//! Repository for the append-only `audit_entries` table.

use sqlx::PgPool;

use crate::models::audit::AuditEntry;

const AUDIT_COLUMNS: &str = "id, event_name, target_id, metadata, recorded_at";

pub struct AuditRepo;

impl AuditRepo {
    /// Append an audit entry. Entries are never updated or deleted.
    pub async fn record(
        pool: &PgPool,
        event_name: &str,
        target_id: &str,
        metadata: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO audit_entries (event_name, target_id, metadata) VALUES ($1, $2, $3)",
        )
        .bind(event_name)
        .bind(target_id)
        .bind(metadata)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List entries most-recent-first. The caller clamps `limit`.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_entries \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
