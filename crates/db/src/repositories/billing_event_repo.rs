//! Repository for the `billing_events` table.
//!
//! The idempotency boundary for webhook ingestion is
//! [`BillingEventRepo::insert_if_absent`]: an `ON CONFLICT DO NOTHING`
//! insert against `uq_billing_events_event_id`. Two concurrent deliveries
//! of the same `event_id` are resolved by the store rejecting the second
//! insert, not by in-memory locking.

use grimoire_core::types::DbId;
use sqlx::PgPool;

use crate::models::billing_event::BillingEvent;

const EVENT_COLUMNS: &str = "id, event_id, raw_payload, received_at, processed_at";

pub struct BillingEventRepo;

impl BillingEventRepo {
    /// Insert a billing event row keyed by the provider's `event_id`.
    ///
    /// Returns `Some(row)` if this call inserted the row, `None` if the
    /// event was already present (duplicate delivery).
    pub async fn insert_if_absent(
        pool: &PgPool,
        event_id: &str,
        raw_payload: &serde_json::Value,
    ) -> Result<Option<BillingEvent>, sqlx::Error> {
        let query = format!(
            "INSERT INTO billing_events (event_id, raw_payload) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_billing_events_event_id DO NOTHING \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, BillingEvent>(&query)
            .bind(event_id)
            .bind(raw_payload)
            .fetch_optional(pool)
            .await
    }

    /// Mark an event row processed.
    pub async fn mark_processed(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE billing_events SET processed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Rows that were inserted but never marked processed, oldest first.
    ///
    /// Fed to the reconcile sweep after a crash or partial failure.
    pub async fn list_unprocessed(pool: &PgPool) -> Result<Vec<BillingEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM billing_events \
             WHERE processed_at IS NULL \
             ORDER BY received_at"
        );
        sqlx::query_as::<_, BillingEvent>(&query)
            .fetch_all(pool)
            .await
    }
}
