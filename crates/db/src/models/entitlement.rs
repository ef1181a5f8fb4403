//! Entitlement models. Entitlement rows are written only by the billing
//! reconciler; every other component reads them.

use grimoire_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `entitlements` table: current allow/deny for a
/// (spell, subject) pair.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Entitlement {
    pub id: DbId,
    pub spell_id: DbId,
    pub subject_identifier: String,
    /// `"active"` or `"revoked"`.
    pub status: String,
    pub updated_at: Timestamp,
}

impl Entitlement {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}
