//! Spell registry models: the catalog of invocable capabilities being gated.

use grimoire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `spells` table. Spells are status-toggled, never deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Spell {
    pub id: DbId,
    pub name: String,
    pub sku: String,
    pub spell_type: String,
    /// `"active"` or `"inactive"`.
    pub status: String,
    pub required_scopes: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Spell {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// DTO for registering a new spell.
#[derive(Debug, Deserialize)]
pub struct CreateSpell {
    pub name: String,
    pub sku: String,
    pub spell_type: String,
    pub required_scopes: Vec<String>,
}

/// Request body for `POST /spells/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetSpellStatus {
    /// `"active"` or `"inactive"`.
    pub status: String,
}
