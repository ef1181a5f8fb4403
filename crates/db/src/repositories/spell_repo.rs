//! Repository for the `spells` registry table.

use grimoire_core::types::DbId;
use sqlx::PgPool;

use crate::models::spell::Spell;

const SPELL_COLUMNS: &str =
    "id, name, sku, spell_type, status, required_scopes, created_at, updated_at";

pub struct SpellRepo;

impl SpellRepo {
    /// Register a new spell. Fails on duplicate `sku` (`uq_spells_sku`).
    pub async fn create(
        pool: &PgPool,
        name: &str,
        sku: &str,
        spell_type: &str,
        required_scopes: &[String],
    ) -> Result<Spell, sqlx::Error> {
        let query = format!(
            "INSERT INTO spells (name, sku, spell_type, required_scopes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SPELL_COLUMNS}"
        );
        sqlx::query_as::<_, Spell>(&query)
            .bind(name)
            .bind(sku)
            .bind(spell_type)
            .bind(required_scopes)
            .fetch_one(pool)
            .await
    }

    /// List all spells, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Spell>, sqlx::Error> {
        let query = format!("SELECT {SPELL_COLUMNS} FROM spells ORDER BY created_at DESC");
        sqlx::query_as::<_, Spell>(&query).fetch_all(pool).await
    }

    /// Find a spell by id regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Spell>, sqlx::Error> {
        let query = format!("SELECT {SPELL_COLUMNS} FROM spells WHERE id = $1");
        sqlx::query_as::<_, Spell>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a spell's status (`active` / `inactive`). Toggles never delete
    /// history; the row and its entitlements stay put.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Spell>, sqlx::Error> {
        let query = format!(
            "UPDATE spells SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SPELL_COLUMNS}"
        );
        sqlx::query_as::<_, Spell>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
