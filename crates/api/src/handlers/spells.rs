//! Handlers for the spell registry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use grimoire_core::audit;
use grimoire_core::error::CoreError;
use grimoire_core::types::DbId;
use grimoire_db::models::spell::{CreateSpell, SetSpellStatus};
use grimoire_db::repositories::{AuditRepo, ScopeRepo, SpellRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/spells
///
/// Register a spell. Every required scope must already be defined.
pub async fn create_spell(
    State(state): State<AppState>,
    Json(input): Json<CreateSpell>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    if input.sku.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "sku must not be empty".into(),
        )));
    }
    if input.required_scopes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "required_scopes must not be empty".into(),
        )));
    }

    for scope_key in &input.required_scopes {
        ScopeRepo::find_definition(&state.pool, scope_key)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFoundByKey {
                    entity: "ScopeDefinition",
                    key: scope_key.clone(),
                })
            })?;
    }

    let spell = SpellRepo::create(
        &state.pool,
        input.name.trim(),
        input.sku.trim(),
        &input.spell_type,
        &input.required_scopes,
    )
    .await?;

    AuditRepo::record(
        &state.pool,
        audit::SPELL_CREATED,
        &spell.id.to_string(),
        &json!({ "name": spell.name, "sku": spell.sku }),
    )
    .await?;

    tracing::info!(spell_id = spell.id, sku = %spell.sku, "Spell registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: spell })))
}

/// GET /api/v1/spells
pub async fn list_spells(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let spells = SpellRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: spells }))
}

/// POST /api/v1/spells/{id}/status
///
/// Toggle a spell between active and inactive. Never deletes history.
pub async fn set_status(
    State(state): State<AppState>,
    Path(spell_id): Path<DbId>,
    Json(input): Json<SetSpellStatus>,
) -> AppResult<impl IntoResponse> {
    if input.status != "active" && input.status != "inactive" {
        return Err(AppError::Core(CoreError::Validation(
            "status must be 'active' or 'inactive'".into(),
        )));
    }

    let spell = SpellRepo::set_status(&state.pool, spell_id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Spell",
            id: spell_id,
        }))?;

    AuditRepo::record(
        &state.pool,
        audit::SPELL_STATUS_CHANGED,
        &spell_id.to_string(),
        &json!({ "status": spell.status }),
    )
    .await?;

    tracing::info!(spell_id, status = %spell.status, "Spell status changed");

    Ok(Json(DataResponse { data: spell }))
}
