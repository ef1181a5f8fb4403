//! Handlers for scope definitions and per-key scope grants.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use grimoire_core::audit;
use grimoire_core::error::CoreError;
use grimoire_core::scopes::validate_scope_key;
use grimoire_core::types::DbId;
use grimoire_db::models::scope::{CreateScopeDefinition, ScopeAction, ScopeChangeRequest};
use grimoire_db::repositories::{AuditRepo, KeyRepo, ScopeRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Scope definitions
// ---------------------------------------------------------------------------

/// POST /api/v1/scopes
///
/// Create a scope definition. The scope_key is immutable once referenced.
pub async fn create_definition(
    State(state): State<AppState>,
    Json(input): Json<CreateScopeDefinition>,
) -> AppResult<impl IntoResponse> {
    validate_scope_key(&input.scope_key)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let definition =
        ScopeRepo::create_definition(&state.pool, &input.scope_key, input.description.as_deref())
            .await?;

    tracing::info!(scope_key = %definition.scope_key, "Scope definition created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: definition })))
}

/// GET /api/v1/scopes
pub async fn list_definitions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let definitions = ScopeRepo::list_definitions(&state.pool).await?;
    Ok(Json(DataResponse { data: definitions }))
}

// ---------------------------------------------------------------------------
// Per-key grants
// ---------------------------------------------------------------------------

/// POST /api/v1/developer-keys/{id}/scopes
///
/// Grant or revoke a scope for a key. Grants append to the ledger;
/// revocation marks the live grant rows revoked. Both take effect on the
/// next effective-scope read, with no caching in between.
pub async fn change_scopes(
    State(state): State<AppState>,
    Path(key_id): Path<DbId>,
    Json(input): Json<ScopeChangeRequest>,
) -> AppResult<impl IntoResponse> {
    KeyRepo::find_by_id(&state.pool, key_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DeveloperKey",
            id: key_id,
        }))?;

    // Unknown scopes are rejected before any ledger write.
    ScopeRepo::find_definition(&state.pool, &input.scope)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "ScopeDefinition",
                key: input.scope.clone(),
            })
        })?;

    match input.action {
        ScopeAction::Grant => {
            let grant = ScopeRepo::grant(
                &state.pool,
                key_id,
                &input.scope,
                input.condition_type.as_deref(),
            )
            .await?;

            AuditRepo::record(
                &state.pool,
                audit::SCOPE_GRANTED,
                &key_id.to_string(),
                &json!({ "scope": input.scope, "grant_id": grant.id,
                         "condition_type": input.condition_type }),
            )
            .await?;

            tracing::info!(key_id, scope = %input.scope, grant_id = grant.id, "Scope granted");

            Ok((
                StatusCode::CREATED,
                Json(json!({ "grant_id": grant.id })),
            ))
        }
        ScopeAction::Revoke => {
            let revoked = ScopeRepo::revoke_scope(&state.pool, key_id, &input.scope).await?;

            if revoked > 0 {
                AuditRepo::record(
                    &state.pool,
                    audit::SCOPE_REVOKED,
                    &key_id.to_string(),
                    &json!({ "scope": input.scope, "grants_revoked": revoked }),
                )
                .await?;

                tracing::info!(key_id, scope = %input.scope, revoked, "Scope revoked");
            }

            Ok((StatusCode::OK, Json(json!({ "revoked": revoked }))))
        }
    }
}

/// GET /api/v1/developer-keys/{id}/scopes
///
/// The key's effective scopes, evaluated at call time.
pub async fn effective_scopes(
    State(state): State<AppState>,
    Path(key_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    KeyRepo::find_by_id(&state.pool, key_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DeveloperKey",
            id: key_id,
        }))?;

    let scopes = ScopeRepo::effective_scopes(&state.pool, key_id).await?;
    Ok(Json(json!({ "scopes": scopes })))
}
