//! Handlers for the `/developer-keys` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use grimoire_core::audit;
use grimoire_core::error::CoreError;
use grimoire_core::secrets::generate_developer_key;
use grimoire_core::types::DbId;
use grimoire_db::models::key::{CreateKeyRequest, KeyCreatedResponse, RevokeKeyRequest};
use grimoire_db::repositories::{AuditRepo, KeyRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/developer-keys
///
/// Create a developer key. The plaintext secret is returned exactly once;
/// only its Argon2id hash is stored.
pub async fn create_key(
    State(state): State<AppState>,
    Json(input): Json<CreateKeyRequest>,
) -> AppResult<impl IntoResponse> {
    if input.owner_subject.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "owner_subject must not be empty".into(),
        )));
    }

    let generated = generate_developer_key()
        .map_err(|e| AppError::InternalError(format!("Key generation error: {e}")))?;

    let key = KeyRepo::create(
        &state.pool,
        input.owner_subject.trim(),
        &generated.prefix,
        &generated.hash,
    )
    .await?;

    AuditRepo::record(
        &state.pool,
        audit::KEY_CREATED,
        &key.id.to_string(),
        &json!({ "owner_subject": key.owner_subject, "key_prefix": key.key_prefix }),
    )
    .await?;

    tracing::info!(key_id = key.id, owner = %key.owner_subject, "Developer key created");

    Ok((
        StatusCode::CREATED,
        Json(KeyCreatedResponse {
            key_id: key.id,
            key_secret: generated.plaintext,
            key_prefix: key.key_prefix,
            created_at: key.created_at,
        }),
    ))
}

/// POST /api/v1/developer-keys/{id}/revoke
///
/// Revoke a key. Idempotent: revoking an already-revoked key succeeds.
pub async fn revoke_key(
    State(state): State<AppState>,
    Path(key_id): Path<DbId>,
    Json(input): Json<RevokeKeyRequest>,
) -> AppResult<impl IntoResponse> {
    let key = KeyRepo::find_by_id(&state.pool, key_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DeveloperKey",
            id: key_id,
        }))?;

    if key.owner_subject != input.owner_subject {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Key does not belong to the given owner".into(),
        )));
    }

    // The conditional update matches only live keys; a miss on an existing
    // key means it was already revoked, which is a success.
    let revoked = KeyRepo::revoke(&state.pool, key_id).await?;

    if revoked.is_some() {
        AuditRepo::record(
            &state.pool,
            audit::KEY_REVOKED,
            &key_id.to_string(),
            &json!({ "owner_subject": input.owner_subject }),
        )
        .await?;

        tracing::info!(key_id, "Developer key revoked");
    }

    Ok(Json(json!({ "status": "revoked" })))
}
