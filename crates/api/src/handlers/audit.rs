//! Handler for the audit trail read endpoint.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use grimoire_core::scopes::{clamp_limit, DEFAULT_AUDIT_LIMIT, MAX_AUDIT_LIMIT};
use grimoire_db::repositories::AuditRepo;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for `GET /audit`.
#[derive(Debug, Deserialize)]
pub struct AuditListParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/audit?limit=N
///
/// Most-recent-first audit entries; `limit` clamped to [1, 500], default 100.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AuditListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_AUDIT_LIMIT, MAX_AUDIT_LIMIT);
    let entries = AuditRepo::list(&state.pool, limit).await?;
    Ok(Json(json!({ "audit": entries })))
}
