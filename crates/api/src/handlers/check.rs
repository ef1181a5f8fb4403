//! The policy decision endpoint ("spell check").
//!
//! This is the single read path every downstream runtime calls before
//! executing a spell. Every policy-level "no" collapses to a 200 with
//! `allowed: false`; only availability failures (storage errors) surface
//! as errors, so a 5xx is never mistaken for a denial and vice versa.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use grimoire_core::secrets::hash_token;
use grimoire_core::types::DbId;
use grimoire_db::repositories::{EntitlementRepo, SpellRepo, TokenRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::extract_bearer;
use crate::state::AppState;

/// Request body for `POST /spell/check`.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub spell_id: DbId,
    /// Identifies *where* execution would occur. Recorded for traceability
    /// only; it never affects the decision.
    pub runtime_id: Option<String>,
    pub user_identifier: String,
    pub requested_scope: String,
}

/// Response body: the one-bit answer.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
}

/// POST /api/v1/spell/check
///
/// Decision algorithm, short-circuiting on the first failure:
///
/// 1. Access token must be valid (live lookup; key revocation counts).
/// 2. `requested_scope` must be among the token's scopes.
/// 3. The spell must exist, be active, and require `requested_scope`.
/// 4. The (spell, subject) entitlement must be active.
///
/// Pure read composed of up to four lookups; safe under high concurrency
/// and safe to call repeatedly.
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CheckRequest>,
) -> AppResult<Json<CheckResponse>> {
    let denied = Json(CheckResponse { allowed: false });

    // 1. Token validity. A missing or malformed header is a policy "no",
    //    not an HTTP error, at this endpoint.
    let Ok(bearer) = extract_bearer(&headers) else {
        return Ok(denied);
    };
    let Some(token) = TokenRepo::find_valid_access(&state.pool, &hash_token(bearer)).await? else {
        return Ok(denied);
    };

    // 2. Scope must be bound to this token.
    if !token.scopes.contains(&input.requested_scope) {
        return Ok(denied);
    }

    // 3. Spell must be active and gate the requested scope.
    let Some(spell) = SpellRepo::find_by_id(&state.pool, input.spell_id).await? else {
        return Ok(denied);
    };
    if !spell.is_active() || !spell.required_scopes.contains(&input.requested_scope) {
        return Ok(denied);
    }

    // 4. Subject must hold an active entitlement.
    let entitlement =
        EntitlementRepo::find(&state.pool, input.spell_id, &input.user_identifier).await?;
    if !entitlement.is_some_and(|e| e.is_active()) {
        return Ok(denied);
    }

    tracing::debug!(
        key_id = token.key_id,
        spell_id = input.spell_id,
        runtime_id = input.runtime_id.as_deref(),
        subject = %input.user_identifier,
        "Spell check allowed"
    );

    Ok(Json(CheckResponse { allowed: true }))
}
