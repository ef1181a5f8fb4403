//! Handlers for the `/tokens` resource (issuance and refresh).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use grimoire_core::error::CoreError;
use grimoire_core::secrets::{
    extract_prefix, generate_token, hash_token, verify_developer_key, KEY_PREFIX_LENGTH,
};
use grimoire_db::models::key::DeveloperKey;
use grimoire_db::models::token::{
    IssueTokensRequest, RefreshTokensRequest, TokenRefreshedResponse, TokensIssuedResponse,
};
use grimoire_db::repositories::{KeyRepo, ScopeRepo, TokenRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::extract_bearer;
use crate::state::AppState;

/// POST /api/v1/tokens
///
/// Exchange a developer-key secret (bearer) for an access + refresh token
/// pair bound to exactly the requested scopes -- not the key's full
/// effective set, so each issuance carries least privilege.
pub async fn issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<IssueTokensRequest>,
) -> AppResult<impl IntoResponse> {
    if input.scopes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "scopes must not be empty".into(),
        )));
    }

    let secret = extract_bearer(&headers)?;
    let key = verify_secret(&state, secret).await?;

    // Effective scopes are read live at issuance time.
    let effective = ScopeRepo::effective_scopes(&state.pool, key.id).await?;
    let missing: Vec<&String> = input
        .scopes
        .iter()
        .filter(|s| !effective.contains(s))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::ScopeNotGranted(format!(
            "scopes not granted to this key: {}",
            missing
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))));
    }

    let now = Utc::now();
    let access_expires = now + Duration::seconds(state.config.tokens.access_ttl_secs);
    let refresh_expires = now + Duration::days(state.config.tokens.refresh_ttl_days);

    let (access_plaintext, access_hash) = generate_token();
    let (refresh_plaintext, refresh_hash) = generate_token();

    let access = TokenRepo::insert_access(
        &state.pool,
        &access_hash,
        key.id,
        &input.scopes,
        access_expires,
    )
    .await?;
    TokenRepo::insert_refresh(
        &state.pool,
        &refresh_hash,
        key.id,
        &input.scopes,
        refresh_expires,
    )
    .await?;

    tracing::info!(key_id = key.id, scopes = ?input.scopes, "Tokens issued");

    Ok((
        StatusCode::CREATED,
        Json(TokensIssuedResponse {
            access_token: access_plaintext,
            refresh_token: refresh_plaintext,
            expires_at: access.expires_at,
            scopes: access.scopes,
        }),
    ))
}

/// POST /api/v1/tokens/refresh
///
/// Exchange a refresh token for a new access token with the same scope
/// set. The refresh token is single-use: consumption is one atomic
/// conditional update, so a replayed or raced exchange gets exactly one
/// success. The refresh token itself is not rotated.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshTokensRequest>,
) -> AppResult<impl IntoResponse> {
    let consumed = TokenRepo::consume_refresh(&state.pool, &hash_token(&input.refresh_token))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let access_expires = Utc::now() + Duration::seconds(state.config.tokens.access_ttl_secs);
    let (access_plaintext, access_hash) = generate_token();

    let access = TokenRepo::insert_access(
        &state.pool,
        &access_hash,
        consumed.key_id,
        &consumed.scopes,
        access_expires,
    )
    .await?;

    tracing::info!(key_id = consumed.key_id, "Access token reissued via refresh");

    Ok(Json(TokenRefreshedResponse {
        access_token: access_plaintext,
        expires_at: access.expires_at,
        scopes: access.scopes,
    }))
}

/// Verify a presented developer-key secret and return the live key row.
///
/// All failure modes (unknown prefix, revoked key, hash mismatch) collapse
/// to the same `Unauthorized` message so the endpoint leaks nothing about
/// which part failed.
async fn verify_secret(state: &AppState, secret: &str) -> AppResult<DeveloperKey> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid developer key".into()));

    if secret.len() < KEY_PREFIX_LENGTH {
        return Err(invalid());
    }

    let key = KeyRepo::find_by_prefix(&state.pool, extract_prefix(secret))
        .await?
        .ok_or_else(invalid)?;

    if !key.is_live() {
        return Err(invalid());
    }

    let matches = verify_developer_key(secret, &key.secret_hash)
        .map_err(|e| AppError::InternalError(format!("Secret verification error: {e}")))?;
    if !matches {
        return Err(invalid());
    }

    Ok(key)
}
