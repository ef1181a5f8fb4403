//! Access and refresh token row models and DTOs.

use grimoire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `access_tokens` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessToken {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub key_id: DbId,
    pub scopes: Vec<String>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// A row from the `refresh_tokens` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RefreshToken {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub key_id: DbId,
    pub scopes: Vec<String>,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Request body for `POST /tokens`.
#[derive(Debug, Deserialize)]
pub struct IssueTokensRequest {
    pub scopes: Vec<String>,
}

/// Request body for `POST /tokens/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshTokensRequest {
    pub refresh_token: String,
}

/// Response for `POST /tokens`: both plaintext tokens, shown once.
#[derive(Debug, Serialize)]
pub struct TokensIssuedResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Timestamp,
    pub scopes: Vec<String>,
}

/// Response for `POST /tokens/refresh`: a fresh access token only.
#[derive(Debug, Serialize)]
pub struct TokenRefreshedResponse {
    pub access_token: String,
    pub expires_at: Timestamp,
    pub scopes: Vec<String>,
}
