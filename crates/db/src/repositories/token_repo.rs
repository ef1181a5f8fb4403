//! Repository for the `access_tokens` and `refresh_tokens` tables.
//!
//! Tokens are stored only as SHA-256 digests. The refresh single-use
//! guarantee lives in [`TokenRepo::consume_refresh`]: one atomic
//! conditional UPDATE, so two racing refresh calls on the same token get
//! exactly one winner without any application-level locking.

use chrono::{DateTime, Utc};
use grimoire_core::types::DbId;
use sqlx::PgPool;

use crate::models::token::{AccessToken, RefreshToken};

const ACCESS_COLUMNS: &str = "id, token_hash, key_id, scopes, expires_at, created_at";

const REFRESH_COLUMNS: &str = "id, token_hash, key_id, scopes, expires_at, used_at, created_at";

pub struct TokenRepo;

impl TokenRepo {
    /// Persist a freshly minted access token.
    pub async fn insert_access(
        pool: &PgPool,
        token_hash: &str,
        key_id: DbId,
        scopes: &[String],
        expires_at: DateTime<Utc>,
    ) -> Result<AccessToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO access_tokens (token_hash, key_id, scopes, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ACCESS_COLUMNS}"
        );
        sqlx::query_as::<_, AccessToken>(&query)
            .bind(token_hash)
            .bind(key_id)
            .bind(scopes)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Persist a freshly minted refresh token.
    pub async fn insert_refresh(
        pool: &PgPool,
        token_hash: &str,
        key_id: DbId,
        scopes: &[String],
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (token_hash, key_id, scopes, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REFRESH_COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token_hash)
            .bind(key_id)
            .bind(scopes)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live access token by digest.
    ///
    /// Joins the owning key so revocation propagates to already-issued
    /// tokens immediately: an unexpired token whose key has been revoked
    /// is not returned.
    pub async fn find_valid_access(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<AccessToken>, sqlx::Error> {
        sqlx::query_as::<_, AccessToken>(
            "SELECT at.id, at.token_hash, at.key_id, at.scopes, at.expires_at, at.created_at \
             FROM access_tokens at \
             JOIN developer_keys dk ON dk.id = at.key_id \
             WHERE at.token_hash = $1 \
               AND at.expires_at > NOW() \
               AND dk.revoked_at IS NULL",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Atomically consume a refresh token: set `used_at` if and only if it
    /// is unused, unexpired, and its owning key is still live.
    ///
    /// Returns the consumed row on success, `None` if the token was
    /// unknown, already used, expired, or orphaned by key revocation.
    pub async fn consume_refresh(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        sqlx::query_as::<_, RefreshToken>(
            "UPDATE refresh_tokens rt SET used_at = NOW() \
             FROM developer_keys dk \
             WHERE rt.token_hash = $1 \
               AND rt.used_at IS NULL \
               AND rt.expires_at > NOW() \
               AND dk.id = rt.key_id \
               AND dk.revoked_at IS NULL \
             RETURNING rt.id, rt.token_hash, rt.key_id, rt.scopes, rt.expires_at, \
                       rt.used_at, rt.created_at",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }
}
