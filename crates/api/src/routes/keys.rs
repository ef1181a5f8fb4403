//! Route definitions for the `/developer-keys` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::{keys, scopes};
use crate::state::AppState;

/// Routes mounted at `/developer-keys`.
///
/// ```text
/// POST /                 -> create key
/// POST /{id}/revoke      -> revoke key (idempotent)
/// POST /{id}/scopes      -> grant or revoke a scope
/// GET  /{id}/scopes      -> effective scopes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(keys::create_key))
        .route("/{id}/revoke", post(keys::revoke_key))
        .route(
            "/{id}/scopes",
            post(scopes::change_scopes).get(scopes::effective_scopes),
        )
}
