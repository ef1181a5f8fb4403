//! Route definitions for the `/tokens` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::tokens;
use crate::state::AppState;

/// Routes mounted at `/tokens`.
///
/// ```text
/// POST /         -> issue access + refresh tokens (bearer = key secret)
/// POST /refresh  -> reissue access token (single-use refresh token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tokens::issue))
        .route("/refresh", post(tokens::refresh))
}
