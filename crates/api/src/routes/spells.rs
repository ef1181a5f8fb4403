//! Route definitions for the `/spells` registry resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::spells;
use crate::state::AppState;

/// Routes mounted at `/spells`.
///
/// ```text
/// POST /              -> register spell
/// GET  /              -> list spells
/// POST /{id}/status   -> toggle active|inactive
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(spells::create_spell).get(spells::list_spells))
        .route("/{id}/status", post(spells::set_status))
}
