//! Root-level health endpoint (mounted outside `/api/v1`).

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// GET /health
///
/// Liveness plus a database round trip. The decision endpoint depends
/// entirely on storage, so a degraded database means degraded service.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_ok = grimoire_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if db_ok { "reachable" } else { "unreachable" },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
