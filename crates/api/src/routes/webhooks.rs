//! Route definitions for the `/webhooks` ingress.

use axum::routing::post;
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /billing            -> signed billing event ingress
/// POST /billing/reconcile  -> re-drive unprocessed events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/billing", post(billing::ingest))
        .route("/billing/reconcile", post(billing::reconcile))
}
