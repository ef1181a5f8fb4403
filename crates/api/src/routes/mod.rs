pub mod audit;
pub mod health;
pub mod keys;
pub mod scopes;
pub mod spells;
pub mod tokens;
pub mod webhooks;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /developer-keys                       create key (POST)
/// /developer-keys/{id}/revoke           revoke key (POST, idempotent)
/// /developer-keys/{id}/scopes           grant/revoke scope (POST), effective scopes (GET)
///
/// /tokens                               issue tokens (POST, bearer = key secret)
/// /tokens/refresh                       refresh access token (POST)
///
/// /scopes                               create (POST), list (GET) scope definitions
///
/// /spells                               register (POST), list (GET)
/// /spells/{id}/status                   toggle active|inactive (POST)
///
/// /spell/check                          policy decision (POST, bearer = access token)
///
/// /webhooks/billing                     signed billing ingress (POST)
/// /webhooks/billing/reconcile           unprocessed-event sweep (POST)
///
/// /audit                                audit trail (GET, ?limit=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/developer-keys", keys::router())
        .nest("/tokens", tokens::router())
        .nest("/scopes", scopes::router())
        .nest("/spells", spells::router())
        .route("/spell/check", post(handlers::check::check))
        .nest("/webhooks", webhooks::router())
        .nest("/audit", audit::router())
}
