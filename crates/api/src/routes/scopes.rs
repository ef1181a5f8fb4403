//! Route definitions for the `/scopes` resource (scope definitions).

use axum::routing::post;
use axum::Router;

use crate::handlers::scopes;
use crate::state::AppState;

/// Routes mounted at `/scopes`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        post(scopes::create_definition).get(scopes::list_definitions),
    )
}
