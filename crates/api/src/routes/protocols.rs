use axum::routing::get;
use axum::Router;

use crate::handlers::protocols;
use crate::state::AppState;

/// Routes mounted at `/protocols`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(protocols::get_protocol))
}
