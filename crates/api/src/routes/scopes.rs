//! Route definitions for the `/scopes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scopes;
use crate::state::AppState;

/// Routes mounted at `/scopes`.
///
/// ```text
/// POST   /join            -> join_scope
/// GET    /{id}            -> get_scope
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join", post(scopes::join_scope))
        .route("/{id}", get(scopes::get_scope))
}
