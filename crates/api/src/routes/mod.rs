pub mod health;
pub mod protocols;
pub mod scopes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /scopes/join          POST  create or join a scope
/// /scopes/{id}          GET   current scope record
/// /protocols/{id}       GET   catalog entry
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/scopes", scopes::router())
        .nest("/protocols", protocols::router())
}
