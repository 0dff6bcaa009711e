//! Handlers for the `/scopes` resource.
//!
//! Workers call `POST /scopes/join` to open or enter a scope and may poll
//! `GET /scopes/{id}` until the cohort is complete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cohort_core::coordinator::{JoinOutcome, JoinRequest};
use cohort_core::store::ScopeStore;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// POST /api/v1/scopes/join
///
/// Body: `{ "workerId"?, "protocolId"?, "scopeId"? }`. Without `scopeId` a
/// new scope is opened and 201 is returned; with one, the worker is
/// appended and 200 is returned. Missing fields are reported by the
/// coordinator, so an empty object is a valid (rejected) request.
pub async fn join_scope(
    State(state): State<AppState>,
    body: Result<Json<JoinRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let (response, outcome) = state.coordinator.join_with_outcome(&request).await?;

    let status = match outcome {
        JoinOutcome::Created => StatusCode::CREATED,
        JoinOutcome::Joined => StatusCode::OK,
    };

    tracing::info!(
        scope_id = %response.user.scope_id,
        worker_id = request.worker_id.as_deref().unwrap_or_default(),
        participants = response.participants.len(),
        cohort_size = response.plans.len(),
        ?outcome,
        "Worker joined scope",
    );

    Ok((status, Json(DataResponse { data: response })))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/scopes/{id}
///
/// Current participants and capacity of a scope.
pub async fn get_scope(
    State(state): State<AppState>,
    Path(scope_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let scope = state.coordinator.store().get(&scope_id).await?;
    Ok(Json(DataResponse { data: scope }))
}
