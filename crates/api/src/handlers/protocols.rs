//! Handlers for the read-only `/protocols` resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use cohort_core::catalog::ProtocolCatalog;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/protocols/{id}
pub async fn get_protocol(
    State(state): State<AppState>,
    Path(protocol_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let protocol = state.coordinator.catalog().lookup(&protocol_id).await?;
    Ok(Json(DataResponse { data: protocol }))
}
