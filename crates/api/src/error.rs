use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cohort_core::error::{CoreError, StoreError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for join failures and [`StoreError`] for direct
/// lookups. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cohort_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository error from a catalog or scope store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
                }
                CoreError::UnknownProtocol(_) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_PROTOCOL", core.to_string())
                }
                CoreError::UnknownScope(_) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_SCOPE", core.to_string())
                }
                CoreError::ProtocolMismatch { .. } => {
                    (StatusCode::CONFLICT, "PROTOCOL_MISMATCH", core.to_string())
                }
                CoreError::CohortFull { .. } => {
                    (StatusCode::CONFLICT, "COHORT_FULL", core.to_string())
                }
                CoreError::Storage(err) => {
                    tracing::error!(error = %err, "Storage failure during join");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            AppError::Store(store) => match store {
                StoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                StoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                StoreError::CohortFull { .. } => {
                    (StatusCode::CONFLICT, "COHORT_FULL", store.to_string())
                }
                StoreError::Backend(msg) => {
                    tracing::error!(error = %msg, "Storage backend error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
