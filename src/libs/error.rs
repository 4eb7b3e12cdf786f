//! Unified service-layer error type for task operations.
//!
//! `TaskError` bridges the gap between store-level failures (`rusqlite::Error`)
//! and the HTTP surface. It enables `?` propagation without manual
//! `.map_err(...)` boilerplate in handlers, and maps each variant to the
//! status code the client expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Target task id does not exist.
    #[error("Task not found")]
    NotFound,

    /// Malformed request body: wrong types, missing fields, empty bulk list.
    #[error("{0}")]
    InvalidInput(String),

    /// Move-up on the first task or move-down on the last.
    #[error("Task is already at the boundary")]
    AlreadyAtBoundary,

    /// Underlying atomic write failed; the transaction was rolled back and
    /// nothing was applied.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = match &self {
            TaskError::NotFound => StatusCode::NOT_FOUND,
            TaskError::InvalidInput(_) | TaskError::AlreadyAtBoundary => StatusCode::BAD_REQUEST,
            TaskError::Storage(e) => {
                tracing::error!(error = %e, "task storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = match &self {
            // Internal details stay in the log, not the response.
            TaskError::Storage(_) => json!({ "error": "Internal server error" }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
