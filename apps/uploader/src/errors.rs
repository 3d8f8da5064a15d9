use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::selection::controller::SelectionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Validation failures are not errors at this level: `select` answers them
/// with an `Error` status body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InvalidCandidate(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_CANDIDATE", msg.clone())
            }
            AppError::Selection(e) => {
                let code = match e {
                    SelectionError::NoFileSelected => "NO_FILE_SELECTED",
                    SelectionError::UploadInProgress => "UPLOAD_IN_PROGRESS",
                };
                tracing::debug!("Rejected completion: {e}");
                (StatusCode::CONFLICT, code, e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
