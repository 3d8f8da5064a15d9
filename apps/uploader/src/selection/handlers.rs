use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::selection::format::format_file_size;
use crate::selection::models::{Candidate, UiState, UploadStatus};
use crate::selection::registry::SessionInfo;
use crate::selection::session::UploadSession;
use crate::state::AppState;

#[derive(Serialize)]
pub struct RulesResponse {
    pub allowed_extensions: Vec<String>,
    pub max_size: u64,
    pub max_size_label: String,
    pub upload_delay_ms: u64,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<UploadSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Upload session {id} not found")))
}

/// GET /api/v1/rules
pub async fn handle_get_rules(State(state): State<AppState>) -> Json<RulesResponse> {
    let rule = state.sessions.rule();
    Json(RulesResponse {
        allowed_extensions: rule.allowed_extensions().to_vec(),
        max_size: rule.max_size(),
        max_size_label: format_file_size(rule.max_size()),
        upload_delay_ms: state.config.upload_delay.as_millis() as u64,
    })
}

/// POST /api/v1/uploads
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionInfo>) {
    let info = state.sessions.create().await;
    (StatusCode::CREATED, Json(info))
}

/// GET /api/v1/uploads/:id
pub async fn handle_get_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadStatus>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.status().await))
}

/// POST /api/v1/uploads/:id/select
///
/// A rejected file is still a well-formed answer: the body carries the
/// `error` state and message, with 422 so clients can branch on status alone.
/// A body that is not a candidate at all gets 400 `INVALID_CANDIDATE`.
pub async fn handle_select(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    candidate: Result<Json<Candidate>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadStatus>), AppError> {
    let session = find_session(&state, id).await?;
    let Json(candidate) =
        candidate.map_err(|rejection| AppError::InvalidCandidate(rejection.body_text()))?;
    let status = session.select(&candidate).await;
    let code = match status.state {
        UiState::Error => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    Ok((code, Json(status)))
}

/// POST /api/v1/uploads/:id/complete
pub async fn handle_complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<UploadStatus>), AppError> {
    let session = find_session(&state, id).await?;
    let status = session.complete().await?;
    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// POST /api/v1/uploads/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadStatus>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.reset().await))
}

/// DELETE /api/v1/uploads/:id
pub async fn handle_discard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.discard(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Upload session {id} not found")))
    }
}
