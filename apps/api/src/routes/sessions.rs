//! JSON API over the session state machine.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::ResumeData;
use crate::routes::find_session;
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub session: Arc<SessionSnapshot>,
}

/// POST /api/v1/sessions
pub async fn handle_create(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let controller = state.sessions.create();
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            id: controller.id(),
            session: controller.snapshot(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let controller = find_session(&state, id)?;
    Ok(Json(SessionResponse {
        id,
        session: controller.snapshot(),
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id)?.start()?;
    Ok(Json(SessionResponse { id, session }))
}

/// POST /api/v1/sessions/:id/submit
///
/// Accepts the resume and starts the analysis. Responds immediately with the
/// Analyzing snapshot; poll GET for the outcome.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<ResumeData>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = find_session(&state, id)?.submit(data)?;
    Ok((StatusCode::ACCEPTED, Json(SessionResponse { id, session })))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id)?.reset()?;
    Ok(Json(SessionResponse { id, session }))
}

/// POST /api/v1/sessions/:id/retry
pub async fn handle_retry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id)?.retry()?;
    Ok(Json(SessionResponse { id, session }))
}
