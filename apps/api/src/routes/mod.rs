pub mod health;
pub mod intake;
pub mod pages;
pub mod sessions;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::SessionController;
use crate::state::AppState;

/// Upload size is only advised (2 MB), not enforced; this is the transport cap.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub(crate) fn find_session(state: &AppState, id: Uuid) -> Result<Arc<SessionController>, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Browser pages
        .route("/", get(pages::handle_index))
        .route("/sessions/:id", get(pages::handle_show))
        .route("/sessions/:id/start", post(pages::handle_start))
        .route("/sessions/:id/input", post(pages::handle_input))
        .route("/sessions/:id/reset", post(pages::handle_reset))
        .route("/sessions/:id/retry", post(pages::handle_retry))
        // Session API
        .route("/api/v1/sessions", post(sessions::handle_create))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get).delete(sessions::handle_delete),
        )
        .route("/api/v1/sessions/:id/start", post(sessions::handle_start))
        .route("/api/v1/sessions/:id/submit", post(sessions::handle_submit))
        .route("/api/v1/sessions/:id/reset", post(sessions::handle_reset))
        .route("/api/v1/sessions/:id/retry", post(sessions::handle_retry))
        // Stateless helpers
        .route("/api/v1/uploads", post(intake::handle_upload))
        .route("/api/v1/preview", post(intake::handle_preview))
        .route("/api/v1/analyze", post(intake::handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
