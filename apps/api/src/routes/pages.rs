//! Browser-facing HTML routes. Forms post here and are redirected back to the
//! session page, so the page always reflects the current snapshot.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::upload::ingest_upload;
use crate::models::analysis::ResumeData;
use crate::session::{Phase, SessionSnapshot, TransitionError};
use crate::state::AppState;
use crate::views::{render_session_page, InputDraft};

fn session_location(id: Uuid) -> String {
    format!("/sessions/{id}")
}

/// GET /
/// Opens a new session and sends the browser to it.
pub async fn handle_index(State(state): State<AppState>) -> Redirect {
    let controller = state.sessions.create();
    Redirect::to(&session_location(controller.id()))
}

/// GET /sessions/:id
pub async fn handle_show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let Some(controller) = state.sessions.get(id) else {
        return session_gone(id);
    };
    page(&state, id, &controller.snapshot(), &InputDraft::default()).into_response()
}

/// POST /sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(controller) = state.sessions.get(id) else {
        return Ok(session_gone(id));
    };
    ignore_invalid(id, controller.start())?;
    Ok(Redirect::to(&session_location(id)).into_response())
}

/// POST /sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(controller) = state.sessions.get(id) else {
        return Ok(session_gone(id));
    };
    ignore_invalid(id, controller.reset())?;
    Ok(Redirect::to(&session_location(id)).into_response())
}

/// POST /sessions/:id/retry
pub async fn handle_retry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(controller) = state.sessions.get(id) else {
        return Ok(session_gone(id));
    };
    ignore_invalid(id, controller.retry())?;
    Ok(Redirect::to(&session_location(id)).into_response())
}

/// POST /sessions/:id/input
///
/// The input form posts every button here; `action` picks what happens:
/// `load` reads the chosen file, `preview` re-renders, `analyze` submits.
pub async fn handle_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Some(controller) = state.sessions.get(id) else {
        return Ok(session_gone(id));
    };
    let form = InputForm::read(multipart).await?;

    if controller.snapshot().phase != Phase::Input {
        return Ok(Redirect::to(&session_location(id)).into_response());
    }

    let mut draft = InputDraft {
        text: form.text,
        target_role: form.target_role,
        file_name: None,
    };

    match form.action.as_str() {
        "analyze" => {
            let data = ResumeData::new(draft.text.clone(), draft.target_role.clone());
            match controller.submit(data) {
                Ok(_) => return Ok(Redirect::to(&session_location(id)).into_response()),
                // Incomplete form: stay on the input page with what was typed
                Err(TransitionError::Validation(field)) => {
                    debug!("session {id}: submit ignored, {field} is empty");
                }
                Err(e @ TransitionError::Invalid { .. }) => {
                    debug!("session {id}: {e}");
                    return Ok(Redirect::to(&session_location(id)).into_response());
                }
            }
        }
        "load" => {
            if let Some(file) = form.file {
                let upload = ingest_upload(&file.name, file.content_type.as_deref(), &file.bytes);
                draft.text = upload.text;
                draft.file_name = Some(upload.file_name);
            }
        }
        _ => {}
    }

    Ok(page(&state, id, &controller.snapshot(), &draft).into_response())
}

/// Evicted or unknown sessions send the browser back to `/` for a fresh one.
fn session_gone(id: Uuid) -> Response {
    debug!("session {id} is gone, starting over");
    Redirect::to("/").into_response()
}

fn page(state: &AppState, id: Uuid, snapshot: &SessionSnapshot, draft: &InputDraft) -> Html<String> {
    Html(render_session_page(id, snapshot, draft, state.demo_mode()))
}

/// Double-clicks and back-button resubmits land on a phase that no longer
/// accepts the event; the browser just gets the current page.
fn ignore_invalid(
    id: Uuid,
    outcome: Result<Arc<SessionSnapshot>, TransitionError>,
) -> Result<(), AppError> {
    match outcome {
        Ok(_) => Ok(()),
        Err(e @ TransitionError::Invalid { .. }) => {
            debug!("session {id}: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

#[derive(Default)]
struct InputForm {
    text: String,
    target_role: String,
    action: String,
    file: Option<UploadedFile>,
}

impl InputForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = InputForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => form.text = field.text().await?,
                "targetRole" => form.target_role = field.text().await?,
                "action" => form.action = field.text().await?,
                "file" => {
                    // browsers send an empty part when no file was chosen
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if !file_name.is_empty() {
                        form.file = Some(UploadedFile {
                            name: file_name,
                            content_type,
                            bytes,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }
}
