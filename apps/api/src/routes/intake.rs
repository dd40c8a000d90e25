//! Stateless JSON endpoints: uploads, preview, one-shot analysis.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::intake::preview::{render_preview, PreviewLine};
use crate::intake::upload::{ingest_upload, UploadedResume};
use crate::models::analysis::{AnalysisResult, ResumeData};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub upload: UploadedResume,
    pub preview: Vec<PreviewLine>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub lines: Vec<PreviewLine>,
}

/// POST /api/v1/uploads
///
/// Reads the multipart `file` field. Plain text comes back verbatim, other
/// files come back as the paste-it-yourself placeholder.
pub async fn handle_upload(mut multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let upload = ingest_upload(&file_name, content_type.as_deref(), &bytes);
        let preview = render_preview(&upload.text);
        return Ok(Json(UploadResponse { upload, preview }));
    }

    Err(AppError::Validation("file field is required".to_string()))
}

/// POST /api/v1/preview
pub async fn handle_preview(Json(request): Json<PreviewRequest>) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        lines: render_preview(&request.text),
    })
}

/// POST /api/v1/analyze
///
/// Runs one analysis outside any session.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(data): Json<ResumeData>,
) -> Result<Json<AnalysisResult>, AppError> {
    if let Some(field) = data.missing_field() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }

    let result = state.analyzer.analyze(&data.text, &data.target_role).await?;
    Ok(Json(result))
}
