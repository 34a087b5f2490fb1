//! Axum route handlers for the Resume corpus API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;

use crate::corpus::{IngestReport, ResumeUpload};
use crate::errors::AppError;
use crate::models::resume::ResumeSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub total: usize,
    pub resumes: Vec<ResumeSummary>,
}

/// Multipart fields: `file` (required), `skills`, `experience_years`.
#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    data: Option<Bytes>,
    skills: Option<String>,
    experience_years: Option<f64>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(str::to_string);
                form.data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?,
                );
            }
            "skills" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid skills field: {e}")))?;
                form.skills = Some(text.trim().to_string());
            }
            "experience_years" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Invalid experience_years field: {e}"))
                })?;
                let years = text.trim().parse::<f64>().map_err(|_| {
                    AppError::Validation(format!("experience_years must be a number, got '{text}'"))
                })?;
                if !years.is_finite() || years < 0.0 {
                    return Err(AppError::Validation(
                        "experience_years must be a non-negative number".to_string(),
                    ));
                }
                form.experience_years = Some(years);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn into_upload(form: UploadForm, filename: String) -> Result<ResumeUpload, AppError> {
    let data = form
        .data
        .ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    Ok(ResumeUpload {
        filename,
        data,
        skills: form.skills,
        experience_years: form.experience_years,
    })
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(State(state): State<AppState>) -> Json<ResumeListResponse> {
    let resumes = state.corpus.list().await;
    Json(ResumeListResponse {
        total: resumes.len(),
        resumes,
    })
}

/// POST /api/v1/resumes
///
/// Uploads a new resume under the file's own name.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<IngestReport>), AppError> {
    let form = read_upload_form(multipart).await?;
    let filename = form
        .file_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Uploaded file must have a name".to_string()))?;
    let upload = into_upload(form, filename)?;

    let report = state.corpus.upload(upload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// PUT /api/v1/resumes/:filename
///
/// Replaces the stored content of `filename` with the uploaded document.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    multipart: Multipart,
) -> Result<Json<IngestReport>, AppError> {
    let form = read_upload_form(multipart).await?;
    let upload = into_upload(form, filename)?;
    let report = state.corpus.update(upload, Utc::now()).await?;
    Ok(Json(report))
}

/// DELETE /api/v1/resumes/:filename
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<StatusCode, AppError> {
    state.corpus.delete(&filename).await?;
    Ok(StatusCode::NO_CONTENT)
}
