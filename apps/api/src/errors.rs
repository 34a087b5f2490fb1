use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::corpus::extract::ExtractError;
use crate::corpus::CorpusError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CorpusError> for AppError {
    fn from(err: CorpusError) -> Self {
        match err {
            CorpusError::AlreadyExists(name) => {
                AppError::Conflict(format!("Resume '{name}' already exists; use update"))
            }
            CorpusError::NotFound(name) => AppError::NotFound(format!("Resume '{name}' not found")),
            CorpusError::Extract(e @ ExtractError::UnsupportedType(_)) => {
                AppError::Validation(e.to_string())
            }
            CorpusError::Extract(e @ ExtractError::Join(_)) => AppError::Internal(e.into()),
            CorpusError::Extract(e) => AppError::UnprocessableEntity(e.to_string()),
            CorpusError::Embedding(e) => AppError::Embedding(e.to_string()),
            CorpusError::Store(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Embedding(msg) => {
                tracing::error!("Embedding error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMBEDDING_ERROR",
                    "The embedding backend could not process the document".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_errors_map_to_http_status() {
        let cases = [
            (CorpusError::AlreadyExists("a.pdf".into()), StatusCode::CONFLICT),
            (CorpusError::NotFound("a.pdf".into()), StatusCode::NOT_FOUND),
            (
                CorpusError::Extract(ExtractError::UnsupportedType("a.exe".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                CorpusError::Extract(ExtractError::Empty("a.pdf".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
