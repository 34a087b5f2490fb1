//! Resume text extraction. PDFs go through `pdf-extract`; plain text and
//! markdown uploads are taken as UTF-8.

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type for '{0}' (expected .pdf, .txt or .md)")]
    UnsupportedType(String),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("file is not valid UTF-8 text")]
    InvalidUtf8,

    #[error("no extractable text in '{0}'")]
    Empty(String),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Extracts text from an uploaded document. PDF parsing is CPU-bound and
/// runs on the blocking pool.
pub async fn extract_text(filename: &str, data: Bytes) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_filename(filename)
        .ok_or_else(|| ExtractError::UnsupportedType(filename.to_string()))?;

    let text = match kind {
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await??,
        DocumentKind::PlainText => {
            String::from_utf8(data.to_vec()).map_err(|_| ExtractError::InvalidUtf8)?
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty(filename.to_string()));
    }
    Ok(text)
}
