//! Resume corpus: ingestion (extract → chunk → embed → store) and management.

pub mod chunking;
pub mod embedding;
pub mod extract;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::corpus::chunking::RecursiveChunker;
use crate::corpus::embedding::{EmbeddingError, EmbeddingProvider};
use crate::corpus::extract::{extract_text, ExtractError};
use crate::corpus::store::{ResumeStore, StoreError};
use crate::models::chunk::{Chunk, StoredChunk};
use crate::models::resume::ResumeSummary;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("resume '{0}' already exists")]
    AlreadyExists(String),

    #[error("resume '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An uploaded resume file plus optional scoring metadata.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub data: Bytes,
    pub skills: Option<String>,
    pub experience_years: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub filename: String,
    pub chunks_stored: usize,
    pub upload_date: String,
}

#[derive(Clone)]
pub struct ResumeCorpus {
    store: Arc<ResumeStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: RecursiveChunker,
}

impl ResumeCorpus {
    pub fn new(
        store: Arc<ResumeStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunker: RecursiveChunker,
    ) -> Self {
        Self {
            store,
            embedder,
            chunker,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &Arc<ResumeStore> {
        &self.store
    }

    /// Adds a new resume. Fails if the filename is already stored.
    pub async fn upload(
        &self,
        upload: ResumeUpload,
        now: DateTime<Utc>,
    ) -> Result<IngestReport, CorpusError> {
        if self.store.contains(&upload.filename).await {
            return Err(CorpusError::AlreadyExists(upload.filename));
        }
        let filename = upload.filename.clone();
        let (chunks, upload_date) = self.prepare(upload, now).await?;
        let chunks_stored = chunks.len();
        if !self.store.insert_new(&filename, chunks).await? {
            return Err(CorpusError::AlreadyExists(filename));
        }

        info!("Stored resume {filename} as {chunks_stored} chunks");
        Ok(IngestReport {
            filename,
            chunks_stored,
            upload_date,
        })
    }

    /// Replaces an existing resume's chunks with a freshly ingested document.
    /// The new document is fully prepared before the old chunks are dropped,
    /// and the resume must still exist when the swap happens.
    pub async fn update(
        &self,
        upload: ResumeUpload,
        now: DateTime<Utc>,
    ) -> Result<IngestReport, CorpusError> {
        if !self.store.contains(&upload.filename).await {
            return Err(CorpusError::NotFound(upload.filename));
        }
        let filename = upload.filename.clone();
        let (chunks, upload_date) = self.prepare(upload, now).await?;
        let chunks_stored = chunks.len();
        let removed = self.store.replace(&filename, chunks).await?;
        if removed == 0 {
            return Err(CorpusError::NotFound(filename));
        }

        info!("Updated resume {filename}: {removed} chunks replaced by {chunks_stored}");
        Ok(IngestReport {
            filename,
            chunks_stored,
            upload_date,
        })
    }

    pub async fn delete(&self, filename: &str) -> Result<usize, CorpusError> {
        let removed = self.store.delete(filename).await?;
        if removed == 0 {
            return Err(CorpusError::NotFound(filename.to_string()));
        }
        info!("Deleted resume {filename} ({removed} chunks)");
        Ok(removed)
    }

    pub async fn list(&self) -> Vec<ResumeSummary> {
        self.store.list().await
    }

    async fn prepare(
        &self,
        upload: ResumeUpload,
        now: DateTime<Utc>,
    ) -> Result<(Vec<StoredChunk>, String), CorpusError> {
        let text = extract_text(&upload.filename, upload.data).await?;
        let pieces = self.chunker.split(&text);
        if pieces.is_empty() {
            return Err(ExtractError::Empty(upload.filename).into());
        }

        let refs: Vec<&str> = pieces.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_batch(&refs).await?;
        if embeddings.len() != pieces.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: pieces.len(),
                actual: embeddings.len(),
            }
            .into());
        }

        let upload_date = now.to_rfc3339();
        let skills = upload.skills.unwrap_or_default();
        let experience_years = upload.experience_years.unwrap_or(0.0);

        let chunks = pieces
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| StoredChunk {
                id: Uuid::new_v4(),
                chunk: Chunk {
                    text,
                    filename: upload.filename.clone(),
                    upload_date: Some(upload_date.clone()),
                    skills: skills.clone(),
                    experience_years,
                },
                embedding,
            })
            .collect();

        Ok((chunks, upload_date))
    }
}
