//! In-memory resume vector store with a JSON snapshot on disk.
//!
//! Chunks are kept in insertion order so that equal-distance search results
//! come back deterministically. Every mutation rewrites the snapshot
//! (temp file + rename) when a path is configured, and only takes effect in
//! memory once that write succeeds.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::chunk::{RetrievalHit, StoredChunk};
use crate::models::resume::ResumeSummary;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    Version(u32),
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    chunks: Vec<StoredChunk>,
}

#[derive(Debug, Default)]
pub struct ResumeStore {
    chunks: RwLock<Vec<StoredChunk>>,
    snapshot_path: Option<PathBuf>,
}

impl ResumeStore {
    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a store backed by `path`. A missing file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let chunks = match tokio::fs::read(&path).await {
            Ok(raw) => {
                let snapshot: Snapshot = serde_json::from_slice(&raw)?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(StoreError::Version(snapshot.version));
                }
                info!(
                    "Loaded {} chunks from {}",
                    snapshot.chunks.len(),
                    path.display()
                );
                snapshot.chunks
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot at {}; starting empty", path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            chunks: RwLock::new(chunks),
            snapshot_path: Some(path),
        })
    }

    pub async fn contains(&self, filename: &str) -> bool {
        self.chunks
            .read()
            .await
            .iter()
            .any(|c| c.chunk.filename == filename)
    }

    #[cfg(test)]
    pub async fn insert(&self, new_chunks: Vec<StoredChunk>) -> Result<(), StoreError> {
        let mut chunks = self.chunks.write().await;
        let mut next = chunks.clone();
        next.extend(new_chunks);
        self.persist(&next).await?;
        *chunks = next;
        Ok(())
    }

    /// Adds the chunks of a new resume unless `filename` is already stored.
    /// Returns false, storing nothing, when it is.
    pub async fn insert_new(
        &self,
        filename: &str,
        new_chunks: Vec<StoredChunk>,
    ) -> Result<bool, StoreError> {
        let mut chunks = self.chunks.write().await;
        if chunks.iter().any(|c| c.chunk.filename == filename) {
            return Ok(false);
        }
        let mut next = chunks.clone();
        next.extend(new_chunks);
        self.persist(&next).await?;
        *chunks = next;
        Ok(true)
    }

    /// Replaces every chunk of `filename` with `new_chunks` under one write lock.
    /// Returns how many chunks were removed; when that is 0 nothing is stored.
    pub async fn replace(
        &self,
        filename: &str,
        new_chunks: Vec<StoredChunk>,
    ) -> Result<usize, StoreError> {
        let mut chunks = self.chunks.write().await;
        let mut next = without_filename(&chunks, filename);
        let removed = chunks.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }
        next.extend(new_chunks);
        self.persist(&next).await?;
        *chunks = next;
        Ok(removed)
    }

    /// Removes every chunk belonging to `filename`. Returns how many were removed.
    pub async fn delete(&self, filename: &str) -> Result<usize, StoreError> {
        let mut chunks = self.chunks.write().await;
        let next = without_filename(&chunks, filename);
        let removed = chunks.len() - next.len();
        if removed > 0 {
            self.persist(&next).await?;
            *chunks = next;
        }
        Ok(removed)
    }

    /// One summary per filename, in first-upload order.
    pub async fn list(&self) -> Vec<ResumeSummary> {
        let chunks = self.chunks.read().await;
        let mut summaries: Vec<ResumeSummary> = Vec::new();
        for stored in chunks.iter() {
            match summaries
                .iter_mut()
                .find(|s| s.filename == stored.chunk.filename)
            {
                Some(summary) => summary.chunk_count += 1,
                None => summaries.push(ResumeSummary {
                    filename: stored.chunk.filename.clone(),
                    upload_date: stored.chunk.upload_date.clone(),
                    chunk_count: 1,
                }),
            }
        }
        summaries
    }

    /// The `k` chunks closest to `embedding` by cosine distance, nearest first.
    pub async fn search(&self, embedding: &[f32], k: usize) -> Vec<RetrievalHit> {
        let chunks = self.chunks.read().await;
        let mut hits: Vec<RetrievalHit> = chunks
            .iter()
            .map(|stored| RetrievalHit {
                chunk: stored.chunk.clone(),
                distance: cosine_distance(&stored.embedding, embedding),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        debug!("Vector search returned {} of {} chunks", hits.len(), chunks.len());
        hits
    }

    async fn persist(&self, chunks: &[StoredChunk]) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        write_snapshot(path, chunks).await
    }
}

fn without_filename(chunks: &[StoredChunk], filename: &str) -> Vec<StoredChunk> {
    chunks
        .iter()
        .filter(|c| c.chunk.filename != filename)
        .cloned()
        .collect()
}

async fn write_snapshot(path: &Path, chunks: &[StoredChunk]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec(&Snapshot {
        version: SNAPSHOT_VERSION,
        chunks: chunks.to_vec(),
    })?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!("Wrote snapshot of {} chunks to {}", chunks.len(), path.display());
    Ok(())
}

/// `1 - cos(a, b)`, in [0, 2]. A zero vector is treated as orthogonal (distance 1).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 2.0)
}
