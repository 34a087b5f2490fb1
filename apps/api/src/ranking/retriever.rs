//! Retriever seam between the ranking driver and the vector store.
//!
//! `AppState` carries an `Arc<dyn Retriever>`; tests swap in scripted ones.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::corpus::embedding::{EmbeddingError, EmbeddingProvider};
use crate::corpus::store::ResumeStore;
use crate::models::chunk::RetrievalHit;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Returns up to `k` hits for `query`, nearest first.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievalHit>, RetrievalError>;
}

/// Embeds the query and searches the local resume store.
pub struct VectorRetriever {
    store: Arc<ResumeStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorRetriever {
    pub fn new(store: Arc<ResumeStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievalHit>, RetrievalError> {
        let embedding = self.embedder.embed(query).await?;
        Ok(self.store.search(&embedding, k).await)
    }
}
