use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A slice of a resume's text plus the metadata the scorer reads.
/// Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub filename: String,
    /// ISO-8601 timestamp. Kept as the raw string so legacy or malformed
    /// values survive a snapshot round trip; the scorer parses it lazily.
    #[serde(default)]
    pub upload_date: Option<String>,
    /// Comma-separated skill tokens.
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience_years: f64,
}

/// A chunk as persisted in the corpus, with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: Uuid,
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// One retrieval result. `distance` is cosine distance (lower = closer), in [0, 2].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub chunk: Chunk,
    pub distance: f64,
}
