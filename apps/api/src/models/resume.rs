use serde::{Deserialize, Serialize};

/// A resume ranked against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResume {
    pub filename: String,
    /// Best per-chunk relevance score for this resume.
    pub score: f64,
    /// First three matching chunk texts, in retrieval order.
    pub representative_content: Vec<String>,
    /// Number of retrieved chunks belonging to this resume.
    pub chunk_count: usize,
}

/// Listing entry for a stored resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub filename: String,
    pub upload_date: Option<String>,
    pub chunk_count: usize,
}

/// A ranked resume together with its LLM match analysis.
///
/// When the explanation call fails, `analysis` carries the diagnostic and
/// `analysis_failed` is set; the rest of the shortlist is unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistEntry {
    pub rank: usize,
    pub filename: String,
    pub score: f64,
    pub chunks_found: usize,
    pub analysis: String,
    pub analysis_failed: bool,
}
