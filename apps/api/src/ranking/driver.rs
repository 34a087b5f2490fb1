//! Ranking driver: bounded query, over-fetching retrieval with retry, then scoring.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::models::chunk::RetrievalHit;
use crate::models::resume::ScoredResume;
use crate::ranking::retriever::Retriever;
use crate::ranking::scoring::{score_hits, ScoringWeights};

#[derive(Debug, Clone)]
pub struct RetrievalPolicy {
    /// Hits requested per wanted resume.
    pub fanout_per_result: usize,
    /// Upper bound on hits requested from the retriever.
    pub fanout_cap: usize,
    /// Longest query sent to the retriever, in chars.
    pub max_query_chars: usize,
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            fanout_per_result: 3,
            fanout_cap: 20,
            max_query_chars: 1000,
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetrievalPolicy {
    pub fn fanout(&self, top_k: usize) -> usize {
        top_k.saturating_mul(self.fanout_per_result).min(self.fanout_cap)
    }
}

#[derive(Clone)]
pub struct RankingDriver {
    retriever: Arc<dyn Retriever>,
    policy: RetrievalPolicy,
    weights: ScoringWeights,
}

impl RankingDriver {
    pub fn new(retriever: Arc<dyn Retriever>, policy: RetrievalPolicy) -> Self {
        Self {
            retriever,
            policy,
            weights: ScoringWeights::default(),
        }
    }

    /// Ranks stored resumes against a job description. Never fails: an
    /// unreachable retriever degrades to an empty ranking.
    pub async fn rank(
        &self,
        job_description: &str,
        top_k: usize,
        now: DateTime<Utc>,
    ) -> Vec<ScoredResume> {
        if top_k == 0 {
            return Vec::new();
        }
        let query = truncate_query(job_description, self.policy.max_query_chars);
        let hits = self.retrieve_with_retry(query, self.policy.fanout(top_k)).await;
        let ranked = score_hits(job_description, &hits, now, top_k, &self.weights);
        info!(
            "Ranked {} resumes from {} hits (top_k={top_k})",
            ranked.len(),
            hits.len()
        );
        ranked
    }

    async fn retrieve_with_retry(&self, query: &str, k: usize) -> Vec<RetrievalHit> {
        for attempt in 1..=self.policy.max_attempts {
            match self.retriever.retrieve(query, k).await {
                Ok(hits) => return hits,
                Err(e) if attempt < self.policy.max_attempts => {
                    warn!(
                        "Retrieval attempt {attempt} failed: {e}; retrying after {}ms",
                        self.policy.backoff.as_millis()
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                }
                Err(e) => {
                    warn!("Retrieval failed after {attempt} attempts: {e}; returning no hits");
                }
            }
        }
        Vec::new()
    }
}

/// Cuts `text` to at most `max_chars` chars, backing off to the last
/// whitespace in the window when that leaves a non-empty query.
pub fn truncate_query(text: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };
    let window = &text[..cut];
    let starts_mid_word = text[cut..].starts_with(|c: char| !c.is_whitespace());
    if starts_mid_word {
        if let Some(space) = window.rfind(char::is_whitespace) {
            let backed_off = window[..space].trim_end();
            if !backed_off.is_empty() {
                return backed_off;
            }
        }
    }
    window
}
