//! Natural-language justification for ranked resumes.
//!
//! Every resume gets its own LLM call; a failed call turns into an inline
//! diagnostic for that resume only.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::prompts::{
    build_explanation_prompt, build_recommendation_prompt, EXPLANATION_SYSTEM,
    NO_RESULTS_MESSAGE, RECOMMENDATION_SYSTEM,
};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::{ScoredResume, ShortlistEntry};

/// Text generation backend for explanations. `AppState` holds an
/// `Arc<dyn Explainer>`; the default is [`LlmExplainer`].
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, job_description: &str, chunk_texts: &[String])
        -> Result<String, LlmError>;

    async fn recommend(&self, job_description: &str, ranking: &str) -> Result<String, LlmError>;
}

pub struct LlmExplainer(pub LlmClient);

#[async_trait]
impl Explainer for LlmExplainer {
    async fn explain(
        &self,
        job_description: &str,
        chunk_texts: &[String],
    ) -> Result<String, LlmError> {
        let prompt = build_explanation_prompt(job_description, &chunk_texts.join("\n\n"));
        self.0.complete(&prompt, EXPLANATION_SYSTEM).await
    }

    async fn recommend(&self, job_description: &str, ranking: &str) -> Result<String, LlmError> {
        let prompt = build_recommendation_prompt(job_description, ranking);
        self.0.complete(&prompt, RECOMMENDATION_SYSTEM).await
    }
}

/// Attaches an analysis to each ranked resume, in rank order.
pub async fn explain_ranked(
    explainer: &dyn Explainer,
    job_description: &str,
    ranked: Vec<ScoredResume>,
) -> Vec<ShortlistEntry> {
    let mut entries = Vec::with_capacity(ranked.len());

    for (i, resume) in ranked.into_iter().enumerate() {
        let (analysis, analysis_failed) = match explainer
            .explain(job_description, &resume.representative_content)
            .await
        {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("Explanation failed for {}: {e}", resume.filename);
                (format!("Analysis unavailable: {e}"), true)
            }
        };

        entries.push(ShortlistEntry {
            rank: i + 1,
            filename: resume.filename,
            score: resume.score,
            chunks_found: resume.chunk_count,
            analysis,
            analysis_failed,
        });
    }

    info!(
        "Explained {} resumes ({} failed)",
        entries.len(),
        entries.iter().filter(|e| e.analysis_failed).count()
    );
    entries
}

/// Renders a ranking as `--- Rank i: filename ---` blocks followed by content.
pub fn format_ranking(ranked: &[ScoredResume]) -> String {
    ranked
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "\n--- Rank {}: {} ---\n{}",
                i + 1,
                r.filename,
                r.representative_content.join("\n\n")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single recruiter-style recommendation over the whole ranking.
/// Returns `(text, failed)`; nothing is sent to the LLM for an empty ranking.
pub async fn recommend(
    explainer: &dyn Explainer,
    job_description: &str,
    ranked: &[ScoredResume],
) -> (String, bool) {
    if ranked.is_empty() {
        return (NO_RESULTS_MESSAGE.to_string(), false);
    }
    match explainer
        .recommend(job_description, &format_ranking(ranked))
        .await
    {
        Ok(text) => (text, false),
        Err(e) => {
            warn!("Recommendation failed: {e}");
            (format!("Recommendation unavailable: {e}"), true)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::EchoExplainer;
    use super::*;
    use std::sync::atomic::Ordering;

    fn scored(filename: &str, texts: &[&str]) -> ScoredResume {
        ScoredResume {
            filename: filename.to_string(),
            score: 0.5,
            representative_content: texts.iter().map(|t| t.to_string()).collect(),
            chunk_count: texts.len(),
        }
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_one_resume() {
        let ranked = vec![
            scored("good.pdf", &["rust", "sql"]),
            scored("bad.pdf", &["FAIL here"]),
            scored("also-good.pdf", &["go"]),
        ];
        let entries = explain_ranked(&EchoExplainer::default(), "jd", ranked).await;

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].analysis, "analysis of 2 chunks");
        assert!(!entries[0].analysis_failed);
        assert!(entries[1].analysis_failed);
        assert!(entries[1].analysis.starts_with("Analysis unavailable:"));
        assert!(entries[1].analysis.contains("model crashed"));
        assert!(!entries[2].analysis_failed);
        assert_eq!(
            entries.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_format_ranking_blocks() {
        let text = format_ranking(&[scored("a.pdf", &["one", "two"]), scored("b.pdf", &["three"])]);
        assert_eq!(
            text,
            "\n--- Rank 1: a.pdf ---\none\n\ntwo\n\n--- Rank 2: b.pdf ---\nthree"
        );
    }

    #[tokio::test]
    async fn test_recommend_empty_ranking_skips_llm() {
        let explainer = EchoExplainer::default();
        let (text, failed) = recommend(&explainer, "jd", &[]).await;
        assert_eq!(text, NO_RESULTS_MESSAGE);
        assert!(!failed);
        assert_eq!(explainer.recommend_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recommend_failure_is_inline() {
        let explainer = EchoExplainer {
            fail_recommend: true,
            ..Default::default()
        };
        let (text, failed) = recommend(&explainer, "jd", &[scored("a.pdf", &["x"])]).await;
        assert!(failed);
        assert!(text.starts_with("Recommendation unavailable:"));
    }

    #[test]
    fn test_explanation_prompt_includes_inputs() {
        let prompt = build_explanation_prompt("Rust dev", "Built tokio services");
        assert!(prompt.contains("Job Description:\nRust dev"));
        assert!(prompt.contains("Resume Content:\nBuilt tokio services"));
        assert!(prompt.contains("10-15 sentence"));
    }
}
