//! Relevance scoring: turns retrieval hits into a ranked list of resumes.
//!
//! Per chunk:
//!   0.5*similarity + 0.3*skill_overlap + 0.1*experience + 0.1*recency
//! Per resume: the best chunk score. Resumes are sorted descending (stable,
//! so ties keep retrieval order) and truncated to `top_k`.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::chunk::{Chunk, RetrievalHit};
use crate::models::resume::ScoredResume;

/// Number of chunk texts kept per resume for explanations.
pub const REPRESENTATIVE_CHUNKS: usize = 3;
/// Recency decay constant, in days.
pub const RECENCY_DECAY_DAYS: f64 = 180.0;
/// Years of experience at which the experience term saturates.
pub const EXPERIENCE_SATURATION_YEARS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub similarity: f64,
    pub skill_overlap: f64,
    pub experience: f64,
    pub recency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            similarity: 0.5,
            skill_overlap: 0.3,
            experience: 0.1,
            recency: 0.1,
        }
    }
}

/// Lowercased whitespace tokens of a job description.
pub fn job_tokens(job_description: &str) -> HashSet<String> {
    job_description
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Lowercased, trimmed comma-separated skill tokens. Empty tokens are dropped.
pub fn skill_tokens(skills: &str) -> HashSet<String> {
    skills
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn compute_similarity(distance: f64) -> f64 {
    1.0 - distance
}

pub fn compute_skill_overlap(job_tokens: &HashSet<String>, skills: &str) -> usize {
    skill_tokens(skills)
        .iter()
        .filter(|s| job_tokens.contains(*s))
        .count()
}

/// `min(years / 10, 1.0)`. Negative or NaN input counts as zero experience.
pub fn compute_experience_score(experience_years: f64) -> f64 {
    if experience_years.is_nan() || experience_years <= 0.0 {
        return 0.0;
    }
    (experience_years / EXPERIENCE_SATURATION_YEARS).min(1.0)
}

/// Exponential decay over whole elapsed days since upload.
/// Returns 0.0 when the timestamp is missing or unparsable.
pub fn compute_recency_score(upload_date: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(uploaded) = upload_date.and_then(parse_timestamp) else {
        return 0.0;
    };
    let days = (now - uploaded).num_days().max(0);
    (-(days as f64) / RECENCY_DECAY_DAYS).exp()
}

/// Parses RFC 3339, naive ISO-8601 date-times (read as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Weighted relevance of a single chunk.
pub fn score_chunk(
    chunk: &Chunk,
    distance: f64,
    job_tokens: &HashSet<String>,
    now: DateTime<Utc>,
    weights: &ScoringWeights,
) -> f64 {
    let similarity = compute_similarity(distance);
    let overlap = compute_skill_overlap(job_tokens, &chunk.skills) as f64;
    let experience = compute_experience_score(chunk.experience_years);
    let recency = compute_recency_score(chunk.upload_date.as_deref(), now);

    weights.similarity * similarity
        + weights.skill_overlap * overlap
        + weights.experience * experience
        + weights.recency * recency
}

/// Scores every hit, groups by filename and returns the best `top_k` resumes.
pub fn score_hits(
    job_description: &str,
    hits: &[RetrievalHit],
    now: DateTime<Utc>,
    top_k: usize,
    weights: &ScoringWeights,
) -> Vec<ScoredResume> {
    if hits.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let tokens = job_tokens(job_description);

    // Groups in first-appearance order; the index map points into `groups`.
    let mut groups: Vec<ScoredResume> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for hit in hits {
        let score = score_chunk(&hit.chunk, hit.distance, &tokens, now, weights);
        let filename = hit.chunk.filename.as_str();

        match index.get(filename) {
            Some(&i) => {
                let group = &mut groups[i];
                group.score = group.score.max(score);
                group.chunk_count += 1;
                if group.representative_content.len() < REPRESENTATIVE_CHUNKS {
                    group.representative_content.push(hit.chunk.text.clone());
                }
            }
            None => {
                index.insert(filename, groups.len());
                groups.push(ScoredResume {
                    filename: filename.to_string(),
                    score,
                    representative_content: vec![hit.chunk.text.clone()],
                    chunk_count: 1,
                });
            }
        }
    }

    // sort_by is stable: equal scores keep retrieval order
    groups.sort_by(|a, b| b.score.total_cmp(&a.score));
    groups.truncate(top_k);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn hit(
        filename: &str,
        text: &str,
        distance: f64,
        skills: &str,
        experience_years: f64,
        upload_date: Option<String>,
    ) -> RetrievalHit {
        RetrievalHit {
            chunk: Chunk {
                text: text.to_string(),
                filename: filename.to_string(),
                upload_date,
                skills: skills.to_string(),
                experience_years,
            },
            distance,
        }
    }

    fn days_ago(days: i64) -> Option<String> {
        Some((fixed_now() - Duration::days(days)).to_rfc3339())
    }

    #[test]
    fn test_worked_example_ranks_a_before_b() {
        let hits = vec![
            hit("a.pdf", "A text", 0.2, "python,sql", 5.0, days_ago(0)),
            hit("b.pdf", "B text", 0.5, "java", 2.0, days_ago(200)),
        ];
        let ranked = score_hits(
            "python developer",
            &hits,
            fixed_now(),
            5,
            &ScoringWeights::default(),
        );

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].filename, "a.pdf");
        assert_eq!(ranked[1].filename, "b.pdf");
        // 0.5*0.8 + 0.3*1 + 0.1*0.5 + 0.1*1.0
        assert!((ranked[0].score - 0.85).abs() < 1e-9, "A was {}", ranked[0].score);

        // 0.5*0.5 + 0.3*0 + 0.1*0.2 + 0.1*exp(-200/180)
        let expected_b = 0.25 + 0.02 + 0.1 * (-200.0_f64 / 180.0).exp();
        assert!((ranked[1].score - expected_b).abs() < 1e-9, "B was {}", ranked[1].score);
    }

    #[test]
    fn test_similarity_decreases_with_distance() {
        let mut previous = f64::INFINITY;
        for step in 0..=20 {
            let s = compute_similarity(step as f64 * 0.1);
            assert!(s < previous);
            previous = s;
        }
        assert!(compute_similarity(1.5) < 0.0);
    }

    #[test]
    fn test_skill_overlap_ignores_case() {
        let lower = compute_skill_overlap(&job_tokens("python developer"), "python, sql");
        let upper = compute_skill_overlap(&job_tokens("PYTHON Developer"), "Python , SQL");
        assert_eq!(lower, 1);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_empty_job_description_has_no_overlap() {
        assert_eq!(compute_skill_overlap(&job_tokens(""), "python,sql"), 0);
    }

    #[test]
    fn test_empty_skills_never_match() {
        assert_eq!(compute_skill_overlap(&job_tokens("python , sql"), ""), 0);
        assert_eq!(compute_skill_overlap(&job_tokens("a b"), ",,"), 0);
    }

    #[test]
    fn test_experience_saturates_at_ten_years() {
        assert_eq!(compute_experience_score(0.0), 0.0);
        assert!((compute_experience_score(5.0) - 0.5).abs() < 1e-12);
        assert_eq!(compute_experience_score(10.0), 1.0);
        assert_eq!(compute_experience_score(25.0), 1.0);
        assert_eq!(compute_experience_score(-3.0), 0.0);
    }

    #[test]
    fn test_recency_today_is_one() {
        let score = compute_recency_score(days_ago(0).as_deref(), fixed_now());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_recency_decreases_with_age() {
        let mut previous = f64::INFINITY;
        for days in [0, 1, 30, 180, 365, 2000] {
            let s = compute_recency_score(days_ago(days).as_deref(), fixed_now());
            assert!(s < previous, "{days} days scored {s}");
            previous = s;
        }
    }

    #[test]
    fn test_recency_future_upload_clamped_to_one() {
        let score = compute_recency_score(days_ago(-10).as_deref(), fixed_now());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_recency_missing_or_malformed_is_zero() {
        assert_eq!(compute_recency_score(None, fixed_now()), 0.0);
        assert_eq!(compute_recency_score(Some("last tuesday"), fixed_now()), 0.0);
        assert_eq!(compute_recency_score(Some(""), fixed_now()), 0.0);
    }

    #[test]
    fn test_parse_timestamp_accepts_naive_iso() {
        let parsed = parse_timestamp("2025-05-31T12:00:00.123456").unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
        assert!(parse_timestamp("2025-05-31").is_some());
        assert!(parse_timestamp("2025-05-31T12:00:00+02:00").is_some());
    }

    #[test]
    fn test_groups_by_filename_keeping_best_score() {
        let hits = vec![
            hit("a.pdf", "a1", 0.9, "", 0.0, None),
            hit("b.pdf", "b1", 0.4, "", 0.0, None),
            hit("a.pdf", "a2", 0.1, "", 0.0, None),
            hit("a.pdf", "a3", 0.6, "", 0.0, None),
            hit("a.pdf", "a4", 0.7, "", 0.0, None),
        ];
        let ranked = score_hits("", &hits, fixed_now(), 10, &ScoringWeights::default());

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].filename, "a.pdf");
        assert!((ranked[0].score - 0.45).abs() < 1e-9);
        assert_eq!(ranked[0].chunk_count, 4);
        assert_eq!(ranked[0].representative_content, vec!["a1", "a2", "a3"]);
        assert_eq!(ranked[1].chunk_count, 1);
    }

    #[test]
    fn test_ties_keep_retrieval_order() {
        let hits = vec![
            hit("first.pdf", "x", 0.3, "", 0.0, None),
            hit("second.pdf", "y", 0.3, "", 0.0, None),
            hit("third.pdf", "z", 0.3, "", 0.0, None),
        ];
        let ranked = score_hits("", &hits, fixed_now(), 3, &ScoringWeights::default());
        let names: Vec<_> = ranked.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["first.pdf", "second.pdf", "third.pdf"]);
    }

    #[test]
    fn test_truncation_is_a_prefix() {
        let hits: Vec<_> = (0..8)
            .map(|i| {
                hit(
                    &format!("r{}.pdf", i % 5),
                    "t",
                    (i as f64 * 0.37) % 1.2,
                    "rust",
                    i as f64,
                    days_ago(i * 40),
                )
            })
            .collect();
        let w = ScoringWeights::default();
        let full = score_hits("rust engineer", &hits, fixed_now(), 10, &w);
        for k in 0..full.len() {
            let shorter = score_hits("rust engineer", &hits, fixed_now(), k, &w);
            let longer = score_hits("rust engineer", &hits, fixed_now(), k + 1, &w);
            assert_eq!(shorter.len(), k);
            assert_eq!(shorter[..], longer[..k]);
        }
    }

    #[test]
    fn test_scoring_is_idempotent_with_fixed_clock() {
        let hits = vec![
            hit("a.pdf", "a", 0.3, "go,rust", 3.0, days_ago(12)),
            hit("b.pdf", "b", 0.2, "java", 7.0, Some("garbage".to_string())),
        ];
        let w = ScoringWeights::default();
        let first = score_hits("rust", &hits, fixed_now(), 5, &w);
        let second = score_hits("rust", &hits, fixed_now(), 5, &w);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_hits_returns_empty() {
        let ranked = score_hits("anything", &[], fixed_now(), 5, &ScoringWeights::default());
        assert!(ranked.is_empty());
    }
}
