//! Axum route handlers for the Ranking API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::{ScoredResume, ShortlistEntry};
use crate::ranking::explain::{explain_ranked, recommend};
use crate::state::AppState;

const MAX_TOP_K: usize = 10;
const DEFAULT_RANK_TOP_K: usize = 5;
const DEFAULT_RECOMMEND_TOP_K: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub results: Vec<ScoredResume>,
}

#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    pub results: Vec<ShortlistEntry>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendation: String,
    pub recommendation_failed: bool,
    pub ranking: Vec<ScoredResume>,
}

fn resolve_top_k(requested: Option<usize>, default: usize) -> Result<usize, AppError> {
    let top_k = requested.unwrap_or(default);
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(AppError::Validation(format!(
            "top_k must be between 1 and {MAX_TOP_K}, got {top_k}"
        )));
    }
    Ok(top_k)
}

/// Ranks the corpus; a blank job description ranks nothing.
async fn rank_for(state: &AppState, job_description: &str, top_k: usize) -> Vec<ScoredResume> {
    if job_description.trim().is_empty() {
        return Vec::new();
    }
    state.ranker.rank(job_description, top_k, Utc::now()).await
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rank
///
/// Scored, grouped top-K resumes without LLM analysis.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let top_k = resolve_top_k(request.top_k, DEFAULT_RANK_TOP_K)?;
    let results = rank_for(&state, &request.job_description, top_k).await;
    Ok(Json(RankResponse { results }))
}

/// POST /api/v1/shortlist
///
/// Ranking plus a per-resume match analysis. A failed analysis is reported
/// inline on that entry and never fails the request.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<ShortlistResponse>, AppError> {
    let top_k = resolve_top_k(request.top_k, DEFAULT_RANK_TOP_K)?;
    let ranked = rank_for(&state, &request.job_description, top_k).await;
    let results = explain_ranked(state.explainer.as_ref(), &request.job_description, ranked).await;
    Ok(Json(ShortlistResponse { results }))
}

/// POST /api/v1/recommend
///
/// Ranking plus one recruiter recommendation grounded in the ranked resumes.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    let top_k = resolve_top_k(request.top_k, DEFAULT_RECOMMEND_TOP_K)?;
    let ranking = rank_for(&state, &request.job_description, top_k).await;
    let (recommendation, recommendation_failed) =
        recommend(state.explainer.as_ref(), &request.job_description, &ranking).await;
    Ok(Json(RecommendResponse {
        recommendation,
        recommendation_failed,
        ranking,
    }))
}
