pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::corpus::handlers as corpus;
use crate::ranking::handlers as ranking;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume corpus
        .route(
            "/api/v1/resumes",
            get(corpus::handle_list_resumes).post(corpus::handle_upload_resume),
        )
        .route(
            "/api/v1/resumes/:filename",
            put(corpus::handle_update_resume).delete(corpus::handle_delete_resume),
        )
        // Ranking
        .route("/api/v1/rank", post(ranking::handle_rank))
        .route("/api/v1/shortlist", post(ranking::handle_shortlist))
        .route("/api/v1/recommend", post(ranking::handle_recommend))
        .with_state(state)
}
