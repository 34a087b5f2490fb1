use std::sync::Arc;

use crate::config::Config;
use crate::corpus::ResumeCorpus;
use crate::ranking::driver::RankingDriver;
use crate::ranking::explain::Explainer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub corpus: ResumeCorpus,
    /// Retrieval + scoring over the same store the corpus writes to.
    pub ranker: RankingDriver,
    /// Pluggable explanation backend. Default: LlmExplainer.
    pub explainer: Arc<dyn Explainer>,
    pub config: Config,
}
