mod config;
mod corpus;
mod errors;
mod llm_client;
mod models;
mod ranking;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::chunking::RecursiveChunker;
use crate::corpus::embedding::{EmbeddingProvider, HttpEmbeddingProvider};
use crate::corpus::store::ResumeStore;
use crate::corpus::ResumeCorpus;
use crate::llm_client::LlmClient;
use crate::ranking::driver::{RankingDriver, RetrievalPolicy};
use crate::ranking::explain::LlmExplainer;
use crate::ranking::retriever::VectorRetriever;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric settings)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    // Resume store (JSON snapshot on disk)
    let store = Arc::new(ResumeStore::open(&config.corpus_path).await?);
    info!("Resume store opened at {}", config.corpus_path);

    // Embedding backend
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HttpEmbeddingProvider::new(
        &config.embedding_base_url,
        config.embedding_model.clone(),
        config.llm_api_key.clone(),
    )?);
    info!(
        "Embedding client initialized (model: {})",
        config.embedding_model
    );

    // LLM client
    let llm = LlmClient::new(
        &config.llm_base_url,
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let corpus = ResumeCorpus::new(
        store.clone(),
        embedder.clone(),
        RecursiveChunker::new(config.chunk_size, config.chunk_overlap),
    );
    let ranker = RankingDriver::new(
        Arc::new(VectorRetriever::new(store, embedder)),
        RetrievalPolicy::default(),
    );

    let state = AppState {
        corpus,
        ranker,
        explainer: Arc::new(LlmExplainer(llm)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
