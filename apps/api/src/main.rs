mod config;
mod errors;
mod generation;
mod import;
mod jobs;
mod llm_client;
mod models;
mod render;
mod routes;
mod scoring;
mod session;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::llm::LlmOptionGenerator;
use crate::generation::rewrite::RuleBasedGenerator;
use crate::generation::OptionGenerator;
use crate::import::TextPdfImporter;
use crate::jobs::JobFetcher;
use crate::llm_client::LlmClient;
use crate::render::TextRenderer;
use crate::routes::build_router;
use crate::session::registry::EvictionPolicy;
use crate::session::SessionRegistry;
use crate::state::AppState;
use crate::storage::FileResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting résumé API v{}", env!("CARGO_PKG_VERSION"));

    let scoring = config.scoring_config()?;
    info!(
        "Scoring policy: pass threshold {}, min keyword match {}",
        scoring.pass_threshold, scoring.min_keyword_match
    );

    // Initialize résumé store
    let store = Arc::new(FileResumeStore::open(&config.data_dir).await?);

    // Initialize option generator (LLM when an API key is configured)
    let generator: Arc<dyn OptionGenerator> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.generation_timeout)?;
            info!("LLM option generator enabled (model: {})", llm_client::MODEL);
            Arc::new(LlmOptionGenerator(llm))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; using rule-based option generator");
            Arc::new(RuleBasedGenerator)
        }
    };

    let fetcher = JobFetcher::new(config.job_fetch_timeout)?;

    // Session registry with background eviction
    let sessions = SessionRegistry::new();
    let _sweeper = sessions.spawn_sweeper(EvictionPolicy {
        idle: config.session_idle_ttl,
        retention: config.session_retention,
    });

    // Build app state
    let state = AppState {
        config: config.clone(),
        scoring,
        store,
        generator,
        importer: Arc::new(TextPdfImporter),
        renderer: Arc::new(TextRenderer),
        fetcher,
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
