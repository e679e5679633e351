mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod portfolio;
mod resumes;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::generation::enricher::Enricher;
use crate::generation::generator::ResumePipeline;
use crate::generation::ranking::Ranker;
use crate::generation::summary::SummaryComposer;
use crate::llm_client::{LlmClient, LlmSettings, TextGenerator};
use crate::portfolio::cache::{NoopPortfolioCache, PortfolioCache, RedisPortfolioCache};
use crate::portfolio::fetcher::PortfolioFetcher;
use crate::portfolio::github::GitHubClient;
use crate::resumes::store::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("folio_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    let cache_timeout = Duration::from_millis(config.cache_timeout_ms);

    // Portfolio cache: Redis when enabled, otherwise every lookup misses
    let cache: Arc<dyn PortfolioCache> = match (&config.redis_url, config.cache_enabled) {
        (Some(url), true) => {
            info!("Portfolio cache: Redis (ttl {}s)", config.cache_ttl_secs);
            Arc::new(RedisPortfolioCache::connect(url, cache_timeout).await?)
        }
        _ => {
            info!("Portfolio cache disabled");
            Arc::new(NoopPortfolioCache)
        }
    };

    let github = GitHubClient::new(config.github_api_url.clone())?;
    let fetcher = PortfolioFetcher::new(
        github,
        cache,
        Duration::from_secs(config.cache_ttl_secs),
    )
    .with_cache_timeout(cache_timeout);

    // Initialize LLM client (disabled unless LLM_ENABLED and a key are set)
    let llm = LlmClient::new(LlmSettings {
        enabled: config.llm_enabled,
        api_key: config.anthropic_api_key.clone(),
        base_url: config.llm_api_url.clone(),
        max_attempts: config.llm_max_attempts,
    })?;
    if llm.is_enabled() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        info!("LLM narration disabled, using templates");
    }
    let generator: Arc<dyn TextGenerator> = Arc::new(llm);

    let pipeline = ResumePipeline::new(
        fetcher,
        Ranker::new(config.scoring_weights.clone()),
        Enricher::new(generator.clone()),
        SummaryComposer::new(generator),
    )
    .with_max_projects(config.max_projects)
    .with_enrichment_concurrency(config.enrichment_concurrency);

    // Build app state
    let state = AppState {
        store: Arc::new(PgResumeStore::new(db)),
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
