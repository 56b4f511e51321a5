mod config;
mod db;
mod errors;
mod models;
mod ranking;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::ranking::orchestrator::{RankOptions, RankingOrchestrator};
use crate::ranking::sink::PgMatchSink;
use crate::routes::build_router;
use crate::scoring::lexicon::ScoringLexicon;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let max_connections = u32::try_from(config.rank_concurrency.max(2)).unwrap_or(u32::MAX);
    let db = create_pool(&config.database_url, max_connections, config.persist_timeout).await?;

    // Load scoring lexicon (built-in unless SCORING_LEXICON_PATH is set)
    let lexicon = Arc::new(ScoringLexicon::load(config.lexicon_path.as_deref())?);
    info!(
        keywords = lexicon.tech_keywords.len(),
        skills = lexicon.skills.len(),
        levels = lexicon.levels.len(),
        "Scoring lexicon loaded"
    );

    // Initialize ranking orchestrator over the Postgres match sink
    let options = RankOptions {
        persist_timeout: config.persist_timeout,
        max_in_flight: config.rank_concurrency,
    };
    let ranker = Arc::new(RankingOrchestrator::new(
        lexicon,
        Arc::new(PgMatchSink::new(db.clone())),
        options,
    ));
    info!(
        "Ranking orchestrator ready (timeout: {:?}, concurrency: {})",
        options.persist_timeout, options.max_in_flight
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        ranker,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins to the recruiter UI host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
