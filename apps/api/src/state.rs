use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::ranking::orchestrator::RankingOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Batch scorer. Holds the loaded lexicon and the match sink (`PgMatchSink` in production).
    pub ranker: Arc<RankingOrchestrator>,
}
