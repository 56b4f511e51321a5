use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Replaces the built-in scoring lexicon when set.
    pub lexicon_path: Option<PathBuf>,
    pub persist_timeout: Duration,
    pub rank_concurrency: usize,
    pub shortlist_top_k: i32,
    pub shortlist_similarity_threshold: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            lexicon_path: std::env::var("SCORING_LEXICON_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            persist_timeout: Duration::from_millis(parse_env("PERSIST_TIMEOUT_MS", 5000)?),
            rank_concurrency: parse_env("RANK_CONCURRENCY", 8)?,
            shortlist_top_k: parse_env("SHORTLIST_TOP_K", 10)?,
            shortlist_similarity_threshold: parse_env("SHORTLIST_SIMILARITY_THRESHOLD", 0.1)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
