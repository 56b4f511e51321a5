//! Persistence sink for match records.
//!
//! `RankingOrchestrator` holds an `Arc<dyn MatchSink>`; production wires in
//! `PgMatchSink`, tests use the in-memory sink below.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::match_result::{MatchResult, RankingExplanation};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("upsert timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("write abandoned: {0}")]
    Aborted(String),
}

/// Accepts a match record keyed by (job id, candidate id). Implementations
/// must keep at most one stored record per key, the latest write winning.
#[async_trait]
pub trait MatchSink: Send + Sync {
    async fn upsert(&self, result: &MatchResult) -> Result<(), PersistError>;
}

/// Writes to `job_candidate_matches`. The primary key on (job_id, candidate_id)
/// makes a rerun overwrite in a single statement.
pub struct PgMatchSink {
    pool: PgPool,
}

impl PgMatchSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchSink for PgMatchSink {
    async fn upsert(&self, result: &MatchResult) -> Result<(), PersistError> {
        let explanation = RankingExplanation {
            confidence_factors: result.confidence_factors.clone(),
        };

        sqlx::query(
            r#"
            INSERT INTO job_candidate_matches
                (job_id, candidate_id, similarity_score, experience_score, location_score,
                 skills_score, final_score, confidence, screening_summary, top_skills,
                 ranking_explanation)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (job_id, candidate_id) DO UPDATE SET
                similarity_score    = EXCLUDED.similarity_score,
                experience_score    = EXCLUDED.experience_score,
                location_score      = EXCLUDED.location_score,
                skills_score        = EXCLUDED.skills_score,
                final_score         = EXCLUDED.final_score,
                confidence          = EXCLUDED.confidence,
                screening_summary   = EXCLUDED.screening_summary,
                top_skills          = EXCLUDED.top_skills,
                ranking_explanation = EXCLUDED.ranking_explanation,
                scored_at           = NOW()
            "#,
        )
        .bind(result.job_id)
        .bind(result.candidate_id)
        .bind(result.sub_scores.similarity)
        .bind(result.sub_scores.experience)
        .bind(result.sub_scores.location)
        .bind(result.sub_scores.skills)
        .bind(result.final_score)
        .bind(result.confidence)
        .bind(&result.screening_summary)
        .bind(Json(&result.top_skills))
        .bind(Json(&explanation))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
