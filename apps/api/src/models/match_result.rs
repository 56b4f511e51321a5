use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::explanation::Band;

/// A lexicon skill present on both sides of a match, with the reason it was reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEvidence {
    pub skill: String,
    pub evidence: String,
}

/// The four normalized feature values behind a final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub experience: f64,
    pub location: f64,
    pub skills: f64,
    pub similarity: f64,
}

/// Outcome of scoring one (job, candidate) pair.
///
/// Carries no timestamp: scoring the same inputs twice yields an identical
/// value. `scored_at` is attached by the store (see [`MatchRow`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub sub_scores: SubScores,
    pub final_score: f64,
    pub confidence: i32,
    /// Derived from `final_score`; not stored, the summary text already carries it.
    pub band: Band,
    pub screening_summary: String,
    pub top_skills: Vec<SkillEvidence>,
    pub confidence_factors: Vec<String>,
}

/// Shape of the `ranking_explanation` JSONB column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingExplanation {
    pub confidence_factors: Vec<String>,
}

/// A stored `job_candidate_matches` row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRow {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub similarity_score: f64,
    pub experience_score: f64,
    pub location_score: f64,
    pub skills_score: f64,
    pub final_score: f64,
    pub confidence: i32,
    pub screening_summary: String,
    pub top_skills: Json<Vec<SkillEvidence>>,
    pub ranking_explanation: Json<RankingExplanation>,
    pub scored_at: DateTime<Utc>,
}
