use sqlx::PgPool;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, RetrievedCandidate, SearchHitRow};
use crate::models::job::JobRow;
use crate::models::match_result::MatchRow;

pub async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        "SELECT id, title, level, location, jd_text FROM jobs WHERE id = $1",
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await
}

/// Returns the candidates that exist among `ids`, in no particular order.
pub async fn fetch_candidates(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        SELECT id, years_of_experience, location, resume_text
        FROM candidates
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

/// Semantic retrieval against the job's stored embedding, best match first.
pub async fn search_candidates(
    pool: &PgPool,
    job_id: Uuid,
    top_k: i32,
    similarity_threshold: f64,
) -> Result<Vec<RetrievedCandidate>, sqlx::Error> {
    let hits = sqlx::query_as::<_, SearchHitRow>(
        r#"
        SELECT id, years_of_experience, location, resume_text, similarity::float8 AS similarity
        FROM search_candidates(
            (SELECT jd_embedding FROM jobs WHERE id = $1),
            $2,
            $3
        )
        "#,
    )
    .bind(job_id)
    .bind(top_k)
    .bind(similarity_threshold)
    .fetch_all(pool)
    .await?;

    Ok(hits.into_iter().map(RetrievedCandidate::from).collect())
}

/// Stored match records for a job, best first. Equal scores fall back to
/// candidate id so the listing is stable across reads.
pub async fn list_matches(pool: &PgPool, job_id: Uuid) -> Result<Vec<MatchRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT * FROM job_candidate_matches
        WHERE job_id = $1
        ORDER BY final_score DESC, candidate_id
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

pub async fn get_match(
    pool: &PgPool,
    job_id: Uuid,
    candidate_id: Uuid,
) -> Result<Option<MatchRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchRow>(
        "SELECT * FROM job_candidate_matches WHERE job_id = $1 AND candidate_id = $2",
    )
    .bind(job_id)
    .bind(candidate_id)
    .fetch_optional(pool)
    .await
}
