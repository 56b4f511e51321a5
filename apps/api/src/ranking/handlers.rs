//! Axum route handlers for the Ranking API.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, RetrievedCandidate};
use crate::models::job::JobRow;
use crate::models::match_result::MatchRow;
use crate::ranking::orchestrator::{RankedBatch, RankingError};
use crate::ranking::store;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankCandidate {
    pub candidate_id: Uuid,
    pub similarity: f64,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub candidates: Vec<RankCandidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShortlistRequest {
    pub top_k: Option<i32>,
    pub similarity_threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub job_id: Uuid,
    pub matches: Vec<MatchRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:job_id/rank
///
/// Scores the given candidates, in the given retrieval order, against the job.
pub async fn handle_rank(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankedBatch>, AppError> {
    if request.candidates.is_empty() {
        return Err(RankingError::EmptyBatch.into());
    }

    let job = load_job(&state, job_id).await?;

    let ids: Vec<Uuid> = request.candidates.iter().map(|c| c.candidate_id).collect();
    let rows = store::fetch_candidates(&state.db, &ids).await?;
    let batch = resolve_batch(&request.candidates, rows)?;

    let ranked = state.ranker.score_batch(&job, batch).await?;
    Ok(Json(ranked))
}

/// POST /api/v1/jobs/:job_id/shortlist
///
/// Retrieves semantically similar candidates for the job, then ranks them.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<RankedBatch>, AppError> {
    let request = parse_shortlist_request(&body)?;
    let top_k = request.top_k.unwrap_or(state.config.shortlist_top_k);
    let threshold = request
        .similarity_threshold
        .unwrap_or(state.config.shortlist_similarity_threshold);

    if top_k <= 0 {
        return Err(AppError::Validation("top_k must be positive".to_string()));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::Validation(
            "similarity_threshold must be within [0, 1]".to_string(),
        ));
    }

    let job = load_job(&state, job_id).await?;
    let retrieved = store::search_candidates(&state.db, job_id, top_k, threshold).await?;

    if retrieved.is_empty() {
        info!(%job_id, top_k, threshold, "Semantic retrieval returned no candidates");
        return Ok(Json(RankedBatch {
            job_id,
            ranked: vec![],
            failures: vec![],
        }));
    }

    let ranked = state.ranker.score_batch(&job, retrieved).await?;
    Ok(Json(ranked))
}

/// GET /api/v1/jobs/:job_id/matches
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MatchListResponse>, AppError> {
    let matches = store::list_matches(&state.db, job_id).await?;
    Ok(Json(MatchListResponse { job_id, matches }))
}

/// GET /api/v1/jobs/:job_id/matches/:candidate_id
pub async fn handle_get_match(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchRow>, AppError> {
    let row = store::get_match(&state.db, job_id, candidate_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No match for job {job_id} and candidate {candidate_id}"))
        })?;
    Ok(Json(row))
}

/// Pairs each requested id with its stored profile, keeping request order.
/// Duplicate ids pass through; the orchestrator rejects them.
fn resolve_batch(
    requested: &[RankCandidate],
    rows: Vec<CandidateRow>,
) -> Result<Vec<RetrievedCandidate>, RankingError> {
    let rows: HashMap<Uuid, CandidateRow> = rows.into_iter().map(|row| (row.id, row)).collect();

    let mut batch = Vec::with_capacity(requested.len());
    let mut missing = Vec::new();
    for c in requested {
        match rows.get(&c.candidate_id) {
            Some(candidate) => batch.push(RetrievedCandidate {
                candidate: candidate.clone(),
                similarity: c.similarity,
            }),
            None if !missing.contains(&c.candidate_id) => missing.push(c.candidate_id),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(RankingError::UnknownCandidates(missing));
    }
    Ok(batch)
}

/// An empty body means "use the configured defaults".
fn parse_shortlist_request(body: &[u8]) -> Result<ShortlistRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ShortlistRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid shortlist request: {e}")))
}

async fn load_job(state: &AppState, job_id: Uuid) -> Result<JobRow, AppError> {
    store::fetch_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::features::fixtures::candidate;

    fn request(id: Uuid, similarity: f64) -> RankCandidate {
        RankCandidate {
            candidate_id: id,
            similarity,
        }
    }

    #[test]
    fn test_resolve_batch_keeps_request_order() {
        let a = candidate(Some(2), None, "python");
        let b = candidate(Some(7), None, "aws");
        let requested = [request(b.id, 0.4), request(a.id, 0.9)];

        let batch = resolve_batch(&requested, vec![a.clone(), b.clone()]).unwrap();

        let ids: Vec<Uuid> = batch.iter().map(|r| r.candidate.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert_eq!(batch[0].similarity, 0.4);
        assert_eq!(batch[1].similarity, 0.9);
    }

    #[test]
    fn test_resolve_batch_reports_every_unknown_id() {
        let known = candidate(Some(2), None, "python");
        let ghost_a = Uuid::new_v4();
        let ghost_b = Uuid::new_v4();
        let requested = [
            request(ghost_a, 0.5),
            request(known.id, 0.5),
            request(ghost_b, 0.5),
            request(ghost_a, 0.1),
        ];

        let err = resolve_batch(&requested, vec![known]).unwrap_err();

        assert_eq!(err.to_string(), format!("unknown candidate ids: {ghost_a}, {ghost_b}"));
        assert!(matches!(AppError::from(err), AppError::InvalidBatch(_)));
    }

    #[test]
    fn test_resolve_batch_leaves_duplicates_to_orchestrator() {
        let known = candidate(Some(2), None, "python");
        let requested = [request(known.id, 0.5), request(known.id, 0.6)];

        let batch = resolve_batch(&requested, vec![known]).unwrap();

        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_empty_shortlist_body_uses_defaults() {
        let parsed = parse_shortlist_request(b"").unwrap();
        assert!(parsed.top_k.is_none());
        assert!(parsed.similarity_threshold.is_none());

        let parsed = parse_shortlist_request(b" \n").unwrap();
        assert!(parsed.top_k.is_none());
    }

    #[test]
    fn test_malformed_shortlist_body_is_validation_error() {
        for body in [r#"{"top_k":"ten"}"#, "{not json", "[1, 2]"] {
            let err = parse_shortlist_request(body.as_bytes()).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        let parsed = parse_shortlist_request(br#"{"top_k":3}"#).unwrap();
        assert_eq!(parsed.top_k, Some(3));
    }
}
