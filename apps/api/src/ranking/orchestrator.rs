//! Ranking Orchestrator — scores a batch of retrieved candidates for one job,
//! upserts each match record, and returns a stably sorted shortlist.

use std::collections::HashSet;
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::candidate::RetrievedCandidate;
use crate::models::job::JobRow;
use crate::models::match_result::MatchResult;
use crate::ranking::sink::{MatchSink, PersistError};
use crate::scoring::composite::ScoringWeights;
use crate::scoring::lexicon::ScoringLexicon;
use crate::scoring::score_pair;

/// Malformed batch input, rejected before anything is scored or written.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("job {0} has an empty description")]
    EmptyJobDescription(Uuid),

    #[error("candidate batch is empty")]
    EmptyBatch,

    #[error("candidate {0} appears more than once in the batch")]
    DuplicateCandidate(Uuid),

    #[error("unknown candidate ids: {}", join_ids(.0))]
    UnknownCandidates(Vec<Uuid>),
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}

type PersistOutcome = Result<(), PersistError>;

#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    /// Upper bound on a single upsert. Expiry counts as a failure for that candidate.
    pub persist_timeout: Duration,
    /// Max upserts in flight at once.
    pub max_in_flight: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            persist_timeout: Duration::from_secs(5),
            max_in_flight: 8,
        }
    }
}

/// A candidate whose match record could not be stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub candidate_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedBatch {
    pub job_id: Uuid,
    /// Final score descending; ties keep retrieval order.
    pub ranked: Vec<MatchResult>,
    pub failures: Vec<BatchFailure>,
}

pub struct RankingOrchestrator {
    lexicon: Arc<ScoringLexicon>,
    weights: ScoringWeights,
    sink: Arc<dyn MatchSink>,
    options: RankOptions,
}

impl RankingOrchestrator {
    pub fn new(
        lexicon: Arc<ScoringLexicon>,
        sink: Arc<dyn MatchSink>,
        options: RankOptions,
    ) -> Self {
        let weights = ScoringWeights::default();
        debug_assert!((weights.sum() - 1.0).abs() < 1e-9, "weights must sum to 1");
        Self {
            lexicon,
            weights,
            sink,
            options,
        }
    }

    /// Scores every candidate against `job`, persists each result, and ranks
    /// the ones that were stored.
    ///
    /// A failed write drops that candidate from `ranked` and lists it in
    /// `failures`; the rest of the batch carries on.
    pub async fn score_batch(
        &self,
        job: &JobRow,
        candidates: Vec<RetrievedCandidate>,
    ) -> Result<RankedBatch, RankingError> {
        self.score_batch_until(job, candidates, future::pending()).await
    }

    /// Like [`score_batch`](Self::score_batch), but stops once `cancel`
    /// resolves. No further writes are dispatched, writes in flight are
    /// aborted and reported as failures, and the ranking is built from the
    /// writes that had already completed.
    pub async fn score_batch_until<F>(
        &self,
        job: &JobRow,
        candidates: Vec<RetrievedCandidate>,
        cancel: F,
    ) -> Result<RankedBatch, RankingError>
    where
        F: Future<Output = ()>,
    {
        validate_batch(job, &candidates)?;

        let results: Vec<MatchResult> = candidates
            .iter()
            .map(|candidate| score_pair(job, candidate, &self.lexicon, &self.weights))
            .collect();

        let outcomes = self.persist_all(&results, cancel).await;

        let mut ranked = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (result, outcome) in results.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => ranked.push(result),
                Err(e) => {
                    warn!(
                        job_id = %job.id,
                        candidate_id = %result.candidate_id,
                        "Failed to persist match result: {e}"
                    );
                    failures.push(BatchFailure {
                        candidate_id: result.candidate_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // `ranked` is still in input order here; sort_by is stable.
        ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        info!(
            job_id = %job.id,
            scored = ranked.len() + failures.len(),
            persisted = ranked.len(),
            failed = failures.len(),
            "Ranked candidate batch"
        );

        Ok(RankedBatch {
            job_id: job.id,
            ranked,
            failures,
        })
    }

    /// Upserts every result concurrently, bounded by `max_in_flight`.
    /// Returns one outcome per result, in input order.
    async fn persist_all<F>(&self, results: &[MatchResult], cancel: F) -> Vec<PersistOutcome>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let semaphore = Arc::new(Semaphore::new(self.options.max_in_flight.max(1)));
        let timeout = self.options.persist_timeout;

        let mut outcomes: Vec<Option<PersistOutcome>> = (0..results.len()).map(|_| None).collect();
        let mut tasks = JoinSet::new();
        let mut cancelled = false;

        for (idx, result) in results.iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = &mut cancel => {
                    cancelled = true;
                    break;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(e) => {
                        outcomes[idx] = Some(Err(PersistError::Aborted(e.to_string())));
                        continue;
                    }
                },
            };
            let sink = Arc::clone(&self.sink);
            let result = result.clone();

            tasks.spawn(async move {
                let _permit = permit;
                let outcome = match tokio::time::timeout(timeout, sink.upsert(&result)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(PersistError::Timeout(timeout)),
                };
                (idx, outcome)
            });
        }

        while !cancelled {
            tokio::select! {
                biased;
                _ = &mut cancel => cancelled = true,
                joined = tasks.join_next() => match joined {
                    Some(joined) => record_outcome(&mut outcomes, joined),
                    None => break,
                },
            }
        }

        if cancelled {
            // Finished tasks still yield their outcome after abort_all.
            tasks.abort_all();
            while let Some(joined) = tasks.join_next().await {
                record_outcome(&mut outcomes, joined);
            }
            let abandoned = outcomes.iter().filter(|o| o.is_none()).count();
            warn!(abandoned, "Ranking batch cancelled with writes outstanding");
        }

        let reason = if cancelled {
            "batch cancelled before the write completed"
        } else {
            "write task did not complete"
        };
        outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or_else(|| Err(PersistError::Aborted(reason.to_string())))
            })
            .collect()
    }
}

fn record_outcome(
    outcomes: &mut [Option<PersistOutcome>],
    joined: Result<(usize, PersistOutcome), JoinError>,
) {
    match joined {
        Ok((idx, outcome)) => outcomes[idx] = Some(outcome),
        Err(e) if e.is_cancelled() => {}
        Err(e) => error!("Persistence task failed: {e}"),
    }
}

fn validate_batch(job: &JobRow, candidates: &[RetrievedCandidate]) -> Result<(), RankingError> {
    if job.jd_text.trim().is_empty() {
        return Err(RankingError::EmptyJobDescription(job.id));
    }
    if candidates.is_empty() {
        return Err(RankingError::EmptyBatch);
    }
    let mut seen = HashSet::with_capacity(candidates.len());
    for retrieved in candidates {
        if !seen.insert(retrieved.candidate.id) {
            return Err(RankingError::DuplicateCandidate(retrieved.candidate.id));
        }
    }
    Ok(())
}
