use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The fields of a `candidates` row the scoring engine reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub years_of_experience: Option<i32>,
    pub location: Option<String>,
    pub resume_text: Option<String>,
}

impl CandidateRow {
    pub fn resume_text(&self) -> &str {
        self.resume_text.as_deref().unwrap_or("")
    }
}

/// A candidate annotated with the similarity the retrieval step assigned
/// for one specific job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedCandidate {
    pub candidate: CandidateRow,
    pub similarity: f64,
}

/// Row shape returned by the `search_candidates` store function.
#[derive(Debug, Clone, FromRow)]
pub struct SearchHitRow {
    pub id: Uuid,
    pub years_of_experience: Option<i32>,
    pub location: Option<String>,
    pub resume_text: Option<String>,
    pub similarity: f64,
}

impl From<SearchHitRow> for RetrievedCandidate {
    fn from(hit: SearchHitRow) -> Self {
        RetrievedCandidate {
            candidate: CandidateRow {
                id: hit.id,
                years_of_experience: hit.years_of_experience,
                location: hit.location,
                resume_text: hit.resume_text,
            },
            similarity: hit.similarity,
        }
    }
}
