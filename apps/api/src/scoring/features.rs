//! Feature extractors. Each is a pure function of (job, candidate) returning a
//! value in [0, 1]. Missing inputs score as the feature's default, never an error.

use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;
use crate::scoring::lexicon::ScoringLexicon;

/// Skill/keyword overlap when the job mentions none of the configured keywords.
pub const NEUTRAL_SKILL_OVERLAP: f64 = 0.5;

pub const LOCATION_EXACT: f64 = 1.0;
pub const LOCATION_PARTIAL: f64 = 0.7;
pub const LOCATION_DIFFERENT: f64 = 0.2;

/// Years of distance at which experience alignment bottoms out at zero.
const EXPERIENCE_SPAN_YEARS: f64 = 10.0;

/// How two location strings relate, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMatch {
    Exact,
    Partial,
    Different,
}

impl LocationMatch {
    pub fn score(self) -> f64 {
        match self {
            LocationMatch::Exact => LOCATION_EXACT,
            LocationMatch::Partial => LOCATION_PARTIAL,
            LocationMatch::Different => LOCATION_DIFFERENT,
        }
    }
}

/// Keyword counts behind the skill overlap score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeywordOverlap {
    pub relevant: usize,
    pub matched: usize,
}

impl KeywordOverlap {
    pub fn score(&self) -> f64 {
        if self.relevant == 0 {
            NEUTRAL_SKILL_OVERLAP
        } else {
            self.matched as f64 / self.relevant as f64
        }
    }
}

/// Target years for the job's level, or `None` when the job carries no level.
pub fn target_years(job: &JobRow, lexicon: &ScoringLexicon) -> Option<u32> {
    job.level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .map(|level| lexicon.target_years_for_level(level))
}

/// Candidate years, treating negative values as unknown.
pub fn candidate_years(candidate: &CandidateRow) -> Option<u32> {
    candidate
        .years_of_experience
        .and_then(|years| u32::try_from(years).ok())
}

/// `max(0, 1 − |years − target| / 10)`, or 0 when either side is unknown.
pub fn experience_alignment(
    job: &JobRow,
    candidate: &CandidateRow,
    lexicon: &ScoringLexicon,
) -> f64 {
    match (target_years(job, lexicon), candidate_years(candidate)) {
        (Some(target), Some(years)) => {
            let diff = (years as f64 - target as f64).abs();
            (1.0 - diff / EXPERIENCE_SPAN_YEARS).max(0.0)
        }
        _ => 0.0,
    }
}

/// Classifies two locations, or `None` when either is absent or blank.
pub fn location_match(job: &JobRow, candidate: &CandidateRow) -> Option<LocationMatch> {
    let job_loc = non_blank(job.location.as_deref())?.to_lowercase();
    let cand_loc = non_blank(candidate.location.as_deref())?.to_lowercase();

    Some(if job_loc == cand_loc {
        LocationMatch::Exact
    } else if job_loc.contains(&cand_loc) || cand_loc.contains(&job_loc) {
        LocationMatch::Partial
    } else {
        LocationMatch::Different
    })
}

pub fn location_affinity(job: &JobRow, candidate: &CandidateRow) -> f64 {
    location_match(job, candidate)
        .map(LocationMatch::score)
        .unwrap_or(0.0)
}

/// Counts configured keywords present in the job title or description, and
/// how many of those also appear in the candidate's text. Substring match on
/// lowercased text.
pub fn keyword_overlap(
    job: &JobRow,
    candidate: &CandidateRow,
    lexicon: &ScoringLexicon,
) -> KeywordOverlap {
    let title = job.title.to_lowercase();
    let description = job.jd_text.to_lowercase();
    let resume = candidate.resume_text().to_lowercase();

    lexicon
        .tech_keywords
        .iter()
        .filter(|kw| description.contains(kw.as_str()) || title.contains(kw.as_str()))
        .fold(KeywordOverlap::default(), |mut acc, kw| {
            acc.relevant += 1;
            if resume.contains(kw.as_str()) {
                acc.matched += 1;
            }
            acc
        })
}

pub fn skill_overlap(job: &JobRow, candidate: &CandidateRow, lexicon: &ScoringLexicon) -> f64 {
    keyword_overlap(job, candidate, lexicon).score()
}

/// Pass-through of the retrieval similarity, clamped to [0, 1]. Non-finite
/// values count as no similarity.
pub fn semantic_similarity(similarity: f64) -> f64 {
    if similarity.is_finite() {
        similarity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
