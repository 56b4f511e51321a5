// Candidate–job fit scoring.
// Pure functions only: no I/O, no clock, no randomness. The ranking module
// owns persistence and ordering.

pub mod composite;
pub mod explanation;
pub mod features;
pub mod lexicon;

use crate::models::candidate::RetrievedCandidate;
use crate::models::job::JobRow;
use crate::models::match_result::{MatchResult, SubScores};
use crate::scoring::composite::{compute_confidence, compute_final_score, ScoringWeights};
use crate::scoring::explanation::build_explanation;
use crate::scoring::lexicon::ScoringLexicon;

/// Runs the four extractors for one pair.
pub fn compute_sub_scores(
    job: &JobRow,
    retrieved: &RetrievedCandidate,
    lexicon: &ScoringLexicon,
) -> SubScores {
    let candidate = &retrieved.candidate;
    SubScores {
        experience: features::experience_alignment(job, candidate, lexicon),
        location: features::location_affinity(job, candidate),
        skills: features::skill_overlap(job, candidate, lexicon),
        similarity: features::semantic_similarity(retrieved.similarity),
    }
}

/// Scores one (job, candidate) pair into a complete match record.
pub fn score_pair(
    job: &JobRow,
    retrieved: &RetrievedCandidate,
    lexicon: &ScoringLexicon,
    weights: &ScoringWeights,
) -> MatchResult {
    let sub_scores = compute_sub_scores(job, retrieved, lexicon);
    let final_score = compute_final_score(&sub_scores, weights);
    let confidence = compute_confidence(final_score);
    let explanation =
        build_explanation(job, &retrieved.candidate, &sub_scores, final_score, lexicon);

    MatchResult {
        job_id: job.id,
        candidate_id: retrieved.candidate.id,
        sub_scores,
        final_score,
        confidence,
        band: explanation.band,
        screening_summary: explanation.summary,
        top_skills: explanation.top_skills,
        confidence_factors: explanation.confidence_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::composite::DEFAULT_WEIGHTS;
    use crate::scoring::explanation::Band;
    use crate::scoring::features::fixtures::{candidate, job};

    fn retrieved(
        years: Option<i32>,
        location: Option<&str>,
        resume: &str,
        similarity: f64,
    ) -> RetrievedCandidate {
        RetrievedCandidate {
            candidate: candidate(years, location, resume),
            similarity,
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let lexicon = ScoringLexicon::load(None).unwrap();
        let j = job(Some("Senior"), Some("Remote"), "Looking for python, aws experience");
        let r = retrieved(Some(5), Some("remote"), "Seasoned python engineer", 0.8);

        let result = score_pair(&j, &r, &lexicon, &DEFAULT_WEIGHTS);

        assert!((result.sub_scores.experience - 0.9).abs() < 1e-9);
        assert_eq!(result.sub_scores.location, 1.0);
        assert_eq!(result.sub_scores.skills, 0.5);
        assert_eq!(result.sub_scores.similarity, 0.8);
        assert!((result.final_score - 0.75).abs() < 1e-9, "Score was {}", result.final_score);
        assert_eq!(result.confidence, 79);
        assert_eq!(result.band, Band::Good);
        assert!(result.screening_summary.starts_with("Good match"));
        assert_eq!(result.job_id, j.id);
        assert_eq!(result.candidate_id, r.candidate.id);
    }

    #[test]
    fn test_scores_bounded_for_extreme_inputs() {
        let lexicon = ScoringLexicon::load(None).unwrap();
        let cases = [
            (
                job(Some("Senior"), Some("Remote"), "python aws docker"),
                retrieved(Some(6), Some("Remote"), "python aws docker", 5.0),
            ),
            (
                job(Some("Junior"), Some("Berlin"), "python"),
                retrieved(Some(40), Some("Lima"), "", -3.0),
            ),
            (job(None, None, "no keywords here"), retrieved(None, None, "", 0.0)),
        ];

        for (j, r) in &cases {
            let result = score_pair(j, r, &lexicon, &DEFAULT_WEIGHTS);
            let s = result.sub_scores;
            for v in [s.experience, s.location, s.skills, s.similarity, result.final_score] {
                assert!((0.0..=1.0).contains(&v), "Out of range: {v}");
            }
            assert!((60..=100).contains(&result.confidence));
            assert!(result.top_skills.len() <= 5);
        }
    }

    #[test]
    fn test_score_pair_is_deterministic() {
        let lexicon = ScoringLexicon::load(None).unwrap();
        let j = job(Some("Mid"), Some("NYC"), "react, graphql, node");
        let r = retrieved(Some(2), Some("nyc"), "React and Node.js", 0.63);

        let first = serde_json::to_vec(&score_pair(&j, &r, &lexicon, &DEFAULT_WEIGHTS)).unwrap();
        let second = serde_json::to_vec(&score_pair(&j, &r, &lexicon, &DEFAULT_WEIGHTS)).unwrap();
        assert_eq!(first, second);
    }
}
