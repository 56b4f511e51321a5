use serde::{Deserialize, Serialize};

use crate::models::match_result::SubScores;

pub const MIN_CONFIDENCE: i32 = 60;
pub const MAX_CONFIDENCE: i32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub similarity: f64,
    pub experience: f64,
    pub location: f64,
}

/// Skill overlap 0.35, similarity 0.25, experience 0.25, location 0.15.
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    skills: 0.35,
    similarity: 0.25,
    experience: 0.25,
    location: 0.15,
};

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.similarity + self.experience + self.location
    }
}

/// Weighted sum of the sub-scores, before clamping.
pub fn weighted_sum(scores: &SubScores, weights: &ScoringWeights) -> f64 {
    weights.skills * scores.skills
        + weights.similarity * scores.similarity
        + weights.experience * scores.experience
        + weights.location * scores.location
}

pub fn compute_final_score(scores: &SubScores, weights: &ScoringWeights) -> f64 {
    weighted_sum(scores, weights).clamp(0.0, 1.0)
}

/// `clamp(round(final × 85 + 15), 60, 100)`. Never reaches 0 and only reaches
/// 100 for a near-perfect score.
pub fn compute_confidence(final_score: f64) -> i32 {
    let raw = (final_score * 85.0 + 15.0).round() as i32;
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(experience: f64, location: f64, skills: f64, similarity: f64) -> SubScores {
        SubScores {
            experience,
            location,
            skills,
            similarity,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((DEFAULT_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_worked_example() {
        // 0.35×0.5 + 0.25×0.8 + 0.25×0.9 + 0.15×1.0 = 0.75
        let final_score = compute_final_score(&scores(0.9, 1.0, 0.5, 0.8), &DEFAULT_WEIGHTS);
        assert!((final_score - 0.75).abs() < 1e-9, "Score was {final_score}");
        assert_eq!(compute_confidence(final_score), 79);
    }

    #[test]
    fn test_perfect_and_zero_scores() {
        let perfect = compute_final_score(&scores(1.0, 1.0, 1.0, 1.0), &DEFAULT_WEIGHTS);
        assert!((perfect - 1.0).abs() < 1e-9);
        assert_eq!(compute_confidence(perfect), 100);

        let zero = compute_final_score(&scores(0.0, 0.0, 0.0, 0.0), &DEFAULT_WEIGHTS);
        assert_eq!(zero, 0.0);
        assert_eq!(compute_confidence(zero), 60);
    }

    #[test]
    fn test_final_score_clamped() {
        let heavy = ScoringWeights {
            skills: 2.0,
            ..DEFAULT_WEIGHTS
        };
        assert_eq!(compute_final_score(&scores(1.0, 1.0, 1.0, 1.0), &heavy), 1.0);
    }

    #[test]
    fn test_confidence_floor() {
        // 0.5 × 85 + 15 = 57.5 → 58 → floored to 60
        assert_eq!(compute_confidence(0.5), 60);
        assert_eq!(compute_confidence(0.6), 66);
    }
}
