//! Explanation Builder — deterministic, template-driven text for a scored pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateRow;
use crate::models::job::JobRow;
use crate::models::match_result::{SkillEvidence, SubScores};
use crate::scoring::features::{candidate_years, location_match, target_years, LocationMatch};
use crate::scoring::lexicon::ScoringLexicon;

pub const MAX_TOP_SKILLS: usize = 5;
pub const SKILL_EVIDENCE: &str = "mentioned in profile and required for role";

/// Qualitative label for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    Excellent,
    Good,
    Fair,
    Limited,
}

impl Band {
    pub fn from_score(final_score: f64) -> Self {
        match final_score {
            s if s >= 0.8 => Band::Excellent,
            s if s >= 0.6 => Band::Good,
            s if s >= 0.4 => Band::Fair,
            _ => Band::Limited,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Band::Excellent => "Excellent",
            Band::Good => "Good",
            Band::Fair => "Fair",
            Band::Limited => "Limited",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub band: Band,
    pub summary: String,
    pub top_skills: Vec<SkillEvidence>,
    pub confidence_factors: Vec<String>,
}

pub fn build_explanation(
    job: &JobRow,
    candidate: &CandidateRow,
    scores: &SubScores,
    final_score: f64,
    lexicon: &ScoringLexicon,
) -> Explanation {
    let band = Band::from_score(final_score);
    let top_skills = extract_top_skills(&job.jd_text, candidate.resume_text(), lexicon);
    let years = candidate_years(candidate);
    let summary = build_summary(band, &job.title, years, &top_skills, final_score);
    let confidence_factors = build_confidence_factors(job, candidate, scores, lexicon);

    Explanation {
        band,
        summary,
        top_skills,
        confidence_factors,
    }
}

/// Lexicon skills with a variant in both texts, in lexicon order, at most five.
pub fn extract_top_skills(
    job_text: &str,
    candidate_text: &str,
    lexicon: &ScoringLexicon,
) -> Vec<SkillEvidence> {
    let job_text = job_text.to_lowercase();
    let candidate_text = candidate_text.to_lowercase();

    lexicon
        .skills
        .iter()
        .filter(|skill| {
            let has_skill = skill.variants.iter().any(|v| candidate_text.contains(v.as_str()));
            let is_required = skill.variants.iter().any(|v| job_text.contains(v.as_str()));
            has_skill && is_required
        })
        .take(MAX_TOP_SKILLS)
        .map(|skill| SkillEvidence {
            skill: skill.name.clone(),
            evidence: SKILL_EVIDENCE.to_string(),
        })
        .collect()
}

fn build_summary(
    band: Band,
    job_title: &str,
    years: Option<u32>,
    skills: &[SkillEvidence],
    final_score: f64,
) -> String {
    let experience = match years {
        Some(y) => format!("{y} years"),
        None => "unspecified".to_string(),
    };

    let skills_text = if skills.is_empty() {
        "general skills".to_string()
    } else {
        skills
            .iter()
            .map(|s| s.skill.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let remark = if final_score >= 0.7 {
        "Strong technical background and good role alignment."
    } else if final_score >= 0.5 {
        "Decent fit with some gaps to assess."
    } else {
        "Potential candidate but requires careful evaluation."
    };

    format!(
        "{band} match for {job_title}. \
         Candidate has {experience} experience with {skills_text}. {remark}"
    )
}

fn build_confidence_factors(
    job: &JobRow,
    candidate: &CandidateRow,
    scores: &SubScores,
    lexicon: &ScoringLexicon,
) -> Vec<String> {
    let mut factors = Vec::new();

    if let (Some(target), Some(years)) = (target_years(job, lexicon), candidate_years(candidate)) {
        factors.push(format!("Experience: {years} years (target: {target})"));
    }

    match location_match(job, candidate) {
        Some(LocationMatch::Exact) => factors.push("Location: Perfect match".to_string()),
        Some(LocationMatch::Partial) => factors.push("Location: Partial match".to_string()),
        Some(LocationMatch::Different) => factors.push("Location: Different region".to_string()),
        None => {}
    }

    factors.push(format!("Skills relevance: {:.0}%", scores.skills * 100.0));
    factors.push(format!("Resume similarity: {:.0}%", scores.similarity * 100.0));
    factors
}
