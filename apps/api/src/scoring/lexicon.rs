//! Scoring lexicon — the keyword list, skill variants, and level→years table.
//!
//! All three are data, loaded from JSON. The built-in document lives in
//! `config/scoring_lexicon.json`; `SCORING_LEXICON_PATH` replaces it at startup.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_LEXICON_JSON: &str = include_str!("../../config/scoring_lexicon.json");

/// A canonical skill and the case-insensitive text variants that signal it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub variants: Vec<String>,
}

/// Level labels sharing one target-years value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRule {
    pub labels: Vec<String>,
    pub target_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringLexicon {
    pub tech_keywords: Vec<String>,
    pub skills: Vec<SkillEntry>,
    pub levels: Vec<LevelRule>,
    pub default_target_years: u32,
}

impl ScoringLexicon {
    /// Parses a lexicon document. Every term is lowercased so lookups can
    /// compare against lowercased text directly.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut lexicon: ScoringLexicon =
            serde_json::from_str(json).context("Scoring lexicon is not valid JSON")?;
        lexicon.normalize();
        Ok(lexicon)
    }

    /// Reads a lexicon from `path`, or returns the built-in one when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read scoring lexicon at {}", path.display())
                })?;
                Self::from_json(&json)
            }
            None => Self::from_json(DEFAULT_LEXICON_JSON),
        }
    }

    /// Target years for a free-text level label. First matching rule wins;
    /// a label that matches no rule falls back to `default_target_years`.
    pub fn target_years_for_level(&self, level: &str) -> u32 {
        let level = level.to_lowercase();
        self.levels
            .iter()
            .find(|rule| rule.labels.iter().any(|label| level.contains(label.as_str())))
            .map(|rule| rule.target_years)
            .unwrap_or(self.default_target_years)
    }

    fn normalize(&mut self) {
        for keyword in &mut self.tech_keywords {
            *keyword = keyword.trim().to_lowercase();
        }
        self.tech_keywords.retain(|k| !k.is_empty());

        for skill in &mut self.skills {
            for variant in &mut skill.variants {
                *variant = variant.trim().to_lowercase();
            }
            skill.variants.retain(|v| !v.is_empty());
        }

        for rule in &mut self.levels {
            for label in &mut rule.labels {
                *label = label.trim().to_lowercase();
            }
            rule.labels.retain(|l| !l.is_empty());
        }
    }
}
