//! Recommendation program model, the pipeline's final output unit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight of career alignment in the overall match score.
const CAREER_WEIGHT: f64 = 0.4;
/// Weight shared by budget fit, location match and academic fit.
const SECONDARY_WEIGHT: f64 = 0.2;

/// The four sub-scores explaining a program's match score, each 0-100.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRationale {
    pub career_alignment: u8,
    pub budget_fit: u8,
    pub location_match: u8,
    pub academic_fit: u8,
}

impl MatchRationale {
    /// Clamp provider-supplied sub-scores into [0, 100]. Our own scoring
    /// paths are bounded by construction; model output is not.
    pub fn sanitized(self) -> Self {
        Self {
            career_alignment: self.career_alignment.min(100),
            budget_fit: self.budget_fit.min(100),
            location_match: self.location_match.min(100),
            academic_fit: self.academic_fit.min(100),
        }
    }

    /// Weighted overall score: 40% career, 20% each for the rest, floored.
    ///
    /// Sub-scores are bounded at 100, so the result is within [0, 100] by
    /// construction.
    pub fn overall_score(&self) -> u8 {
        let weighted = CAREER_WEIGHT * f64::from(self.career_alignment)
            + SECONDARY_WEIGHT * f64::from(self.budget_fit)
            + SECONDARY_WEIGHT * f64::from(self.location_match)
            + SECONDARY_WEIGHT * f64::from(self.academic_fit);
        weighted.floor() as u8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationProgram {
    pub id: String,
    pub name: String,
    pub institution: String,
    pub degree_type: String,
    pub field_of_study: String,
    pub description: String,
    pub cost_per_year: u32,
    /// Free-text program length, e.g. "18 months".
    pub duration: String,
    pub location: String,
    pub start_date: String,
    pub application_deadline: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarships: Option<Vec<String>>,
    #[serde(default)]
    pub match_score: u8,
    #[serde(default)]
    pub match_rationale: MatchRationale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_negative: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_data: Option<serde_json::Value>,
    #[serde(rename = "is_deleted", default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

impl RecommendationProgram {
    /// Globally unique program id. Replaces provider-suggested ids so that
    /// concurrent research calls can never collide.
    pub fn fresh_id() -> String {
        format!("prg_{}", Uuid::new_v4().simple())
    }
}

/// Sort programs best-first. Ties keep their relative order; no guarantee
/// is made about which pathway's programs appear first among equals.
pub fn sort_by_score_desc(programs: &mut [RecommendationProgram]) {
    programs.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}
