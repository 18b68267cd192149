//! User profile model.
//!
//! The profile is produced by a separate editing/extraction surface and is a
//! read-only input to the recommendation pipeline. Enumerated fields must
//! collapse to one of a fixed closed set or the `__NONE__` sentinel;
//! free-text values coming out of document extraction are normalized against
//! those sets before validation.

use serde::{Deserialize, Serialize};

/// Sentinel for "no value" in enumerated profile fields.
pub const NONE_SENTINEL: &str = "__NONE__";

/// Closed set of study levels a profile may target.
pub const STUDY_LEVELS: &[&str] = &[
    "Bachelor",
    "Master",
    "PhD",
    "Diploma",
    "Certificate",
    "Foundation",
];

/// Closed set of study modes.
pub const STUDY_MODES: &[&str] = &["Full-time", "Part-time", "Online", "Hybrid"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub nationality: Option<String>,
    pub education: Vec<Education>,
    pub career_goals: CareerGoals,
    pub skills: Vec<String>,
    pub preferences: Preferences,
    /// One of [`STUDY_LEVELS`] or the sentinel.
    pub target_study_level: Option<String>,
    pub language_proficiency: Vec<LanguageProficiency>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_year: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerGoals {
    pub short_term: Option<String>,
    pub long_term: Option<String>,
    pub achievements: Option<String>,
    pub desired_industry: Vec<String>,
    pub desired_roles: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub preferred_locations: Vec<String>,
    /// One of [`STUDY_MODES`] or the sentinel.
    pub study_mode: Option<String>,
    pub start_date: Option<String>,
    pub budget_range: BudgetRange,
    pub preferred_duration: Option<DurationPreference>,
    pub preferred_study_language: Option<String>,
    pub living_expenses_budget: Option<LivingExpensesBudget>,
    pub residency_interest: Option<bool>,
}

/// Annual tuition budget in whole currency units.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BudgetRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DurationPreference {
    pub min: Option<u32>,
    pub max: Option<u32>,
    /// "months" or "years"; free text normalized upstream.
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LivingExpensesBudget {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageProficiency {
    pub language: Option<String>,
    pub level: Option<String>,
    pub test_type: Option<String>,
    pub score: Option<String>,
}

impl UserProfile {
    /// Collapse free-text enumerated fields onto their closed sets.
    ///
    /// Values that match no set entry (case-insensitive, substring in either
    /// direction) become the sentinel rather than passing through verbatim.
    pub fn normalize(&mut self) {
        self.target_study_level = Some(normalize_enum(
            self.target_study_level.as_deref(),
            STUDY_LEVELS,
        ));
        self.preferences.study_mode =
            Some(normalize_enum(self.preferences.study_mode.as_deref(), STUDY_MODES));
    }

    /// The study level to plan around, if one was chosen.
    pub fn study_level(&self) -> Option<&str> {
        self.target_study_level
            .as_deref()
            .filter(|level| *level != NONE_SENTINEL)
    }
}

/// Map a raw value onto a closed set, or the sentinel when nothing matches.
pub fn normalize_enum(raw: Option<&str>, allowed: &[&str]) -> String {
    let Some(raw) = raw else {
        return NONE_SENTINEL.to_string();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NONE_SENTINEL {
        return NONE_SENTINEL.to_string();
    }
    let lower = trimmed.to_lowercase();
    for candidate in allowed {
        let candidate_lower = candidate.to_lowercase();
        if lower == candidate_lower
            || lower.contains(&candidate_lower)
            || candidate_lower.contains(&lower)
        {
            return candidate.to_string();
        }
    }
    NONE_SENTINEL.to_string()
}
