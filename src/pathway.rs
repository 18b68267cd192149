//! Education pathway model.
//!
//! A pathway is an intermediate planning artifact: the planner proposes it,
//! the researcher consumes it, and the store may persist it with soft-delete
//! and explored flags. After creation nothing mutates a pathway except those
//! flags and the explored timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::BudgetRange;

/// Program duration window in months.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPathway {
    pub id: String,
    pub title: String,
    pub qualification_type: String,
    pub field_of_study: String,
    #[serde(default)]
    pub subfields: Vec<String>,
    #[serde(default)]
    pub target_regions: Vec<String>,
    #[serde(default)]
    pub budget_range: BudgetRange,
    #[serde(default)]
    pub duration: DurationRange,
    #[serde(default)]
    pub alignment_rationale: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Ready-to-run research query seeded by the planner.
    #[serde(default)]
    pub query_string: String,
    #[serde(rename = "is_explored", default)]
    pub is_explored: bool,
    #[serde(rename = "is_deleted", default)]
    pub is_deleted: bool,
    #[serde(rename = "last_explored_at", skip_serializing_if = "Option::is_none")]
    pub last_explored_at: Option<DateTime<Utc>>,
}

/// The shape the planner's structured output must satisfy: all ten content
/// fields, nothing else.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayOutput {
    pub title: String,
    pub qualification_type: String,
    pub field_of_study: String,
    pub subfields: Vec<String>,
    pub target_regions: Vec<String>,
    pub budget_range: BudgetRange,
    pub duration: DurationRange,
    pub alignment_rationale: String,
    pub alternatives: Vec<String>,
    pub query_string: String,
}

impl EducationPathway {
    /// Promote planner output into a stored pathway with a fresh id.
    pub fn from_output(output: PathwayOutput) -> Self {
        Self {
            id: format!("pth_{}", Uuid::new_v4().simple()),
            title: output.title,
            qualification_type: output.qualification_type,
            field_of_study: output.field_of_study,
            subfields: output.subfields,
            target_regions: output.target_regions,
            budget_range: output.budget_range,
            duration: output.duration,
            alignment_rationale: output.alignment_rationale,
            alternatives: output.alternatives,
            query_string: output.query_string,
            is_explored: false,
            is_deleted: false,
            last_explored_at: None,
        }
    }

    /// Flag the pathway as explored once programs have been generated for it.
    pub fn mark_explored(&mut self) {
        self.is_explored = true;
        self.last_explored_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_output() -> PathwayOutput {
        PathwayOutput {
            title: "MSc Data Science in Western Europe".to_string(),
            qualification_type: "Master".to_string(),
            field_of_study: "Data Science".to_string(),
            subfields: vec!["Machine Learning".to_string()],
            target_regions: vec!["Germany".to_string(), "Netherlands".to_string()],
            budget_range: BudgetRange { min: 5000, max: 20000 },
            duration: DurationRange { min: 12, max: 24 },
            alignment_rationale: "Builds on the applicant's analytics background".to_string(),
            alternatives: vec!["MSc Statistics".to_string()],
            query_string: "english-taught data science masters germany netherlands tuition".to_string(),
        }
    }

    #[test]
    fn test_from_output_assigns_id_and_clears_flags() {
        let pathway = EducationPathway::from_output(sample_output());
        assert!(pathway.id.starts_with("pth_"));
        assert!(!pathway.is_explored);
        assert!(!pathway.is_deleted);
        assert!(pathway.last_explored_at.is_none());
    }

    #[test]
    fn test_mark_explored_sets_flag_and_timestamp() {
        let mut pathway = EducationPathway::from_output(sample_output());
        pathway.mark_explored();
        assert!(pathway.is_explored);
        assert!(pathway.last_explored_at.is_some());
    }

    #[test]
    fn test_flag_fields_serialize_snake_case() {
        let pathway = EducationPathway::from_output(sample_output());
        let json = serde_json::to_value(&pathway).unwrap();
        assert!(json.get("is_explored").is_some());
        assert!(json.get("is_deleted").is_some());
        assert!(json.get("qualificationType").is_some());
    }
}
