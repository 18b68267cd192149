//! Simulated recommendations: the terminal fallback tier.
//!
//! Deterministic structure, randomized values: never fails, never touches
//! the network. Used when no provider is configured, when research comes
//! back empty, or when a deadline fires.

use chrono::{Datelike, Utc};
use rand::Rng;

use crate::pathway::EducationPathway;
use crate::program::{sort_by_score_desc, MatchRationale, RecommendationProgram};

/// Institution/location table the generator draws from.
const INSTITUTIONS: [(&str, &str); 8] = [
    ("Northfield University", "Boston, USA"),
    ("Aldgate College London", "London, UK"),
    ("Technische Hochschule Rheinland", "Cologne, Germany"),
    ("Delft Institute of Applied Sciences", "Delft, Netherlands"),
    ("University of Eastern Ontario", "Ottawa, Canada"),
    ("Southbank University", "Melbourne, Australia"),
    ("Instituto Politecnico del Norte", "Barcelona, Spain"),
    ("Nordic Academy of Technology", "Stockholm, Sweden"),
];

/// Cap of simulated programs across all pathways.
const TOTAL_BUDGET: usize = 10;
/// Cap of simulated programs per pathway.
const PER_PATHWAY_CAP: usize = 3;

/// Generate simulated programs for a set of pathways, best score first.
///
/// Each pathway yields `min(3, 10 / pathway_count)` programs whose cost and
/// duration are sampled within the pathway's stated ranges.
pub fn generate(pathways: &[EducationPathway]) -> Vec<RecommendationProgram> {
    let mut rng = rand::thread_rng();
    generate_with(pathways, &mut rng)
}

/// As [`generate`], drawing randomness from the caller's `Rng`.
pub fn generate_with(
    pathways: &[EducationPathway],
    rng: &mut impl Rng,
) -> Vec<RecommendationProgram> {
    if pathways.is_empty() {
        return Vec::new();
    }

    let per_pathway = (TOTAL_BUDGET / pathways.len()).min(PER_PATHWAY_CAP).max(1);
    let mut programs = Vec::with_capacity(per_pathway * pathways.len());

    for pathway in pathways {
        for _ in 0..per_pathway {
            programs.push(simulate_one(pathway, rng));
        }
    }

    sort_by_score_desc(&mut programs);
    programs
}

fn simulate_one(pathway: &EducationPathway, rng: &mut impl Rng) -> RecommendationProgram {
    let (institution, location) = INSTITUTIONS[rng.gen_range(0..INSTITUTIONS.len())];

    let cost_per_year = sample_range(rng, pathway.budget_range.min, pathway.budget_range.max);
    let duration_months = sample_range(rng, pathway.duration.min.max(6), pathway.duration.max.max(6));

    let rationale = MatchRationale {
        career_alignment: rng.gen_range(80..=95),
        budget_fit: rng.gen_range(75..=95),
        location_match: rng.gen_range(70..=95),
        academic_fit: rng.gen_range(75..=95),
    };

    let next_year = Utc::now().year() + 1;

    RecommendationProgram {
        id: RecommendationProgram::fresh_id(),
        name: format!("{} in {}", pathway.qualification_type, pathway.field_of_study),
        institution: institution.to_string(),
        degree_type: pathway.qualification_type.clone(),
        field_of_study: pathway.field_of_study.clone(),
        description: format!(
            "{} program in {} aligned with the pathway \"{}\".",
            pathway.qualification_type, pathway.field_of_study, pathway.title
        ),
        cost_per_year,
        duration: format!("{} months", duration_months),
        location: location.to_string(),
        start_date: format!("September {}", next_year),
        application_deadline: format!("March {}", next_year),
        requirements: vec![
            "Relevant prior degree or equivalent experience".to_string(),
            "Proof of English proficiency".to_string(),
        ],
        highlights: vec![
            "Industry placement options".to_string(),
            "International student support".to_string(),
        ],
        scholarships: Some(vec!["Merit-based tuition waivers available".to_string()]),
        match_score: rationale.overall_score(),
        match_rationale: rationale,
        is_favorite: None,
        feedback_negative: None,
        feedback_reason: None,
        feedback_data: None,
        is_deleted: None,
    }
}

fn sample_range(rng: &mut impl Rng, min: u32, max: u32) -> u32 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}
