//! Match scoring heuristics.
//!
//! Two entry points: ranked scoring for freshly extracted search results,
//! and a standalone enhancement pass for programs that arrive without a
//! rationale. Career alignment and academic fit are placeholder random
//! bands, not real alignment computations; budget and location are
//! deterministic. All randomness draws through the caller's `Rng` so tests
//! can seed it.

use rand::Rng;

use crate::pathway::EducationPathway;
use crate::profile::UserProfile;
use crate::program::{MatchRationale, RecommendationProgram};

/// Cap applied to the ranked base score after alignment bonuses.
const RANKED_BASE_CAP: i32 = 98;

/// Placeholder band for career alignment.
pub fn career_alignment_score(rng: &mut impl Rng) -> u8 {
    rng.gen_range(80..=95)
}

/// Placeholder band for academic fit.
pub fn academic_fit_score(rng: &mut impl Rng) -> u8 {
    rng.gen_range(75..=95)
}

/// Budget fit: full marks shrink as cost approaches the budget ceiling;
/// above the ceiling the score decays with the overshoot, floored at 50.
pub fn budget_fit_score(cost_per_year: u32, budget_max: u32) -> u8 {
    if budget_max == 0 {
        // No stated budget to compare against.
        return 75;
    }
    let cost = f64::from(cost_per_year);
    let max = f64::from(budget_max);
    let score = if cost_per_year <= budget_max {
        (100.0 - (cost / max) * 100.0 + 75.0).min(100.0)
    } else {
        (90.0 - ((cost - max) / max) * 100.0).max(50.0)
    };
    score.clamp(0.0, 100.0) as u8
}

/// Location match tiers: 95 for a direct substring hit, 85 when only the
/// countries line up, 70 for no match, 80 when the user stated no
/// preference at all.
pub fn location_match_score(preferred: &[String], location: &str) -> u8 {
    if preferred.is_empty() {
        return 80;
    }
    let location_lower = location.to_lowercase();
    for pref in preferred {
        let pref = pref.trim();
        if !pref.is_empty() && location_lower.contains(&pref.to_lowercase()) {
            return 95;
        }
    }
    let location_country = trailing_segment(location);
    for pref in preferred {
        let pref_country = trailing_segment(pref);
        if !pref_country.is_empty() && pref_country.eq_ignore_ascii_case(&location_country) {
            return 85;
        }
    }
    70
}

/// The "country" part of a "City, Country" string.
fn trailing_segment(value: &str) -> String {
    value
        .rsplit(',')
        .next()
        .unwrap_or(value)
        .trim()
        .to_string()
}

/// Attach a rationale and score to a program that arrived without one.
pub fn enhance(
    program: &mut RecommendationProgram,
    profile: &UserProfile,
    rng: &mut impl Rng,
) {
    let rationale = MatchRationale {
        career_alignment: career_alignment_score(rng),
        budget_fit: budget_fit_score(program.cost_per_year, profile.preferences.budget_range.max),
        location_match: location_match_score(
            &profile.preferences.preferred_locations,
            &program.location,
        ),
        academic_fit: academic_fit_score(rng),
    };
    program.match_rationale = rationale;
    program.match_score = rationale.overall_score();
}

/// Ranked scoring for extracted search results: a base score that decays
/// with rank, alignment bonuses for degree-type and field matches, capped,
/// then jittered into the four sub-scores.
pub fn ranked_rationale(
    rank: usize,
    pathway: &EducationPathway,
    program: &RecommendationProgram,
    rng: &mut impl Rng,
) -> MatchRationale {
    let mut base = (95 - 3 * rank as i32).max(70);

    let qualification = pathway.qualification_type.to_lowercase();
    if !qualification.is_empty() && program.degree_type.to_lowercase().contains(&qualification) {
        base += 2;
    }
    let field = pathway.field_of_study.to_lowercase();
    if !field.is_empty() && program.field_of_study.to_lowercase().contains(&field) {
        base += 3;
    }
    let base = base.min(RANKED_BASE_CAP);

    let mut jitter = |spread: i32| -> u8 {
        (base + rng.gen_range(-spread..=spread)).clamp(0, 100) as u8
    };

    MatchRationale {
        career_alignment: jitter(3),
        budget_fit: jitter(5),
        location_match: jitter(5),
        academic_fit: jitter(4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::{DurationRange, PathwayOutput};
    use crate::profile::{BudgetRange, Preferences};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_budget_fit_within_budget_is_monotonic() {
        let budget_max = 40000;
        let mut previous = u8::MAX;
        for cost in [0u32, 10000, 20000, 30000, 40000] {
            let score = budget_fit_score(cost, budget_max);
            assert!(score <= previous, "score must not rise with cost");
            assert!(score >= 75, "within budget never drops below 75");
            previous = score;
        }
        assert_eq!(budget_fit_score(0, budget_max), 100);
        assert_eq!(budget_fit_score(budget_max, budget_max), 75);
    }

    #[test]
    fn test_budget_fit_over_budget_decays_to_floor() {
        let budget_max = 10000;
        let slightly_over = budget_fit_score(11000, budget_max);
        let far_over = budget_fit_score(30000, budget_max);
        assert!(slightly_over > far_over);
        assert_eq!(budget_fit_score(100_000, budget_max), 50);
    }

    #[test]
    fn test_budget_fit_no_budget_is_neutral() {
        assert_eq!(budget_fit_score(25000, 0), 75);
    }

    #[test]
    fn test_location_match_tiers() {
        let usa = vec!["USA".to_string()];
        assert_eq!(location_match_score(&usa, "New York, USA"), 95);
        assert_eq!(location_match_score(&usa, "Toronto, Canada"), 70);
        assert_eq!(location_match_score(&[], "anywhere"), 80);

        // Country-only overlap: preference names a different city in the
        // same country.
        let boston = vec!["Boston, USA".to_string()];
        assert_eq!(location_match_score(&boston, "New York, USA"), 85);
    }

    #[test]
    fn test_random_bands_stay_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let career = career_alignment_score(&mut rng);
            assert!((80..=95).contains(&career));
            let academic = academic_fit_score(&mut rng);
            assert!((75..=95).contains(&academic));
        }
    }

    fn program(cost: u32, location: &str) -> RecommendationProgram {
        RecommendationProgram {
            id: RecommendationProgram::fresh_id(),
            name: "MSc Data Science".to_string(),
            institution: "Test University".to_string(),
            degree_type: "Master".to_string(),
            field_of_study: "Data Science".to_string(),
            description: String::new(),
            cost_per_year: cost,
            duration: "24 months".to_string(),
            location: location.to_string(),
            start_date: "September".to_string(),
            application_deadline: "June".to_string(),
            requirements: vec![],
            highlights: vec![],
            scholarships: None,
            match_score: 0,
            match_rationale: MatchRationale::default(),
            is_favorite: None,
            feedback_negative: None,
            feedback_reason: None,
            feedback_data: None,
            is_deleted: None,
        }
    }

    #[test]
    fn test_enhance_scores_satisfy_weighted_formula() {
        let mut profile = UserProfile::default();
        profile.preferences = Preferences {
            preferred_locations: vec!["Germany".to_string()],
            budget_range: BudgetRange { min: 0, max: 20000 },
            ..Default::default()
        };
        let mut program = program(15000, "Munich, Germany");
        enhance(&mut program, &profile, &mut rng());

        let r = program.match_rationale;
        assert_eq!(program.match_score, r.overall_score());
        assert!(program.match_score <= 100);
        assert_eq!(r.location_match, 95);
    }

    fn pathway() -> EducationPathway {
        EducationPathway::from_output(PathwayOutput {
            title: "t".to_string(),
            qualification_type: "Master".to_string(),
            field_of_study: "Data Science".to_string(),
            subfields: vec![],
            target_regions: vec![],
            budget_range: BudgetRange { min: 0, max: 10000 },
            duration: DurationRange { min: 12, max: 24 },
            alignment_rationale: String::new(),
            alternatives: vec![],
            query_string: String::new(),
        })
    }

    #[test]
    fn test_ranked_rationale_decays_with_rank() {
        let pathway = pathway();
        let program = program(9000, "Berlin, Germany");
        let mut rng = rng();
        // Rank 0 base: 95 + 2 (degree) + 3 (field) capped at 98.
        let first = ranked_rationale(0, &pathway, &program, &mut rng);
        // Rank 8 base: max(70, 95-24) = 71 + 5 = 76.
        let late = ranked_rationale(8, &pathway, &program, &mut rng);
        assert!(first.career_alignment >= 95);
        assert!(late.career_alignment <= 79);
    }

    #[test]
    fn test_ranked_rationale_caps_base() {
        let pathway = pathway();
        let program = program(9000, "Berlin, Germany");
        for _ in 0..50 {
            let rationale = ranked_rationale(0, &pathway, &program, &mut rand::thread_rng());
            // Base is capped at 98; the widest jitter spread is 5.
            assert!(rationale.budget_fit <= 100);
            assert!(rationale.career_alignment <= 100);
        }
    }
}
