//! Prompt templates and builders for the provider calls.

use crate::pathway::EducationPathway;
use crate::planner::PathwayFeedback;
use crate::profile::{UserProfile, NONE_SENTINEL};

/// How many recent feedback pairs the planner prompt renders.
pub const MAX_FEEDBACK_ENTRIES: usize = 5;

pub const PATHWAY_PLANNER_SYSTEM: &str = r#"You are an education-pathway advisor. Given a student profile, propose 3 to 5 distinct education pathways that fit their goals, budget and constraints.

Rules:
- Each pathway is one qualification type in one field, targeted at one or more regions
- Budget and duration ranges must be realistic for the qualification and regions
- alignmentRationale explains in 1-3 sentences why this pathway fits THIS student
- queryString is a search query that would find concrete programs for the pathway
- Pathways must be meaningfully different from each other, not variations of one idea
- Never duplicate a pathway the student has already seen"#;

pub const RESEARCH_FALLBACK_SYSTEM: &str = r#"You are an education research assistant. Web search is unavailable, so answer from your own knowledge of universities and programs.

List real, well-known programs that match the query. For each program give: name, institution, degree type, field of study, a short description, annual tuition estimate, duration, city and country, typical start date, application deadline, entry requirements, and notable strengths. Say when a figure is an estimate. Do not invent institutions."#;

pub const PROGRAM_EXTRACTION_SYSTEM: &str = r#"You extract structured program listings from research notes about education programs.

Rules:
- Extract 3 to 5 concrete programs from the source text
- Every field must come from the text where possible; estimate conservatively where the text is silent
- costPerYear is annual tuition in whole currency units (no symbols)
- location is "City, Country"
- Score each program: careerAlignment, budgetFit, locationMatch and academicFit are 0-100 integers, and matchScore is the weighted total (40% career, 20% each for the rest), rounded down"#;

/// Compact profile rendering shared by the planner and research prompts.
pub fn profile_summary(profile: &UserProfile) -> String {
    let mut lines = Vec::new();

    if let Some(name) = &profile.name {
        lines.push(format!("Name: {}", name));
    }
    if let Some(nationality) = &profile.nationality {
        lines.push(format!("Nationality: {}", nationality));
    }
    if let Some(location) = &profile.location {
        lines.push(format!("Currently in: {}", location));
    }

    for education in &profile.education {
        let mut parts = Vec::new();
        if let Some(degree) = &education.degree {
            parts.push(degree.clone());
        }
        if let Some(field) = &education.field_of_study {
            parts.push(format!("in {}", field));
        }
        if let Some(institution) = &education.institution {
            parts.push(format!("at {}", institution));
        }
        if let Some(year) = &education.graduation_year {
            parts.push(format!("({})", year));
        }
        if !parts.is_empty() {
            lines.push(format!("Education: {}", parts.join(" ")));
        }
    }

    if let Some(level) = profile.study_level() {
        lines.push(format!("Target study level: {}", level));
    }

    let goals = &profile.career_goals;
    if let Some(short_term) = &goals.short_term {
        lines.push(format!("Short-term goal: {}", short_term));
    }
    if let Some(long_term) = &goals.long_term {
        lines.push(format!("Long-term goal: {}", long_term));
    }
    if !goals.desired_industry.is_empty() {
        lines.push(format!("Industries: {}", goals.desired_industry.join(", ")));
    }
    if !goals.desired_roles.is_empty() {
        lines.push(format!("Desired roles: {}", goals.desired_roles.join(", ")));
    }

    if !profile.skills.is_empty() {
        lines.push(format!("Skills: {}", profile.skills.join(", ")));
    }

    let prefs = &profile.preferences;
    if !prefs.preferred_locations.is_empty() {
        lines.push(format!(
            "Preferred locations: {}",
            prefs.preferred_locations.join(", ")
        ));
    }
    if let Some(mode) = prefs.study_mode.as_deref().filter(|m| *m != NONE_SENTINEL) {
        lines.push(format!("Study mode: {}", mode));
    }
    if prefs.budget_range.max > 0 {
        lines.push(format!(
            "Tuition budget: {}-{} per year",
            prefs.budget_range.min, prefs.budget_range.max
        ));
    }
    if let Some(language) = &prefs.preferred_study_language {
        lines.push(format!("Study language: {}", language));
    }
    if let Some(start) = &prefs.start_date {
        lines.push(format!("Preferred start: {}", start));
    }
    if prefs.residency_interest == Some(true) {
        lines.push("Interested in post-study residency options".to_string());
    }

    for proficiency in &profile.language_proficiency {
        if let (Some(language), Some(level)) = (&proficiency.language, &proficiency.level) {
            lines.push(format!("Language: {} ({})", language, level));
        }
    }

    if lines.is_empty() {
        lines.push("No profile details provided.".to_string());
    }
    lines.join("\n")
}

/// Full planner prompt: profile, dedup instruction, recent feedback.
pub fn pathway_planner_prompt(
    profile: &UserProfile,
    existing: &[EducationPathway],
    feedback: &[PathwayFeedback],
) -> String {
    let mut prompt = format!("Student profile:\n{}\n", profile_summary(profile));

    if !existing.is_empty() {
        let titles: Vec<&str> = existing.iter().map(|p| p.title.as_str()).collect();
        prompt.push_str(&format!(
            "\nThe student has already seen these pathways; do not propose anything similar:\n- {}\n",
            titles.join("\n- ")
        ));
    }

    prompt.push_str(&render_feedback(feedback));
    prompt.push_str("\nPropose 3-5 education pathways for this student.");
    prompt
}

/// Delta instruction when chaining onto a previous planner response: the
/// provider already holds the profile, so only send what changed.
pub fn pathway_delta_prompt(existing: &[EducationPathway], feedback: &[PathwayFeedback]) -> String {
    let mut prompt = String::from("Propose 3-5 fresh education pathways for the same student.");
    if !existing.is_empty() {
        let titles: Vec<&str> = existing.iter().map(|p| p.title.as_str()).collect();
        prompt.push_str(&format!(
            "\nAvoid anything similar to: {}.",
            titles.join("; ")
        ));
    }
    prompt.push_str(&render_feedback(feedback));
    prompt
}

fn render_feedback(feedback: &[PathwayFeedback]) -> String {
    if feedback.is_empty() {
        return String::new();
    }
    let mut rendered = String::from("\nRecent feedback from the student:\n");
    for entry in feedback.iter().rev().take(MAX_FEEDBACK_ENTRIES).rev() {
        rendered.push_str(&format!(
            "- On \"{}\": {}\n",
            entry.pathway_summary, entry.feedback
        ));
    }
    rendered
}

/// Detailed research query for one pathway, with an explicit structured
/// answer request so the raw text stays extractable.
pub fn research_query(pathway: &EducationPathway, profile: &UserProfile) -> String {
    let regions = if pathway.target_regions.is_empty() {
        "any region".to_string()
    } else {
        pathway.target_regions.join(", ")
    };

    let mut query = format!(
        "Find 3-5 current {} programs in {} in {}. \
         Tuition should fall between {} and {} per year; program length {}-{} months.",
        pathway.qualification_type,
        pathway.field_of_study,
        regions,
        pathway.budget_range.min,
        pathway.budget_range.max,
        pathway.duration.min,
        pathway.duration.max,
    );

    if !pathway.subfields.is_empty() {
        query.push_str(&format!(
            " Prefer specializations in {}.",
            pathway.subfields.join(", ")
        ));
    }

    if !pathway.query_string.trim().is_empty() {
        query.push_str(&format!("\nSearch focus: {}.", pathway.query_string.trim()));
    }

    query.push_str(&format!(
        "\n\nApplicant context:\n{}\n\n\
         For each program list: name, institution, degree type, field of study, description, \
         annual tuition, duration, city and country, start date, application deadline, \
         entry requirements, highlights, and scholarship options.",
        profile_summary(profile)
    ));

    query
}

/// Wrap a research query for the generative fallback tier.
pub fn research_fallback_prompt(query: &str) -> String {
    format!(
        "Research request (answer from your knowledge, citing estimates as such):\n\n{}",
        query
    )
}

pub const EVALUATION_SYSTEM: &str = r#"You are scoring education programs for the applicant whose profile you already hold from this conversation. Judge each program against their goals, budget and location preferences."#;

/// Delta instruction for the chained evaluate-and-score call. The provider
/// already holds the applicant profile, so only the programs are sent.
pub fn evaluation_prompt(programs_json: &str) -> String {
    format!(
        "Evaluate these researched programs for the applicant:\n{}\n\n\
         Assign each program careerAlignment, budgetFit, locationMatch and academicFit \
         scores (0-100). Compute matchScore as 40% careerAlignment plus 20% each of the \
         others, rounded down. Return only the top 5 programs by matchScore.",
        programs_json
    )
}
