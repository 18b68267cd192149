//! Request-level orchestration of the recommendation pipeline.
//!
//! One pass: plan pathways, research the first three in parallel, score,
//! assemble a ranked top-10, under a global wall-clock deadline with a
//! tighter sub-deadline racing the research phase. No error escapes this
//! layer: every failure mode assembles simulated results with an
//! explanatory note instead.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::pathway::{DurationRange, EducationPathway, PathwayOutput};
use crate::planner::{PathwayPlanner, PlanOptions};
use crate::profile::{BudgetRange, UserProfile};
use crate::program::{sort_by_score_desc, RecommendationProgram};
use crate::providers::{GenerativeProvider, SearchProvider};
use crate::researcher::ProgramResearcher;
use crate::simulated;

/// Research fans out over at most this many pathways.
const MAX_RESEARCHED_PATHWAYS: usize = 3;
/// Final response cap.
const MAX_RECOMMENDATIONS: usize = 10;

/// Assembled pipeline output. `note` is present exactly when the result was
/// assembled through a fallback path.
#[derive(Debug)]
pub struct Recommendations {
    pub programs: Vec<RecommendationProgram>,
    pub note: Option<String>,
}

pub struct Orchestrator {
    search: Arc<dyn SearchProvider>,
    generative: Arc<dyn GenerativeProvider>,
    extractor_model: String,
    global_deadline: Duration,
    research_deadline: Duration,
}

impl Orchestrator {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        generative: Arc<dyn GenerativeProvider>,
        config: &Config,
    ) -> Self {
        Self {
            search,
            generative,
            extractor_model: config.models.extractor.clone(),
            global_deadline: config.global_deadline,
            research_deadline: config.research_deadline,
        }
    }

    /// Generate recommendations for a profile. Never fails; the worst case
    /// is a simulated result set with a note explaining the degradation.
    pub async fn generate(&self, profile: &UserProfile) -> Recommendations {
        match timeout(self.global_deadline, self.run(profile)).await {
            Ok(recommendations) => recommendations,
            Err(_) => {
                warn!("global deadline exceeded; assembling simulated fallback");
                self.assemble_fallback(
                    &[default_pathway(profile)],
                    "Recommendation generation timed out; showing simulated recommendations as a fallback.",
                )
            }
        }
    }

    async fn run(&self, profile: &UserProfile) -> Recommendations {
        // Planning. A failure here skips research entirely: a generic
        // pathway seeds the simulation tier.
        let planner = PathwayPlanner::new(self.generative.as_ref());
        let outcome = match planner.plan(profile, PlanOptions::default()).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(error = %format!("{:#}", error), "pathway planning failed");
                return self.assemble_fallback(
                    &[default_pathway(profile)],
                    "Pathway generation error; showing simulated recommendations as a fallback.",
                );
            }
        };

        let pathways: Vec<EducationPathway> = outcome
            .pathways
            .into_iter()
            .take(MAX_RESEARCHED_PATHWAYS)
            .collect();
        info!(count = pathways.len(), "researching pathways");

        // Parallel research, raced against the sub-deadline. Losing the
        // race drops the whole fan-out (in-flight provider calls are
        // cancelled with it) and the result set is rebuilt by simulation;
        // partial results are deliberately not salvaged.
        let researcher = ProgramResearcher::new(self.search.as_ref(), self.generative.as_ref())
            .with_extractor_model(Some(self.extractor_model.clone()));
        let response_id = outcome.response_id.as_deref();
        let fan_out = join_all(
            pathways
                .iter()
                .map(|pathway| researcher.research(pathway, profile, response_id)),
        );

        let (programs, deadline_fired) = match timeout(self.research_deadline, fan_out).await {
            Ok(results) => {
                let flat: Vec<RecommendationProgram> =
                    results.into_iter().flatten().collect();
                (flat, false)
            }
            Err(_) => (Vec::new(), true),
        };

        if deadline_fired || programs.is_empty() {
            let reason = if deadline_fired {
                "Program research timed out; showing simulated recommendations as a fallback."
            } else {
                "Program research returned no results; showing simulated recommendations as a fallback."
            };
            warn!(deadline_fired, "research phase degraded to simulation");
            return self.assemble_fallback(&pathways, reason);
        }

        debug!(count = programs.len(), "research complete");
        Recommendations {
            programs: rank(programs),
            note: None,
        }
    }

    fn assemble_fallback(&self, pathways: &[EducationPathway], note: &str) -> Recommendations {
        Recommendations {
            programs: rank(simulated::generate(pathways)),
            note: Some(note.to_string()),
        }
    }
}

/// Establish ranking order, then take the top of the list.
fn rank(mut programs: Vec<RecommendationProgram>) -> Vec<RecommendationProgram> {
    sort_by_score_desc(&mut programs);
    programs.truncate(MAX_RECOMMENDATIONS);
    programs
}

/// Generic pathway used when planning itself fails: wide defaults, narrowed
/// by whatever the profile does state.
pub fn default_pathway(profile: &UserProfile) -> EducationPathway {
    let qualification = profile.study_level().unwrap_or("Master").to_string();
    let field = profile
        .career_goals
        .desired_industry
        .first()
        .cloned()
        .unwrap_or_else(|| "Business and Management".to_string());
    let budget = profile.preferences.budget_range;
    let budget_range = if budget.max > 0 {
        budget
    } else {
        BudgetRange {
            min: 10000,
            max: 40000,
        }
    };
    let target_regions = if profile.preferences.preferred_locations.is_empty() {
        vec!["Europe".to_string(), "North America".to_string()]
    } else {
        profile.preferences.preferred_locations.clone()
    };

    EducationPathway::from_output(PathwayOutput {
        title: format!("{} in {}", qualification, field),
        qualification_type: qualification.clone(),
        field_of_study: field.clone(),
        subfields: vec![],
        target_regions,
        budget_range,
        duration: DurationRange { min: 12, max: 24 },
        alignment_rationale: "General pathway derived from the stated profile.".to_string(),
        alternatives: vec![],
        query_string: format!("{} programs in {}", qualification, field),
    })
}
