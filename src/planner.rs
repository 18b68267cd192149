//! Pathway planning: profile in, 3-5 candidate education pathways out.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::extract::{self, ExtractionContext};
use crate::pathway::{EducationPathway, PathwayOutput};
use crate::profile::UserProfile;
use crate::prompts;
use crate::providers::GenerativeProvider;

/// Upper bound on pathways accepted from one planning call.
const MAX_PATHWAYS: usize = 5;

/// One remembered reaction to a previously proposed pathway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayFeedback {
    pub pathway_summary: String,
    pub feedback: String,
}

/// Optional planning inputs beyond the profile itself.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Chain onto a previous planner response instead of re-sending the
    /// profile; the prompt then carries only the delta instruction.
    pub previous_response_id: Option<String>,
    /// Pathways the user has already seen; their titles are summarized into
    /// a do-not-duplicate instruction.
    pub existing_pathways: Vec<EducationPathway>,
    /// Recent feedback pairs, newest last.
    pub feedback: Vec<PathwayFeedback>,
}

/// Successful planning result.
#[derive(Debug)]
pub struct PlanOutcome {
    pub pathways: Vec<EducationPathway>,
    /// Provider response id for chaining follow-up calls.
    pub response_id: Option<String>,
}

#[derive(Deserialize)]
struct PathwaysPayload {
    pathways: Vec<PathwayOutput>,
}

pub struct PathwayPlanner<'a> {
    generative: &'a dyn GenerativeProvider,
}

impl<'a> PathwayPlanner<'a> {
    pub fn new(generative: &'a dyn GenerativeProvider) -> Self {
        Self { generative }
    }

    /// Generate candidate pathways for a profile.
    ///
    /// Every failure (missing key, provider error, schema violation,
    /// refusal) is wrapped with context and propagated; this component
    /// never silently returns an empty result. Whether to fall back is the
    /// caller's decision.
    pub async fn plan(&self, profile: &UserProfile, options: PlanOptions) -> Result<PlanOutcome> {
        let chained = options.previous_response_id.is_some();
        let prompt = if chained {
            prompts::pathway_delta_prompt(&options.existing_pathways, &options.feedback)
        } else {
            prompts::pathway_planner_prompt(profile, &options.existing_pathways, &options.feedback)
        };

        debug!(chained, prompt_chars = prompt.len(), "planning pathways");

        let (payload, response_id) = extract::extract::<PathwaysPayload>(
            self.generative,
            &prompt,
            extract::pathway_schema(),
            ExtractionContext {
                task: prompts::PATHWAY_PLANNER_SYSTEM.to_string(),
                previous_response_id: options.previous_response_id,
                model: None,
            },
        )
        .await
        .context("pathway planning failed")?;

        if payload.pathways.is_empty() {
            bail!("pathway planning failed: planner returned no pathways");
        }

        let pathways: Vec<EducationPathway> = payload
            .pathways
            .into_iter()
            .take(MAX_PATHWAYS)
            .map(EducationPathway::from_output)
            .collect();

        debug!(count = pathways.len(), "pathways planned");

        Ok(PlanOutcome {
            pathways,
            response_id,
        })
    }
}
