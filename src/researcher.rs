//! Per-pathway program research.
//!
//! Search-first: build a detailed query, run it through the research
//! fallback chain, structure the raw text, then score. Scoring is either the
//! ranked heuristic computed here, or, when a planner response id is
//! available, a chained evaluate-and-score call against the generative
//! provider. Every failure degrades to simulated programs for this single
//! pathway; one pathway's trouble never aborts the others.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::extract::{self, ExtractionContext};
use crate::pathway::EducationPathway;
use crate::profile::UserProfile;
use crate::program::{MatchRationale, RecommendationProgram};
use crate::prompts;
use crate::providers::{GenerativeProvider, SearchProvider};
use crate::research::research_with_fallback;
use crate::scorer;
use crate::simulated;

/// Programs accepted per pathway from one research pass.
const MAX_PROGRAMS_PER_PATHWAY: usize = 5;

#[derive(Deserialize)]
struct ProgramsPayload {
    programs: Vec<RecommendationProgram>,
}

pub struct ProgramResearcher<'a> {
    search: &'a dyn SearchProvider,
    generative: &'a dyn GenerativeProvider,
    /// Model override for extraction/evaluation calls; planning keeps the
    /// client default.
    extractor_model: Option<String>,
}

impl<'a> ProgramResearcher<'a> {
    pub fn new(search: &'a dyn SearchProvider, generative: &'a dyn GenerativeProvider) -> Self {
        Self {
            search,
            generative,
            extractor_model: None,
        }
    }

    pub fn with_extractor_model(mut self, model: Option<String>) -> Self {
        self.extractor_model = model;
        self
    }

    /// Research one pathway. Infallible: an unconfigured search provider
    /// short-circuits to simulation, and any mid-pipeline failure degrades
    /// to simulation for this pathway alone.
    pub async fn research(
        &self,
        pathway: &EducationPathway,
        profile: &UserProfile,
        planner_response_id: Option<&str>,
    ) -> Vec<RecommendationProgram> {
        if !self.search.is_configured() {
            debug!(pathway = %pathway.title, "search provider unconfigured; simulating");
            return simulated::generate(std::slice::from_ref(pathway));
        }

        match self
            .research_real(pathway, profile, planner_response_id)
            .await
        {
            Ok(programs) if !programs.is_empty() => programs,
            Ok(_) => {
                warn!(pathway = %pathway.title, "research produced no programs; simulating");
                simulated::generate(std::slice::from_ref(pathway))
            }
            Err(error) => {
                warn!(pathway = %pathway.title, error = %error, "research failed; simulating");
                simulated::generate(std::slice::from_ref(pathway))
            }
        }
    }

    async fn research_real(
        &self,
        pathway: &EducationPathway,
        profile: &UserProfile,
        planner_response_id: Option<&str>,
    ) -> Result<Vec<RecommendationProgram>> {
        let query = prompts::research_query(pathway, profile);
        let raw = research_with_fallback(self.search, self.generative, &query)
            .await
            .with_context(|| format!("research failed for pathway \"{}\"", pathway.title))?;

        debug!(pathway = %pathway.title, chars = raw.len(), "research text collected");

        let (payload, _) = extract::extract::<ProgramsPayload>(
            self.generative,
            &raw,
            extract::program_schema(),
            ExtractionContext {
                task: prompts::PROGRAM_EXTRACTION_SYSTEM.to_string(),
                previous_response_id: None,
                model: self.extractor_model.clone(),
            },
        )
        .await
        .with_context(|| format!("program extraction failed for pathway \"{}\"", pathway.title))?;

        let mut programs = payload.programs;
        programs.truncate(MAX_PROGRAMS_PER_PATHWAY);

        // When planning left a conversation behind, let the model score the
        // batch against the profile it already holds. Otherwise (or if that
        // call fails) fall back to the ranked heuristic.
        if let Some(response_id) = planner_response_id {
            match self.evaluate_chained(&programs, profile, response_id).await {
                Ok(evaluated) if !evaluated.is_empty() => return Ok(evaluated),
                Ok(_) => {
                    warn!(pathway = %pathway.title, "evaluation returned no programs; scoring locally")
                }
                Err(error) => {
                    warn!(pathway = %pathway.title, error = %error, "evaluation failed; scoring locally")
                }
            }
        }

        let mut rng = rand::thread_rng();
        for (rank, program) in programs.iter_mut().enumerate() {
            program.id = RecommendationProgram::fresh_id();
            let rationale = scorer::ranked_rationale(rank, pathway, program, &mut rng);
            program.match_rationale = rationale;
            program.match_score = rationale.overall_score();
        }

        Ok(programs)
    }

    /// Evaluate-and-score via a call chained onto the planner response: the
    /// provider holds the profile, so only the program batch is sent. Keeps
    /// the top 5 by score, with the overall score recomputed here so the
    /// weighted invariant holds regardless of what the model emitted. A
    /// program that comes back without a rationale gets the standalone
    /// enhancement pass instead.
    async fn evaluate_chained(
        &self,
        programs: &[RecommendationProgram],
        profile: &UserProfile,
        previous_response_id: &str,
    ) -> Result<Vec<RecommendationProgram>> {
        let listing =
            serde_json::to_string(programs).context("failed to serialize programs for evaluation")?;

        let (payload, _) = extract::extract::<ProgramsPayload>(
            self.generative,
            &prompts::evaluation_prompt(&listing),
            extract::program_schema(),
            ExtractionContext {
                task: prompts::EVALUATION_SYSTEM.to_string(),
                previous_response_id: Some(previous_response_id.to_string()),
                model: self.extractor_model.clone(),
            },
        )
        .await
        .context("program evaluation failed")?;

        let mut rng = rand::thread_rng();
        let mut evaluated = payload.programs;
        for program in &mut evaluated {
            program.id = RecommendationProgram::fresh_id();
            if program.match_rationale == MatchRationale::default() {
                scorer::enhance(program, profile, &mut rng);
            } else {
                program.match_rationale = program.match_rationale.sanitized();
                program.match_score = program.match_rationale.overall_score();
            }
        }
        evaluated.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        evaluated.truncate(MAX_PROGRAMS_PER_PATHWAY);
        Ok(evaluated)
    }
}
