//! POST /pathways/generate (pathway exploration)

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::orchestrator::default_pathway;
use crate::pathway::EducationPathway;
use crate::planner::{PathwayFeedback, PathwayPlanner, PlanOptions};
use crate::profile::UserProfile;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwaysRequest {
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub existing_pathways: Vec<EducationPathway>,
    #[serde(default)]
    pub feedback_history: Vec<PathwayFeedback>,
    #[serde(default)]
    pub previous_response_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwaysResponse {
    pub pathways: Vec<EducationPathway>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Plan (or re-plan) pathways for a profile, honoring dedup instructions
/// and feedback history. Planner failure degrades to a generic default
/// pathway with a note rather than an error.
pub async fn generate_pathways(
    State(state): State<AppState>,
    Json(request): Json<PathwaysRequest>,
) -> ApiResult<Json<PathwaysResponse>> {
    let Some(mut profile) = request.user_profile else {
        return Err(ApiError::MissingParameter("userProfile"));
    };
    if !state.generative_configured {
        return Err(ApiError::Configuration(
            "OPENAI_API_KEY is not configured".to_string(),
        ));
    }

    profile.normalize();
    let planner = PathwayPlanner::new(state.generative.as_ref());
    let options = PlanOptions {
        previous_response_id: request.previous_response_id,
        existing_pathways: request.existing_pathways,
        feedback: request.feedback_history,
    };

    match planner.plan(&profile, options).await {
        Ok(outcome) => {
            info!(count = outcome.pathways.len(), "pathways planned");
            Ok(Json(PathwaysResponse {
                pathways: outcome.pathways,
                response_id: outcome.response_id,
                note: None,
            }))
        }
        Err(error) => {
            warn!(error = %format!("{:#}", error), "pathway planning failed; serving default pathway");
            Ok(Json(PathwaysResponse {
                pathways: vec![default_pathway(&profile)],
                response_id: None,
                note: Some(
                    "Pathway generation error; showing a generic pathway as a fallback."
                        .to_string(),
                ),
            }))
        }
    }
}

pub fn pathway_routes() -> Router<AppState> {
    Router::new().route("/pathways/generate", post(generate_pathways))
}
