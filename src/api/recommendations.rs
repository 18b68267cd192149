//! POST /recommendations/generate

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::profile::UserProfile;
use crate::program::RecommendationProgram;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    /// Accepted for contract compatibility with the document-sync surface;
    /// the pipeline itself does not consume it.
    #[serde(default)]
    pub vector_store_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub recommendations: Vec<RecommendationProgram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Generate ranked program recommendations for a profile.
///
/// Degrades, never fails: besides the 400 for a missing profile and the 500
/// for a missing primary credential, every outcome is a 200, worst case
/// simulated results with a note.
pub async fn generate_recommendations(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let Some(mut profile) = request.user_profile else {
        return Err(ApiError::MissingParameter("userProfile"));
    };
    if !state.generative_configured {
        return Err(ApiError::Configuration(
            "OPENAI_API_KEY is not configured".to_string(),
        ));
    }
    if let Some(vector_store_id) = &request.vector_store_id {
        debug!(vector_store_id = %vector_store_id, "vector store id supplied; not used by the pipeline");
    }

    profile.normalize();
    let result = state.orchestrator.generate(&profile).await;
    info!(
        count = result.programs.len(),
        degraded = result.note.is_some(),
        "recommendations assembled"
    );

    Ok(Json(GenerateResponse {
        recommendations: result.programs,
        note: result.note,
    }))
}

pub fn recommendation_routes() -> Router<AppState> {
    Router::new().route("/recommendations/generate", post(generate_recommendations))
}
