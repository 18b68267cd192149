//! HTTP surface for the recommendation service.

pub mod health;
pub mod pathways;
pub mod recommendations;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;
use crate::providers::GenerativeProvider;

pub use health::health_routes;
pub use pathways::pathway_routes;
pub use recommendations::recommendation_routes;

/// Shared handler state. Provider clients are constructed once at startup
/// and injected; handlers never build clients of their own.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub generative: Arc<dyn GenerativeProvider>,
    /// Presence of the primary credential; absence is the one 500 case.
    pub generative_configured: bool,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        generative: Arc<dyn GenerativeProvider>,
        generative_configured: bool,
    ) -> Self {
        Self {
            orchestrator,
            generative,
            generative_configured,
            startup_time: Utc::now(),
        }
    }
}

/// Assemble the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(recommendation_routes())
        .merge(pathway_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
