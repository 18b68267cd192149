//! compass - education pathway and program recommendation service.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use compass::api::{build_router, AppState};
use compass::config::Config;
use compass::orchestrator::Orchestrator;
use compass::providers::{GenerativeProvider, OpenAiClient, PerplexityClient, SearchProvider};

#[derive(Parser, Debug)]
#[command(
    name = "compass",
    about = "AI-guided education pathway and program advisor",
    version
)]
struct Args {
    /// Address to bind
    #[arg(long, env = "COMPASS_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "COMPASS_PORT", default_value = "8270")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("compass=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        search_configured = config.has_search_credentials(),
        generative_configured = config.has_generative_credentials(),
        "starting compass"
    );

    let search: Arc<dyn SearchProvider> = Arc::new(PerplexityClient::new(
        config.perplexity_api_key.clone(),
        config.models.search.clone(),
        config.search_timeout,
    ));
    let generative: Arc<dyn GenerativeProvider> = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.models.planner.clone(),
    ));

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&search),
        Arc::clone(&generative),
        &config,
    ));
    let state = AppState::new(
        orchestrator,
        generative,
        config.has_generative_credentials(),
    );

    let app = build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
