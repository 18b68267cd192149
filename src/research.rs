//! Two-tier research invocation: search provider first, generative fallback
//! second. Returns raw unstructured text; structuring happens downstream.

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::prompts;
use crate::providers::{CompletionRequest, GenerativeProvider, SearchProvider};

/// Run a research query through the fallback chain.
///
/// Any primary failure (timeout, auth, network, empty answer) falls back to
/// the generative provider with a research-framing prompt around the same
/// query. If both tiers fail the combined cause propagates to the caller;
/// the simulation tier lives one level up, not here. No partial results.
pub async fn research_with_fallback(
    search: &dyn SearchProvider,
    generative: &dyn GenerativeProvider,
    query: &str,
) -> Result<String> {
    let search_error = match search.search(query).await {
        Ok(text) => return Ok(text),
        Err(e) => e,
    };

    warn!(error = %search_error, "search provider failed, falling back to generative research");

    let completion = generative
        .complete(CompletionRequest {
            system: prompts::RESEARCH_FALLBACK_SYSTEM.to_string(),
            user: prompts::research_fallback_prompt(query),
            schema: None,
            previous_response_id: None,
            temperature: Some(0.3),
            model: None,
        })
        .await
        .map_err(|fallback_error| {
            anyhow!(
                "research failed on both tiers: search provider: {}; generative fallback: {}",
                search_error,
                fallback_error
            )
        })?;

    Ok(completion.content)
}
