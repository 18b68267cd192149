//! Runtime configuration for the recommendation service.
//!
//! Everything is environment-derived and read once at startup; the rest of
//! the pipeline receives an immutable `Config` instead of reaching into the
//! environment itself. Model identifiers for each provider call are
//! independently overridable.

use std::env;
use std::time::Duration;

/// Default model for pathway planning (structured output capable).
const DEFAULT_PLANNER_MODEL: &str = "gpt-4o-2024-08-06";
/// Default model for structured extraction and program evaluation.
const DEFAULT_EXTRACTOR_MODEL: &str = "gpt-4o-mini";
/// Default web-search model on the search provider.
const DEFAULT_SEARCH_MODEL: &str = "sonar-pro";

/// Wall-clock deadline for a whole generate request.
const GLOBAL_DEADLINE_SECS: u64 = 50;
/// Sub-deadline racing the parallel research phase.
const RESEARCH_DEADLINE_SECS: u64 = 25;
/// Hard timeout on individual search-provider requests.
const SEARCH_TIMEOUT_SECS: u64 = 15;

/// Model identifiers, one per provider call site.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub planner: String,
    pub extractor: String,
    pub search: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Primary (generative) credential. Absence is a fatal
    /// misconfiguration for the generate endpoint.
    pub openai_api_key: Option<String>,
    /// Search credential. Absence short-circuits research to simulation.
    pub perplexity_api_key: Option<String>,
    pub models: ModelConfig,
    pub global_deadline: Duration,
    pub research_deadline: Duration,
    pub search_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            perplexity_api_key: non_empty_env("PERPLEXITY_API_KEY"),
            models: ModelConfig {
                planner: non_empty_env("OPENAI_PLANNER_MODEL")
                    .unwrap_or_else(|| DEFAULT_PLANNER_MODEL.to_string()),
                extractor: non_empty_env("OPENAI_EXTRACTOR_MODEL")
                    .unwrap_or_else(|| DEFAULT_EXTRACTOR_MODEL.to_string()),
                search: non_empty_env("PERPLEXITY_MODEL")
                    .unwrap_or_else(|| DEFAULT_SEARCH_MODEL.to_string()),
            },
            global_deadline: Duration::from_secs(GLOBAL_DEADLINE_SECS),
            research_deadline: Duration::from_secs(RESEARCH_DEADLINE_SECS),
            search_timeout: Duration::from_secs(SEARCH_TIMEOUT_SECS),
        }
    }

    /// Whether the primary generative credential is present.
    pub fn has_generative_credentials(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Whether real program research can be attempted at all.
    pub fn has_search_credentials(&self) -> bool {
        self.perplexity_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            perplexity_api_key: None,
            models: ModelConfig {
                planner: DEFAULT_PLANNER_MODEL.to_string(),
                extractor: DEFAULT_EXTRACTOR_MODEL.to_string(),
                search: DEFAULT_SEARCH_MODEL.to_string(),
            },
            global_deadline: Duration::from_secs(GLOBAL_DEADLINE_SECS),
            research_deadline: Duration::from_secs(RESEARCH_DEADLINE_SECS),
            search_timeout: Duration::from_secs(SEARCH_TIMEOUT_SECS),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
