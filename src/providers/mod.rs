//! External provider clients.
//!
//! Each client is a thin request/response wrapper around one provider: auth
//! header, hard timeout, raw-error propagation. Retries and fallbacks belong
//! to the callers. The traits exist so the orchestrator takes injected
//! clients and tests can substitute fakes.

pub mod openai;
pub mod perplexity;

use async_trait::async_trait;

use crate::error::ProviderError;

pub use openai::OpenAiClient;
pub use perplexity::PerplexityClient;

/// A JSON schema the model's output must satisfy, by name.
#[derive(Debug, Clone)]
pub struct SchemaSpec {
    pub name: &'static str,
    pub schema: serde_json::Value,
}

/// One generative call: system + user message, optional schema constraint,
/// optional provider-side conversation chaining.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub schema: Option<SchemaSpec>,
    /// When set, the provider resumes its stored conversation and the
    /// `user` text carries only the delta instruction.
    pub previous_response_id: Option<String>,
    pub temperature: Option<f32>,
    /// Per-call model override; falls back to the client's default.
    pub model: Option<String>,
}

/// A successful generative response.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    /// Identifier for chaining a follow-up call to this response.
    pub response_id: Option<String>,
}

/// Web-search-augmented text provider (primary research tier).
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Whether credentials are configured; absence short-circuits research.
    fn is_configured(&self) -> bool;

    async fn search(&self, query: &str) -> Result<String, ProviderError>;
}

/// Schema-capable generative provider (planning, extraction, fallback tier).
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;
}
