//! Perplexity search API client.
//!
//! The primary research tier: web-search-augmented chat completions at low
//! temperature with high search context. Enforces a hard 15s timeout via the
//! underlying HTTP client so a slow search can never stall the research
//! phase past its own deadline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::SearchProvider;
use crate::error::ProviderError;

const PERPLEXITY_URL: &str = "https://api.perplexity.ai/chat/completions";

const PROVIDER: &str = "perplexity";

const SEARCH_SYSTEM_PROMPT: &str = "You are a research assistant specializing in international \
    education. Answer with concrete, current program information: names, institutions, tuition, \
    duration, locations, deadlines and entry requirements.";

pub struct PerplexityClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct SearchRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    web_search_options: WebSearchOptions,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct WebSearchOptions {
    search_context_size: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

impl PerplexityClient {
    pub fn new(api_key: Option<String>, model: String, timeout: Duration) -> Self {
        let timeout_secs = timeout.as_secs();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            model,
            timeout_secs,
        }
    }
}

#[async_trait]
impl SearchProvider for PerplexityClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("PERPLEXITY_API_KEY"))?;

        let body = SearchRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SEARCH_SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: query.to_string(),
                },
            ],
            temperature: 0.1,
            web_search_options: WebSearchOptions {
                search_context_size: "high".to_string(),
            },
        };

        let response = self
            .client
            .post(PERPLEXITY_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, self.timeout_secs, e))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, self.timeout_secs, e))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(
                PROVIDER,
                status.as_u16(),
                crate::extract::truncate_str(&raw, 200).to_string(),
            ));
        }

        let parsed: SearchResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::SchemaParse {
                reason: format!("malformed search envelope: {}", e),
                preview: crate::extract::truncate_str(&raw, 200).to_string(),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::Http {
                provider: PROVIDER,
                status: status.as_u16(),
                body: "search returned an empty answer".to_string(),
            });
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_without_key_is_missing_credential() {
        let client = PerplexityClient::new(None, "sonar-pro".to_string(), Duration::from_secs(15));
        assert!(!client.is_configured());
        let err = client.search("data science masters").await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MissingCredential("PERPLEXITY_API_KEY")
        ));
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Programs: ..."}}]}"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Programs: ...");
    }
}
