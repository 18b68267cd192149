//! OpenAI Responses API client.
//!
//! Used for pathway planning, structured extraction, program evaluation and
//! as the generative fallback behind the search provider. Schema-constrained
//! calls request strict adherence; refusals surface as their own error kind
//! so callers never mistake them for parse failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Completion, CompletionRequest, GenerativeProvider};
use crate::error::ProviderError;

const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Provider label used in errors and logs.
const PROVIDER: &str = "openai";

/// Generative calls get a generous client timeout rather than the search
/// tier's aggressive 15s; planning calls legitimately run long.
const REQUEST_TIMEOUT_SECS: u64 = 120;

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ResponsesRequest {
    model: String,
    input: Vec<InputMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct InputMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct TextOptions {
    format: SchemaFormat,
}

#[derive(Serialize)]
struct SchemaFormat {
    #[serde(rename = "type")]
    format_type: String,
    name: String,
    schema: serde_json::Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    id: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl GenerativeProvider for OpenAiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("OPENAI_API_KEY"))?;

        let text = request.schema.map(|spec| TextOptions {
            format: SchemaFormat {
                format_type: "json_schema".to_string(),
                name: spec.name.to_string(),
                schema: spec.schema,
                strict: true,
            },
        });

        let mut input = Vec::with_capacity(2);
        if !request.system.is_empty() {
            input.push(InputMessage {
                role: "system".to_string(),
                content: request.system,
            });
        }
        input.push(InputMessage {
            role: "user".to_string(),
            content: request.user,
        });

        let body = ResponsesRequest {
            model: request.model.unwrap_or_else(|| self.model.clone()),
            input,
            text,
            previous_response_id: request.previous_response_id,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(OPENAI_RESPONSES_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, REQUEST_TIMEOUT_SECS, e))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, REQUEST_TIMEOUT_SECS, e))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER, status.as_u16(), raw));
        }

        let parsed: ResponsesResponse = serde_json::from_str(&raw).map_err(|e| {
            ProviderError::SchemaParse {
                reason: format!("malformed provider envelope: {}", e),
                preview: preview(&raw),
            }
        })?;

        extract_message(parsed)
    }
}

/// Pull the first output message out of a responses envelope, surfacing an
/// explicit refusal as its own error kind.
fn extract_message(parsed: ResponsesResponse) -> Result<Completion, ProviderError> {
    let response_id = parsed.id;
    for item in parsed.output {
        if item.item_type != "message" {
            continue;
        }
        for part in item.content {
            if part.part_type == "refusal" {
                let message = part.refusal.unwrap_or_else(|| "no reason given".to_string());
                return Err(ProviderError::Refusal(message));
            }
            if part.part_type == "output_text" {
                if let Some(text) = part.text {
                    return Ok(Completion {
                        content: text,
                        response_id,
                    });
                }
            }
        }
    }
    Err(ProviderError::SchemaParse {
        reason: "response contained no output text".to_string(),
        preview: String::new(),
    })
}

fn preview(text: &str) -> String {
    crate::extract::truncate_str(text, 200).to_string()
}
