//! Structured extraction from provider output.
//!
//! The happy path is a schema-constrained generative call whose content is
//! already the requested JSON. Real provider output is messier: markdown
//! fences, prose around the payload, trailing commas, smart quotes. When the
//! direct parse fails we scan the raw text for a JSON object or array
//! substring and clean up the common issues before giving up with a
//! descriptive parse error.

use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::providers::{CompletionRequest, GenerativeProvider, SchemaSpec};

/// Extraction call context: task framing plus optional conversation chain.
#[derive(Debug, Clone, Default)]
pub struct ExtractionContext {
    /// System prompt describing what to extract.
    pub task: String,
    /// When present, the provider resumes its stored conversation and the
    /// source text should carry only the delta instruction.
    pub previous_response_id: Option<String>,
    /// Per-call model override.
    pub model: Option<String>,
}

/// Run a schema-constrained extraction and parse the result.
///
/// Returns the parsed value together with the provider's response id so the
/// caller can chain a follow-up call.
pub async fn extract<T: DeserializeOwned>(
    provider: &dyn GenerativeProvider,
    source_text: &str,
    schema: SchemaSpec,
    ctx: ExtractionContext,
) -> Result<(T, Option<String>), ProviderError> {
    let completion = provider
        .complete(CompletionRequest {
            system: ctx.task,
            user: source_text.to_string(),
            schema: Some(schema),
            previous_response_id: ctx.previous_response_id,
            temperature: Some(0.2),
            model: ctx.model,
        })
        .await?;

    let value = parse_payload(&completion.content)?;
    Ok((value, completion.response_id))
}

/// Parse a JSON payload out of raw model output.
///
/// Tries the text as-is first, then falls back to scanning for an embedded
/// object/array fragment with common-issue fixes applied.
pub fn parse_payload<T: DeserializeOwned>(content: &str) -> Result<T, ProviderError> {
    let clean = strip_markdown_fences(content);

    let direct_error = match serde_json::from_str::<T>(clean) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let Some(fragment) = extract_json_fragment(clean, open, close) {
            if let Ok(value) = serde_json::from_str::<T>(fragment) {
                return Ok(value);
            }
            let fixed = fix_json_issues(fragment);
            if let Ok(value) = serde_json::from_str::<T>(&fixed) {
                return Ok(value);
            }
        }
    }

    Err(ProviderError::SchemaParse {
        reason: direct_error.to_string(),
        preview: truncate_str(clean, 200).to_string(),
    })
}

/// Strip markdown code fences from a response.
fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let clean = if trimmed.starts_with("```json") {
        trimmed.strip_prefix("```json").unwrap_or(trimmed)
    } else if trimmed.starts_with("```") {
        trimmed.strip_prefix("```").unwrap_or(trimmed)
    } else {
        trimmed
    };
    let clean = if clean.ends_with("```") {
        clean.strip_suffix("```").unwrap_or(clean)
    } else {
        clean
    };
    clean.trim()
}

/// Extract a JSON fragment between matching delimiters.
fn extract_json_fragment(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if start <= end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Fix common JSON issues in model output.
fn fix_json_issues(json: &str) -> String {
    let mut fixed = json.to_string();

    // Remove trailing commas before ] or }
    fixed = fixed.replace(",]", "]");
    fixed = fixed.replace(",}", "}");

    // Smart quotes to regular quotes
    fixed = fixed.replace('\u{201C}', "\"");
    fixed = fixed.replace('\u{201D}', "\"");
    fixed = fixed.replace('\u{2018}', "'");
    fixed = fixed.replace('\u{2019}', "'");

    // Drop control characters that slip into strings
    fixed = fixed
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    fixed
}

/// Truncate a string for display (Unicode-safe).
pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    if s.chars().count() <= max_chars {
        s
    } else {
        let byte_idx = s
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        &s[..byte_idx]
    }
}

/// Schema for the planner's output: `{ "pathways": [ ...10 fields... ] }`.
pub fn pathway_schema() -> SchemaSpec {
    let pathway_item = serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": [
            "title", "qualificationType", "fieldOfStudy", "subfields",
            "targetRegions", "budgetRange", "duration",
            "alignmentRationale", "alternatives", "queryString"
        ],
        "properties": {
            "title": { "type": "string" },
            "qualificationType": { "type": "string" },
            "fieldOfStudy": { "type": "string" },
            "subfields": { "type": "array", "items": { "type": "string" } },
            "targetRegions": { "type": "array", "items": { "type": "string" } },
            "budgetRange": {
                "type": "object",
                "additionalProperties": false,
                "required": ["min", "max"],
                "properties": {
                    "min": { "type": "integer" },
                    "max": { "type": "integer" }
                }
            },
            "duration": {
                "type": "object",
                "additionalProperties": false,
                "required": ["min", "max"],
                "properties": {
                    "min": { "type": "integer" },
                    "max": { "type": "integer" }
                }
            },
            "alignmentRationale": { "type": "string" },
            "alternatives": { "type": "array", "items": { "type": "string" } },
            "queryString": { "type": "string" }
        }
    });

    SchemaSpec {
        name: "education_pathways",
        schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["pathways"],
            "properties": {
                "pathways": { "type": "array", "items": pathway_item }
            }
        }),
    }
}

/// Schema for evaluated programs: `{ "programs": [ ...16 fields... ] }`.
///
/// The model proposes an `id` to satisfy the required list; the researcher
/// replaces it with a generated one before anything leaves the pipeline.
pub fn program_schema() -> SchemaSpec {
    let rationale = serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["careerAlignment", "budgetFit", "locationMatch", "academicFit"],
        "properties": {
            "careerAlignment": { "type": "integer" },
            "budgetFit": { "type": "integer" },
            "locationMatch": { "type": "integer" },
            "academicFit": { "type": "integer" }
        }
    });

    let program_item = serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": [
            "id", "name", "institution", "degreeType", "fieldOfStudy",
            "description", "costPerYear", "duration", "location",
            "startDate", "applicationDeadline", "requirements",
            "highlights", "scholarships", "matchScore", "matchRationale"
        ],
        "properties": {
            "id": { "type": "string" },
            "name": { "type": "string" },
            "institution": { "type": "string" },
            "degreeType": { "type": "string" },
            "fieldOfStudy": { "type": "string" },
            "description": { "type": "string" },
            "costPerYear": { "type": "integer" },
            "duration": { "type": "string" },
            "location": { "type": "string" },
            "startDate": { "type": "string" },
            "applicationDeadline": { "type": "string" },
            "requirements": { "type": "array", "items": { "type": "string" } },
            "highlights": { "type": "array", "items": { "type": "string" } },
            "scholarships": { "type": "array", "items": { "type": "string" } },
            "matchScore": { "type": "integer" },
            "matchRationale": rationale
        }
    });

    SchemaSpec {
        name: "evaluated_programs",
        schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["programs"],
            "properties": {
                "programs": { "type": "array", "items": program_item }
            }
        }),
    }
}
