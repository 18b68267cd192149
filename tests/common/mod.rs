//! Shared provider fakes for pipeline and HTTP tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use compass::error::ProviderError;
use compass::providers::{Completion, CompletionRequest, GenerativeProvider, SearchProvider};

/// What a fake call does when it is reached.
#[derive(Clone)]
pub enum Reply {
    Ok(String),
    Fail,
    Hang,
}

impl Reply {
    async fn resolve(&self, response_id: Option<String>) -> Result<Completion, ProviderError> {
        match self {
            Reply::Ok(content) => Ok(Completion {
                content: content.clone(),
                response_id,
            }),
            Reply::Fail => Err(ProviderError::Http {
                provider: "fake",
                status: 500,
                body: "scripted failure".to_string(),
            }),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::Timeout {
                    provider: "fake",
                    seconds: 3600,
                })
            }
        }
    }
}

pub struct FakeSearch {
    pub configured: bool,
    pub reply: Reply,
    pub calls: AtomicUsize,
}

impl FakeSearch {
    pub fn succeeding() -> Self {
        Self {
            configured: true,
            reply: Reply::Ok("Research notes: several well-known programs.".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            reply: Reply::Fail,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn hanging() -> Self {
        Self {
            configured: true,
            reply: Reply::Hang,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search(&self, _query: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.resolve(None).await.map(|c| c.content)
    }
}

/// Scripted generative provider: replies are selected by the requested
/// schema, mirroring how the real call sites differ.
pub struct FakeGenerative {
    pub plan: Reply,
    pub programs: Reply,
    pub research: Reply,
    /// Response id attached to successful planning replies; `Some` routes
    /// the researcher through the chained evaluation path.
    pub plan_response_id: Option<String>,
}

impl FakeGenerative {
    pub fn planning_ok(pathway_count: usize) -> Self {
        Self {
            plan: Reply::Ok(pathway_payload(pathway_count)),
            programs: Reply::Ok(program_payload(3)),
            research: Reply::Ok("Fallback research notes.".to_string()),
            plan_response_id: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            plan: Reply::Fail,
            programs: Reply::Fail,
            research: Reply::Fail,
            plan_response_id: None,
        }
    }
}

#[async_trait]
impl GenerativeProvider for FakeGenerative {
    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        match request.schema.as_ref().map(|s| s.name) {
            Some("education_pathways") => {
                self.plan.resolve(self.plan_response_id.clone()).await
            }
            Some("evaluated_programs") => self.programs.resolve(None).await,
            _ => self.research.resolve(None).await,
        }
    }
}

/// A planner payload with `count` distinct pathways.
pub fn pathway_payload(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{
                    "title": "Pathway {i}",
                    "qualificationType": "Master",
                    "fieldOfStudy": "Data Science",
                    "subfields": ["Machine Learning"],
                    "targetRegions": ["Germany"],
                    "budgetRange": {{"min": 8000, "max": 20000}},
                    "duration": {{"min": 12, "max": 24}},
                    "alignmentRationale": "fits the profile",
                    "alternatives": [],
                    "queryString": "data science masters germany"
                }}"#
            )
        })
        .collect();
    format!(r#"{{"pathways":[{}]}}"#, items.join(","))
}

/// An extraction payload with `count` programs.
pub fn program_payload(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{
                    "id": "model-{i}",
                    "name": "Program {i}",
                    "institution": "University {i}",
                    "degreeType": "Master of Science",
                    "fieldOfStudy": "Data Science",
                    "description": "A data science program.",
                    "costPerYear": 12000,
                    "duration": "24 months",
                    "location": "Berlin, Germany",
                    "startDate": "September 2026",
                    "applicationDeadline": "May 2026",
                    "requirements": ["Bachelor degree"],
                    "highlights": ["Industry partners"],
                    "scholarships": [],
                    "matchScore": 85,
                    "matchRationale": {{
                        "careerAlignment": 88,
                        "budgetFit": 84,
                        "locationMatch": 82,
                        "academicFit": 86
                    }}
                }}"#
            )
        })
        .collect();
    format!(r#"{{"programs":[{}]}}"#, items.join(","))
}
