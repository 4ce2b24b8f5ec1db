//! HTTP client for the Book Writer AI backend.
//!
//! This module provides:
//!
//! - `OperationKind`: the actions the backend exposes (three agents, the book
//!   workflow, and book generation), each with a fixed endpoint
//! - `Submission`: a validated request ready to send, carrying the body or
//!   query shape its endpoint expects
//! - `ApiClient`: a thin `reqwest` wrapper that performs exactly one request
//!   per submission and normalizes the outcome
//! - `SubmitError`: every way a submission can fail, before or after dispatch
//!
//! Response bodies are treated as opaque JSON. `SuccessPayload` offers guarded
//! accessors for the shapes the UI knows how to present.

use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::BackendConfig;

/// User agent for API requests
const USER_AGENT: &str = concat!("Scribe/", env!("CARGO_PKG_VERSION"));

/// Longest slice of a non-JSON error body carried into an error message
const MAX_DETAIL_CHARS: usize = 200;

/// An action the backend can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    /// Writer agent: drafts text from a prompt
    #[default]
    Write,
    /// Reviewer agent: critiques supplied text
    Review,
    /// Designer agent: proposes layout from context
    Design,
    /// Full writer/reviewer/designer workflow from one prompt
    Workflow,
    /// Generate a whole book and export DOCX/PDF files
    GenerateBook,
}

impl OperationKind {
    /// All operations, in display order
    pub fn all() -> &'static [OperationKind] {
        &[
            OperationKind::Write,
            OperationKind::Review,
            OperationKind::Design,
            OperationKind::Workflow,
            OperationKind::GenerateBook,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Write => "Writer",
            OperationKind::Review => "Reviewer",
            OperationKind::Design => "Designer",
            OperationKind::Workflow => "Book workflow",
            OperationKind::GenerateBook => "Generate book",
        }
    }

    /// Endpoint path relative to the backend base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            OperationKind::Write => "/agents/write",
            OperationKind::Review => "/agents/review",
            OperationKind::Design => "/agents/design",
            OperationKind::Workflow => "/workflows/run_book_flow",
            OperationKind::GenerateBook => "/books/generate",
        }
    }

    /// Whether this operation takes a title/topic pair instead of free text
    pub fn is_book(&self) -> bool {
        matches!(self, OperationKind::GenerateBook)
    }

    /// Placeholder shown in the input box
    pub fn input_hint(&self) -> &'static str {
        match self {
            OperationKind::Write | OperationKind::Workflow => "Enter a prompt",
            OperationKind::Review => "Paste the text to review",
            OperationKind::Design => "Describe the design context",
            OperationKind::GenerateBook => "Enter a title and a topic",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A request that passed validation and is ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Write { prompt: String },
    Review { text: String },
    Design { context: String },
    Workflow { prompt: String },
    GenerateBook { title: String, topic: String },
}

impl Submission {
    /// Build a free-text submission, rejecting blank input.
    pub fn agent(kind: OperationKind, text: &str) -> Result<Self, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::Validation("Please enter some text first.".into()));
        }

        let text = text.to_string();
        Ok(match kind {
            OperationKind::Write => Submission::Write { prompt: text },
            OperationKind::Review => Submission::Review { text },
            OperationKind::Design => Submission::Design { context: text },
            OperationKind::Workflow => Submission::Workflow { prompt: text },
            OperationKind::GenerateBook => {
                return Err(SubmitError::Validation(
                    "Book generation needs a title and a topic.".into(),
                ));
            }
        })
    }

    /// Build a book generation submission, rejecting a blank title or topic.
    pub fn book(title: &str, topic: &str) -> Result<Self, SubmitError> {
        if title.trim().is_empty() {
            return Err(SubmitError::Validation("Please enter a book title.".into()));
        }
        if topic.trim().is_empty() {
            return Err(SubmitError::Validation("Please enter a book topic.".into()));
        }

        Ok(Submission::GenerateBook {
            title: title.to_string(),
            topic: topic.to_string(),
        })
    }

    /// The operation this submission performs
    pub fn kind(&self) -> OperationKind {
        match self {
            Submission::Write { .. } => OperationKind::Write,
            Submission::Review { .. } => OperationKind::Review,
            Submission::Design { .. } => OperationKind::Design,
            Submission::Workflow { .. } => OperationKind::Workflow,
            Submission::GenerateBook { .. } => OperationKind::GenerateBook,
        }
    }

    /// JSON body for agent endpoints. Book generation sends no body.
    fn body(&self) -> Option<Value> {
        match self {
            Submission::Write { prompt } | Submission::Workflow { prompt } => {
                Some(json!({ "prompt": prompt }))
            }
            Submission::Review { text } => Some(json!({ "text": text })),
            Submission::Design { context } => Some(json!({ "context": context })),
            Submission::GenerateBook { .. } => None,
        }
    }

    /// Query parameters (only book generation uses them)
    fn query(&self) -> Vec<(&'static str, &str)> {
        match self {
            Submission::GenerateBook { title, topic } => {
                vec![("title", title.as_str()), ("topic", topic.as_str())]
            }
            _ => Vec::new(),
        }
    }
}

/// Everything that can go wrong with a submission
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Input rejected before anything was sent
    #[error("{0}")]
    Validation(String),

    /// Request could not be sent or the response body could not be read
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response arrived but was not valid JSON
    #[error("Could not parse backend response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Backend answered with a non-success status
    #[error("{}", application_message(.status, .detail.as_deref()))]
    Application {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
}

impl SubmitError {
    /// Whether the failure happened before dispatch
    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::Validation(_))
    }
}

fn application_message(status: &reqwest::StatusCode, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("Backend returned {}: {}", status, detail),
        None => format!("Backend returned {}", status),
    }
}

/// Pull a human-readable detail out of an error body.
///
/// FastAPI reports failures as `{"detail": ...}`; anything else is passed
/// through as (truncated) text.
fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return match value.get("detail") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(value.to_string()),
        };
    }

    Some(body.chars().take(MAX_DETAIL_CHARS).collect())
}

/// Parsed JSON from a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessPayload {
    pub operation: OperationKind,
    pub body: Value,
}

impl SuccessPayload {
    /// Pretty-printed JSON body
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }

    /// Book metadata, if this was a book generation with file links
    pub fn book(&self) -> Option<BookArtifacts> {
        if !self.operation.is_book() {
            return None;
        }
        serde_json::from_value(self.body.clone()).ok()
    }

    /// Agent text output (`output` for agents, `result` for the workflow)
    pub fn agent_output(&self) -> Option<&str> {
        self.body
            .get("output")
            .or_else(|| self.body.get("result"))
            .and_then(Value::as_str)
    }
}

/// Files produced by book generation, as paths relative to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookArtifacts {
    #[serde(default)]
    pub title: String,
    pub docx_file: String,
    pub pdf_file: String,
}

/// Backend API client
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Backend base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a submission and normalize the outcome.
    ///
    /// Performs exactly one POST. No retries, no timeout beyond the client
    /// default.
    pub async fn submit(&self, submission: &Submission) -> Result<SuccessPayload, SubmitError> {
        let start = Instant::now();
        let operation = submission.kind();
        let url = format!("{}{}", self.base_url, operation.endpoint());

        tracing::info!("Submitting {} to {}", operation, url);

        let mut request = self.client.post(&url);
        let query = submission.query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = submission.body() {
            request = request.json(&body);
        }

        let response = request.send().await.inspect_err(|e| {
            tracing::warn!("{} request failed: {}", operation, e);
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} returned {}", operation, status);
            return Err(SubmitError::Application {
                status,
                detail: extract_detail(&text),
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(SubmitError::Decode)?;
        tracing::info!(
            "{} completed in {:.1}s",
            operation,
            start.elapsed().as_secs_f32()
        );

        Ok(SuccessPayload { operation, body })
    }

    /// Query the backend root for its health message
    pub async fn ping(&self) -> Result<Value> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Backend health check failed: {}", response.status());
        }

        Ok(response.json().await?)
    }
}
