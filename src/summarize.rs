//! Document summarization behind a narrow, injectable seam.
//!
//! The pipeline only ever sees [`Summarizer`]; production runs use
//! [`OllamaSummarizer`] against an Ollama chat endpoint, tests use
//! [`MockSummarizer`].

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::PrepError;

const SUMMARY_SYSTEM_PROMPT: &str =
    "Summarize the following document in one concise paragraph.";

/// Reasoning models wrap deliberation in `<think>` blocks; only the text
/// after them is the summary.
static THINK_BLOCKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("static pattern"));

/// Produces a one-paragraph summary of a document.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, document: &str) -> Result<String, PrepError>;
}

/// Summarizer backed by an Ollama `/api/chat` endpoint.
pub struct OllamaSummarizer {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl OllamaSummarizer {
    /// Builds a summarizer talking to `base_url` (scheme, host, port).
    pub fn new(
        client: reqwest::Client,
        base_url: &Url,
        model: impl Into<String>,
    ) -> Result<Self, PrepError> {
        let endpoint = base_url
            .join("api/chat")
            .map_err(|err| PrepError::Config(format!("bad Ollama base url: {err}")))?;
        Ok(Self {
            client,
            endpoint,
            model: model.into(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, document: &str) -> Result<String, PrepError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SUMMARY_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: document,
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body: ChatResponse = response.json().await?;

        let summary = strip_think_blocks(&body.message.content);
        if summary.is_empty() {
            return Err(PrepError::EmptySummary);
        }
        Ok(summary)
    }
}

/// Removes `<think>…</think>` blocks and trims the remainder.
fn strip_think_blocks(raw: &str) -> String {
    THINK_BLOCKS.replace_all(raw, "").trim().to_string()
}

/// Deterministic summarizer for tests: returns a fixed summary, or fails for
/// documents containing a configured marker.
pub struct MockSummarizer {
    summary: String,
    fail_marker: Option<String>,
}

impl MockSummarizer {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            fail_marker: None,
        }
    }

    /// Makes `summarize` fail for any document containing `marker`.
    #[must_use]
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, document: &str) -> Result<String, PrepError> {
        if let Some(marker) = &self.fail_marker {
            if document.contains(marker.as_str()) {
                return Err(PrepError::EmptySummary);
            }
        }
        Ok(self.summary.clone())
    }
}
