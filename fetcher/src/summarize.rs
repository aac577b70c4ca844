//! Abstractive summaries through a hosted pre-trained model.

use async_trait::async_trait;
use common::JobSearchError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_SUMMARIZER_URL: &str = "https://api-inference.huggingface.co/models/t5-small";

/// Upper bound on summary length, in tokens.
pub const SUMMARY_MAX_TOKENS: usize = 50;
/// Lower bound on summary length, in tokens; the model may undershoot on short input.
pub const SUMMARY_MIN_TOKENS: usize = 10;

/// Produces a single summary for a block of text.
#[async_trait]
pub trait Summarizer: Send + Sync + std::fmt::Debug {
    /// # Errors
    /// - `JobSearchError::MissingText` - `text` is blank, no request made
    /// - `JobSearchError::SummarizeFailed` - the model call failed
    async fn summarize(&self, text: &str) -> Result<String, JobSearchError>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParameters {
    pub max_length: usize,
    pub min_length: usize,
    pub do_sample: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_length: SUMMARY_MAX_TOKENS,
            min_length: SUMMARY_MIN_TOKENS,
            do_sample: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

/// Summarization pipeline on the Hugging Face Inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceSummarizer {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    parameters: GenerationParameters,
}

impl HuggingFaceSummarizer {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
    ) -> Result<Self, JobSearchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| JobSearchError::SummarizeFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            parameters: GenerationParameters::default(),
        })
    }

    pub fn parameters(&self) -> GenerationParameters {
        self.parameters
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, JobSearchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(JobSearchError::MissingText);
        }

        let failed = |reason: String| JobSearchError::SummarizeFailed { reason };

        info!(chars = text.len(), "Requesting summary");
        let mut request = self.client.post(&self.endpoint).json(&InferenceRequest {
            inputs: text,
            parameters: self.parameters,
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| failed(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("HTTP {status}: {body}")));
        }

        let items: Vec<SummaryItem> = response.json().await.map_err(|e| failed(e.to_string()))?;
        let summary = items
            .into_iter()
            .next()
            .map(|item| item.summary_text)
            .ok_or_else(|| failed("model returned no summary".to_string()))?;

        Ok(enforce_bounds(&summary))
    }
}

/// Caps a summary at [`SUMMARY_MAX_TOKENS`] whitespace tokens.
///
/// Short summaries pass through; the lower bound is only a model hint.
pub fn enforce_bounds(summary: &str) -> String {
    let tokens: Vec<&str> = summary.split_whitespace().collect();
    if tokens.len() < SUMMARY_MIN_TOKENS {
        warn!(tokens = tokens.len(), "Summary shorter than requested minimum");
    }
    tokens
        .into_iter()
        .take(SUMMARY_MAX_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}
