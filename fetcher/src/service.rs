//! The job query pipeline: validate, fetch, parse, hand results to the renderer.

use crate::backend::JobBackend;
use crate::credentials::ApiKeySource;
use crate::scrape::GoogleScrapeBackend;
use crate::serpapi::SerpApiBackend;
use crate::summarize::Summarizer;
use common::{BackendKind, JobPosting, JobQuery, JobSearchError};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// What one search action produced.
///
/// Failures never carry partial results: `error` is set and `jobs` is empty.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub backend: BackendKind,
    pub query: Option<JobQuery>,
    pub jobs: Vec<JobPosting>,
    pub error: Option<String>,
}

impl SearchOutcome {
    fn failed(backend: BackendKind, query: Option<JobQuery>, err: &JobSearchError) -> Self {
        Self {
            backend,
            query,
            jobs: Vec::new(),
            error: Some(err.user_message()),
        }
    }
}

/// Stateless front door shared by the CLI and the web server.
#[derive(Debug, Clone)]
pub struct JobSearchService {
    backends: HashMap<BackendKind, Arc<dyn JobBackend>>,
    default_backend: BackendKind,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl JobSearchService {
    pub fn new(default_backend: BackendKind) -> Self {
        Self {
            backends: HashMap::new(),
            default_backend,
            summarizer: None,
        }
    }

    /// Service with the scrape, inline-key API and secret-store API backends.
    ///
    /// # Errors
    /// - `JobSearchError::RequestFailed` - a base URL is invalid
    pub fn with_standard_backends(
        default_backend: BackendKind,
        google_url: &str,
        serpapi_url: &str,
        api_key: Option<String>,
        secrets_path: PathBuf,
    ) -> Result<Self, JobSearchError> {
        let scrape = GoogleScrapeBackend::new(google_url)?;
        let api = SerpApiBackend::inline(serpapi_url, api_key)?;
        let key_source = ApiKeySource::secret_store(secrets_path);
        let secret_api = SerpApiBackend::with_key_source(serpapi_url, key_source)?;

        Ok(Self::new(default_backend)
            .with_backend(Arc::new(scrape))
            .with_backend(Arc::new(api))
            .with_backend(Arc::new(secret_api)))
    }

    /// Registers `backend` under its own kind, replacing any previous one.
    pub fn with_backend(mut self, backend: Arc<dyn JobBackend>) -> Self {
        self.backends.insert(backend.kind(), backend);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn default_backend(&self) -> BackendKind {
        self.default_backend
    }

    /// Kinds with a registered backend, in display order.
    pub fn available_backends(&self) -> Vec<BackendKind> {
        BackendKind::ALL
            .into_iter()
            .filter(|k| self.backends.contains_key(k))
            .collect()
    }

    pub fn has_summarizer(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Runs one search. An empty role short-circuits before any request.
    pub async fn search(
        &self,
        kind: Option<BackendKind>,
        role: &str,
        location: Option<&str>,
    ) -> SearchOutcome {
        let kind = kind.unwrap_or(self.default_backend);

        let query = match JobQuery::new(role, location) {
            Ok(query) => query,
            Err(e) => return SearchOutcome::failed(kind, None, &e),
        };

        let Some(backend) = self.backends.get(&kind) else {
            let err = JobSearchError::request_failed(kind, "backend not configured");
            warn!(backend = %kind, "Search requested on unconfigured backend");
            return SearchOutcome::failed(kind, Some(query), &err);
        };

        match backend.fetch(&query).await {
            Ok(jobs) => {
                info!(backend = %kind, role = query.role(), count = jobs.len(), "Search complete");
                SearchOutcome {
                    backend: kind,
                    query: Some(query),
                    jobs,
                    error: None,
                }
            }
            Err(e) => {
                warn!(backend = %kind, error = %e, "Search failed");
                SearchOutcome::failed(kind, Some(query), &e)
            }
        }
    }

    /// Summarizes `text` with the configured model.
    ///
    /// # Errors
    /// - `JobSearchError::MissingText` - blank input
    /// - `JobSearchError::SummarizeFailed` - no summarizer configured or the model call failed
    pub async fn summarize(&self, text: &str) -> Result<String, JobSearchError> {
        if text.trim().is_empty() {
            return Err(JobSearchError::MissingText);
        }
        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or_else(|| JobSearchError::SummarizeFailed {
                reason: "no summarizer configured".to_string(),
            })?;

        summarizer.summarize(text).await.inspect_err(|e| {
            warn!(error = %e, "Summarization failed");
        })
    }
}
