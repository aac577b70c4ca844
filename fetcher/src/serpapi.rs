//! Google Jobs results through SerpApi.

use crate::backend::JobBackend;
use crate::credentials::ApiKeySource;
use async_trait::async_trait;
use common::{BackendKind, JobPosting, JobQuery, JobSearchError};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

pub const SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// Key holding the list of job objects in a response.
const JOBS_KEY: &str = "jobs_results";

/// SerpApi reports "no results" as an error string rather than an empty list.
const NO_RESULTS_ERROR: &str = "hasn't returned any results";

/// Reads a string field, treating any other JSON type as absent.
fn str_field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Converts one entry of `jobs_results`, field by field.
///
/// A field with an unexpected type falls back to its placeholder without
/// affecting the other fields of the record.
fn record_to_posting(record: &Value) -> JobPosting {
    let apply_link = record
        .get("apply_options")
        .and_then(Value::as_array)
        .and_then(|options| options.iter().find_map(|o| str_field(o, "link")));
    let link = str_field(record, "link")
        .or(apply_link)
        .or_else(|| str_field(record, "share_link"));

    if !record.is_object() {
        warn!("Job record is not an object, using placeholders");
    }

    JobPosting::new(str_field(record, "title").unwrap_or_default())
        .with_company(str_field(record, "company_name"))
        .with_location(str_field(record, "location"))
        .with_link(link)
}

/// Queries the hosted Google Jobs API.
///
/// The same client serves the inline-key and secret-store variants; they
/// differ only in [`ApiKeySource`] and whether raw records are kept.
#[derive(Debug, Clone)]
pub struct SerpApiBackend {
    client: Client,
    base_url: Url,
    key_source: ApiKeySource,
    kind: BackendKind,
    keep_raw: bool,
}

impl SerpApiBackend {
    /// Backend with a key taken from configuration.
    pub fn inline(base_url: &str, api_key: Option<String>) -> Result<Self, JobSearchError> {
        Self::build(base_url, ApiKeySource::Inline(api_key), BackendKind::Api, false)
    }

    /// Backend reading its key from the secret store, keeping raw records for display.
    pub fn with_key_source(
        base_url: &str,
        key_source: ApiKeySource,
    ) -> Result<Self, JobSearchError> {
        Self::build(base_url, key_source, BackendKind::SecretApi, true)
    }

    fn build(
        base_url: &str,
        key_source: ApiKeySource,
        kind: BackendKind,
        keep_raw: bool,
    ) -> Result<Self, JobSearchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| JobSearchError::request_failed(kind, e))?;
        let client = Client::builder()
            .build()
            .map_err(|e| JobSearchError::request_failed(kind, e))?;

        Ok(Self {
            client,
            base_url,
            key_source,
            kind,
            keep_raw,
        })
    }

    fn endpoint(&self) -> Result<Url, JobSearchError> {
        self.base_url
            .join("search.json")
            .map_err(|e| JobSearchError::request_failed(self.kind, e))
    }
}

#[async_trait]
impl JobBackend for SerpApiBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobSearchError> {
        let api_key = self.key_source.resolve()?;
        let endpoint = self.endpoint()?;
        let params = query.api_params();

        info!(
            backend = %self.kind,
            role = query.role(),
            location = query.location(),
            "Querying job API"
        );
        debug!(%endpoint, ?params, "job API request (api_key redacted)");

        let response = self
            .client
            .get(endpoint)
            .query(&params)
            .query(&[("api_key", api_key.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| JobSearchError::request_failed(self.kind, e))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| JobSearchError::request_failed(self.kind, e))?;

        let jobs = parse_jobs_response(&body, self.keep_raw)
            .map_err(|reason| JobSearchError::request_failed(self.kind, reason))?;

        info!(backend = %self.kind, count = jobs.len(), "Parsed job postings");
        Ok(jobs)
    }
}

/// Reads `jobs_results` into postings, in response order.
///
/// A missing or non-array `jobs_results` is an empty list. An `error` field
/// is a failure, except SerpApi's "no results" error which is an empty list.
pub fn parse_jobs_response(body: &Value, keep_raw: bool) -> Result<Vec<JobPosting>, String> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        if error.contains(NO_RESULTS_ERROR) {
            return Ok(Vec::new());
        }
        return Err(error.to_string());
    }

    let Some(records) = body.get(JOBS_KEY).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let jobs = records
        .iter()
        .map(|record| {
            let posting = record_to_posting(record);
            if keep_raw {
                posting.with_raw(record.clone())
            } else {
                posting
            }
        })
        .collect();

    Ok(jobs)
}
