//! The seam every job source implements.

use async_trait::async_trait;
use common::{BackendKind, JobPosting, JobQuery, JobSearchError};

/// A source of job postings answering one query with one outbound request.
///
/// Implementations: [`crate::GoogleScrapeBackend`] (HTML results page) and
/// [`crate::SerpApiBackend`] (hosted job API, inline or secret-store key).
#[async_trait]
pub trait JobBackend: Send + Sync + std::fmt::Debug {
    /// Which variant this backend answers for.
    fn kind(&self) -> BackendKind;

    /// Fetch and parse postings for `query`.
    ///
    /// # Errors
    /// - `JobSearchError::MissingApiKey` - credential could not be resolved, no request made
    /// - `JobSearchError::RequestFailed` - network error, non-2xx status or undecodable body
    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobSearchError>;
}
