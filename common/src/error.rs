//! Error taxonomy for a single search or summarize action.

use crate::BackendKind;
use thiserror::Error;

/// Everything that can end a user action early.
///
/// `Display` carries the internal detail for logs; [`JobSearchError::user_message`]
/// is the text shown to the user.
#[derive(Debug, Error)]
pub enum JobSearchError {
    /// The role input was empty.
    #[error("job role is required")]
    MissingRole,

    /// No API key could be found for an API backend.
    #[error("API key '{name}' is not configured")]
    MissingApiKey {
        /// Name the key is looked up under
        name: String,
    },

    /// The outbound request failed (network, non-2xx, undecodable body).
    #[error("{backend} request failed: {reason}")]
    RequestFailed {
        /// Backend that issued the request
        backend: BackendKind,
        /// Underlying failure, for logs only
        reason: String,
    },

    /// The summarize action got no text.
    #[error("text to summarize is required")]
    MissingText,

    /// The summarization model call failed.
    #[error("summarization failed: {reason}")]
    SummarizeFailed {
        /// Underlying failure, for logs only
        reason: String,
    },
}

impl JobSearchError {
    pub fn request_failed(backend: BackendKind, reason: impl ToString) -> Self {
        JobSearchError::RequestFailed {
            backend,
            reason: reason.to_string(),
        }
    }

    /// Inline message displayed in the UI.
    pub fn user_message(&self) -> String {
        match self {
            JobSearchError::MissingRole => "Please enter a job role.".to_string(),
            JobSearchError::MissingApiKey { name } => {
                format!("API key not found. Please add {name} to your secrets.")
            }
            JobSearchError::RequestFailed {
                backend: BackendKind::Scrape,
                ..
            } => "Error fetching data from Google. Please try again later.".to_string(),
            JobSearchError::RequestFailed { .. } => {
                "Error fetching data from the job search API. Please try again later.".to_string()
            }
            JobSearchError::MissingText => "Please enter some text to summarize.".to_string(),
            JobSearchError::SummarizeFailed { .. } => {
                "Error generating summary. Please try again later.".to_string()
            }
        }
    }
}
