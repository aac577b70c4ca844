//! Shared types for the job search workspace.
//!
//! Holds the `JobPosting` record every backend produces, the query builder,
//! the user-facing error taxonomy and the list renderer.

pub mod error;
pub mod query;
pub mod render;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use error::JobSearchError;
pub use query::{DEFAULT_LOCATION, JobQuery};

/// Shown when a posting carries no title.
pub const TITLE_PLACEHOLDER: &str = "N/A";
/// Shown when a posting carries no company.
pub const COMPANY_PLACEHOLDER: &str = "Company not specified";
/// Shown when a posting carries no location.
pub const LOCATION_PLACEHOLDER: &str = "Location not specified";
/// Shown when a posting carries no link.
pub const LINK_PLACEHOLDER: &str = "No link available";

/// A single job record extracted from one backend response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JobPosting {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub link: Option<String>,
    /// Untouched API record, kept only when raw display is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl JobPosting {
    /// Creates a posting with only a title; blank titles become the placeholder.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            TITLE_PLACEHOLDER.to_string()
        } else {
            title
        };

        Self {
            title,
            company: None,
            location: None,
            link: None,
            raw: None,
        }
    }

    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = non_blank(company);
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = non_blank(location);
        self
    }

    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = non_blank(link);
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn company_or_placeholder(&self) -> &str {
        self.company.as_deref().unwrap_or(COMPANY_PLACEHOLDER)
    }

    pub fn location_or_placeholder(&self) -> &str {
        self.location.as_deref().unwrap_or(LOCATION_PLACEHOLDER)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Which source a search is answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Search engine HTML results page, parsed by markers.
    Scrape,
    /// Hosted job API with an inline key.
    #[default]
    Api,
    /// Hosted job API with the key read from the secret store.
    SecretApi,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::Scrape,
        BackendKind::Api,
        BackendKind::SecretApi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Scrape => "scrape",
            BackendKind::Api => "api",
            BackendKind::SecretApi => "secret-api",
        }
    }

    /// Human label used in the web form.
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Scrape => "Google search (scrape)",
            BackendKind::Api => "Google Jobs API",
            BackendKind::SecretApi => "Google Jobs API (secret store)",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scrape" | "html" => Ok(BackendKind::Scrape),
            "api" => Ok(BackendKind::Api),
            "secret-api" | "secret_api" | "secret" => Ok(BackendKind::SecretApi),
            other => Err(format!(
                "unknown backend '{other}' (expected scrape, api or secret-api)"
            )),
        }
    }
}
