//! Query construction: validated user input to backend requests.

use crate::error::JobSearchError;
use serde::Serialize;
use url::Url;

/// Location used when the user leaves the field empty.
pub const DEFAULT_LOCATION: &str = "Worldwide";

/// A validated role + location pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobQuery {
    role: String,
    location: String,
    #[serde(skip)]
    explicit_location: bool,
}

impl JobQuery {
    /// Validates raw form input.
    ///
    /// # Errors
    /// - `JobSearchError::MissingRole` - role is empty after trimming
    pub fn new(role: &str, location: Option<&str>) -> Result<Self, JobSearchError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(JobSearchError::MissingRole);
        }

        let given = location.map(str::trim).filter(|l| !l.is_empty());

        Ok(Self {
            role: role.to_string(),
            location: given.unwrap_or(DEFAULT_LOCATION).to_string(),
            explicit_location: given.is_some(),
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Location as displayed and sent, "Worldwide" when none was given.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Free-text query for the search engine results page.
    pub fn search_text(&self) -> String {
        if self.explicit_location {
            format!("{} jobs in {}", self.role, self.location)
        } else {
            format!("{} jobs", self.role)
        }
    }

    /// Builds the news-results URL against the search engine `base`.
    pub fn scrape_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_path("/search");
        url.query_pairs_mut()
            .clear()
            .append_pair("q", &self.search_text())
            .append_pair("tbm", "nws");
        url
    }

    /// Query parameters for the Google Jobs API, without credentials.
    pub fn api_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("engine", "google_jobs".to_string()),
            ("q", self.role.clone()),
            ("location", self.location.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> Url {
        Url::parse("https://www.google.com").unwrap()
    }

    #[test]
    fn test_empty_role_is_rejected() {
        assert!(matches!(
            JobQuery::new("", Some("Berlin")),
            Err(JobSearchError::MissingRole)
        ));
        assert!(matches!(
            JobQuery::new("   ", None),
            Err(JobSearchError::MissingRole)
        ));
    }

    #[test]
    fn test_empty_location_defaults_to_worldwide() {
        let query = JobQuery::new("Data Scientist", Some("")).unwrap();
        assert_eq!(query.location(), "Worldwide");

        let params = query.api_params();
        assert!(params.contains(&("location", "Worldwide".to_string())));
        assert!(params.contains(&("q", "Data Scientist".to_string())));
    }

    #[test]
    fn test_scrape_url_matches_news_search() {
        let query = JobQuery::new("TPM", None).unwrap();
        assert_eq!(
            query.scrape_url(&google()).as_str(),
            "https://www.google.com/search?q=TPM+jobs&tbm=nws"
        );
    }

    #[test]
    fn test_scrape_url_includes_explicit_location() {
        let query = JobQuery::new(" Rust Developer ", Some("Berlin")).unwrap();
        let url = query.scrape_url(&google());

        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some("Rust Developer jobs in Berlin"));
    }
}
