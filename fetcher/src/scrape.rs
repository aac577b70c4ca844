//! Google news-results scraper.
//!
//! Depends on Google's generated class names, which change without notice.
//! A stale marker yields an empty result list rather than an error.

use crate::backend::JobBackend;
use async_trait::async_trait;
use common::{BackendKind, JobPosting, JobQuery, JobSearchError};
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

pub const GOOGLE_BASE_URL: &str = "https://www.google.com";

/// Desktop browser user-agent; Google serves the marker layout to it.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Class signature of a result title node.
const RESULT_TITLE_SELECTOR: &str = "div.BNeawe.vvjwJb.AP7Wnd";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

/// Scrapes job-related news results from the Google HTML results page.
#[derive(Debug, Clone)]
pub struct GoogleScrapeBackend {
    client: Client,
    base_url: Url,
}

impl GoogleScrapeBackend {
    /// Creates a scraper against `base_url` (normally [`GOOGLE_BASE_URL`]).
    ///
    /// # Errors
    /// - `JobSearchError::RequestFailed` - the base URL is invalid or the client cannot be built
    pub fn new(base_url: &str) -> Result<Self, JobSearchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| JobSearchError::request_failed(BackendKind::Scrape, e))?;

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| JobSearchError::request_failed(BackendKind::Scrape, e))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl JobBackend for GoogleScrapeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Scrape
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobSearchError> {
        let url = query.scrape_url(&self.base_url);
        info!(role = query.role(), "Fetching Google results");
        debug!(%url, "scrape request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| JobSearchError::request_failed(BackendKind::Scrape, e))?;

        let html = response
            .text()
            .await
            .map_err(|e| JobSearchError::request_failed(BackendKind::Scrape, e))?;

        let jobs = parse_results(&html, &self.base_url);
        if jobs.is_empty() {
            warn!(
                bytes = html.len(),
                "No result markers matched; the page layout may have changed"
            );
        }
        info!(count = jobs.len(), "Scraped job postings");
        Ok(jobs)
    }
}

/// Extracts title/link pairs from a results page.
///
/// `origin` resolves relative hrefs. Nodes without an enclosing anchor keep
/// their title and get no link.
pub fn parse_results(html: &str, origin: &Url) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(RESULT_TITLE_SELECTOR) else {
        return Vec::new();
    };

    let jobs = document
        .select(&selector)
        .map(|node| {
            let title = clean_text(&node.text().collect::<String>());
            let link = enclosing_href(node).and_then(|href| resolve_link(href, origin));
            JobPosting::new(title).with_link(link)
        })
        .collect();
    jobs
}

fn enclosing_href(node: ElementRef<'_>) -> Option<&str> {
    node.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
}

/// Makes `href` absolute and unwraps Google's `/url?q=<target>` redirects.
///
/// Only http(s) links are returned. A redirect target that is not http(s)
/// after resolving against `origin` falls back to the redirect URL itself.
fn resolve_link(href: &str, origin: &Url) -> Option<String> {
    let url = origin.join(href).ok().filter(is_web_url)?;

    if url.path() == "/url" {
        let target = url
            .query_pairs()
            .find(|(k, _)| k == "q" || k == "url")
            .and_then(|(_, v)| origin.join(&v).ok())
            .filter(is_web_url);
        if let Some(target) = target {
            return Some(target.to_string());
        }
        debug!(%url, "Redirect target is not a web link");
    }
    Some(url.to_string())
}

fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a href="/url?q=https://careers.example.com/tpm&amp;sa=U">
              <div class="BNeawe vvjwJb AP7Wnd">Senior   TPM
                 wanted</div>
            </a>
          </div>
          <div class="result">
            <a href="https://news.example.org/jobs/42">
              <span><div class="BNeawe vvjwJb AP7Wnd">Hiring TPMs in Berlin</div></span>
            </a>
          </div>
          <div class="BNeawe vvjwJb AP7Wnd">Orphan headline</div>
          <div class="BNeawe s3v9rd AP7Wnd">Snippet, not a title</div>
        </body></html>
    "#;

    fn google() -> Url {
        Url::parse(GOOGLE_BASE_URL).unwrap()
    }

    #[test]
    fn test_parse_results_extracts_titles_and_links() {
        let jobs = parse_results(RESULTS_PAGE, &google());

        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].title, "Senior TPM wanted");
        assert_eq!(jobs[0].link.as_deref(), Some("https://careers.example.com/tpm"));
        assert_eq!(jobs[1].title, "Hiring TPMs in Berlin");
        assert_eq!(jobs[1].link.as_deref(), Some("https://news.example.org/jobs/42"));
        assert_eq!(jobs[2].title, "Orphan headline");
        assert_eq!(jobs[2].link, None);
    }

    #[test]
    fn test_parse_results_without_markers_is_empty() {
        let html = "<html><body><div class=\"g\"><a href=\"/x\">Jobs</a></div></body></html>";
        assert!(parse_results(html, &google()).is_empty());
        assert!(parse_results("", &google()).is_empty());
    }

    #[test]
    fn test_relative_links_resolve_against_origin() {
        assert_eq!(
            resolve_link("/search?q=next", &google()).as_deref(),
            Some("https://www.google.com/search?q=next")
        );
    }

    #[test]
    fn test_redirect_targets_are_web_links_only() {
        assert_eq!(
            resolve_link("/url?q=/relative/page&sa=U", &google()).as_deref(),
            Some("https://www.google.com/relative/page")
        );
        let fallback = resolve_link("/url?q=javascript:alert(1)", &google()).unwrap();
        assert!(fallback.starts_with("https://www.google.com/url?"));
        assert_eq!(resolve_link("javascript:alert(1)", &google()), None);
        assert_eq!(resolve_link("mailto:jobs@example.com", &google()), None);
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_news_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "TPM jobs"))
            .and(query_param("tbm", "nws"))
            .and(|req: &Request| {
                req.headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    == Some(BROWSER_USER_AGENT)
            })
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let backend = GoogleScrapeBackend::new(&server.uri()).unwrap();
        let query = JobQuery::new("TPM", None).unwrap();
        let jobs = backend.fetch(&query).await.unwrap();

        assert_eq!(jobs.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let backend = GoogleScrapeBackend::new(&server.uri()).unwrap();
        let query = JobQuery::new("TPM", None).unwrap();
        let err = backend.fetch(&query).await.unwrap_err();

        assert!(matches!(
            err,
            JobSearchError::RequestFailed {
                backend: BackendKind::Scrape,
                ..
            }
        ));
    }
}
