//! Router and request handlers.
//!
//! Every handler is a stateless function of its inputs plus the shared
//! service; one user action maps to one outbound call.

use crate::pages::{self, SearchFormState};
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use common::BackendKind;
use fetcher::JobSearchService;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub service: JobSearchService,
}

/// Query parameters for the landing page
#[derive(Debug, Deserialize, Default)]
pub struct IndexParams {
    nlp: Option<String>,
}

/// Query parameters for the search endpoints
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    role: Option<String>,
    location: Option<String>,
    backend: Option<String>,
    raw: Option<String>,
}

impl SearchParams {
    /// Blank means "use the default"; anything else must name a backend.
    fn backend(&self) -> Result<Option<BackendKind>, String> {
        match self.backend.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }

    /// HTML checkboxes send "on"; the JSON API also accepts "true"/"1".
    fn raw(&self) -> bool {
        matches!(self.raw.as_deref(), Some("on" | "true" | "1"))
    }
}

/// Form body for the summarize action
#[derive(Debug, Deserialize)]
pub struct SummarizeForm {
    #[serde(default)]
    text: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/search", get(search_handler))
        .route("/api/search", get(api_search_handler))
        .route("/summarize", post(summarize_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for GET /
async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    let service = &state.service;
    Html(pages::index_page(
        &service.available_backends(),
        service.default_backend(),
        params.nlp.is_some(),
    ))
}

/// Handler for GET /search?role=<role>&location=<location>&backend=<kind>
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let service = &state.service;
    let role = params.role.as_deref().unwrap_or_default();
    let location = params.location.as_deref().unwrap_or_default();

    let (backend, outcome) = match params.backend() {
        Ok(backend) => {
            info!(role, location, backend = ?backend, "Search submitted");
            (backend, service.search(backend, role, Some(location)).await)
        }
        Err(message) => (None, invalid_backend_outcome(service, message)),
    };

    let form = SearchFormState {
        role,
        location,
        backend,
        raw: params.raw(),
    };
    Html(pages::results_page(
        &form,
        &service.available_backends(),
        service.default_backend(),
        &outcome,
    ))
}

/// Handler for GET /api/search, same parameters as /search
async fn api_search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let backend = match params.backend() {
        Ok(backend) => backend,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    let mut outcome = state
        .service
        .search(
            backend,
            params.role.as_deref().unwrap_or_default(),
            params.location.as_deref(),
        )
        .await;

    if !params.raw() {
        outcome.jobs.iter_mut().for_each(|job| job.raw = None);
    }
    Json(outcome).into_response()
}

/// Handler for POST /summarize
async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SummarizeForm>,
) -> Html<String> {
    let result = state.service.summarize(&form.text).await;
    let page = match &result {
        Ok(summary) => pages::summary_page(&form.text, Ok(summary.as_str())),
        Err(e) => pages::summary_page(&form.text, Err(e.user_message().as_str())),
    };
    Html(page)
}

/// Handler for GET /health
async fn health_handler() -> &'static str {
    "ok"
}

fn invalid_backend_outcome(
    service: &JobSearchService,
    message: String,
) -> fetcher::SearchOutcome {
    fetcher::SearchOutcome {
        backend: service.default_backend(),
        query: None,
        jobs: Vec::new(),
        error: Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use fetcher::{HuggingFaceSummarizer, SerpApiBackend};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn jobs_body() -> Value {
        json!({
            "jobs_results": [
                {
                    "title": "Data Scientist",
                    "company_name": "Acme",
                    "location": "Remote",
                    "link": "https://acme.example/ds"
                },
                { "title": "ML Engineer" }
            ]
        })
    }

    async fn app_with_api(server: &MockServer) -> Router {
        let api = SerpApiBackend::inline(&server.uri(), Some("key".to_string())).unwrap();
        let summarizer =
            HuggingFaceSummarizer::new(format!("{}/models/t5-small", server.uri()), None).unwrap();
        let service = JobSearchService::new(BackendKind::Api)
            .with_backend(Arc::new(api))
            .with_summarizer(Arc::new(summarizer));
        router(Arc::new(AppState { service }))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_index_shows_form_and_optional_summarizer() {
        let server = MockServer::start().await;
        let app = app_with_api(&server).await;

        let page = body_text(app.clone().oneshot(get("/")).await.unwrap()).await;
        assert!(page.contains(r#"name="role""#));
        assert!(!page.contains(r#"action="/summarize""#));

        let page = body_text(app.oneshot(get("/?nlp=on")).await.unwrap()).await;
        assert!(page.contains(r#"action="/summarize""#));
    }

    #[tokio::test]
    async fn test_search_page_lists_each_posting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body()))
            .expect(1)
            .mount(&server)
            .await;
        let app = app_with_api(&server).await;

        let response = app
            .oneshot(get("/search?role=Data+Scientist&location="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert_eq!(page.matches(r#"<li class="job">"#).count(), 2);
        assert!(page.contains(
            "Searching for jobs related to: <strong>Data Scientist</strong> in Worldwide"
        ));
        assert!(page.contains("Company not specified"));
        assert!(page.contains("No link available"));
    }

    #[tokio::test]
    async fn test_empty_role_shows_error_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body()))
            .expect(0)
            .mount(&server)
            .await;
        let app = app_with_api(&server).await;

        let page = body_text(app.oneshot(get("/search?role=&location=Paris")).await.unwrap()).await;

        assert!(page.contains("Please enter a job role."));
        assert!(!page.contains(r#"<li class="job">"#));
    }

    #[tokio::test]
    async fn test_api_search_returns_json_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jobs_body()))
            .mount(&server)
            .await;
        let app = app_with_api(&server).await;

        let response = app.oneshot(get("/api/search?role=ML")).await.unwrap();
        let outcome: Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(outcome["backend"], "api");
        assert_eq!(outcome["query"]["location"], "Worldwide");
        assert_eq!(outcome["jobs"].as_array().unwrap().len(), 2);
        assert!(outcome["error"].is_null());
    }

    #[tokio::test]
    async fn test_api_search_rejects_unknown_backend() {
        let server = MockServer::start().await;
        let app = app_with_api(&server).await;

        let response = app.oneshot(get("/api/search?role=ML&backend=bing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_shows_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let app = app_with_api(&server).await;

        let page = body_text(app.oneshot(get("/search?role=SRE")).await.unwrap()).await;

        assert!(page.contains(
            "Error fetching data from the job search API. Please try again later."
        ));
        assert!(!page.contains(r#"<li class="job">"#));
    }

    #[tokio::test]
    async fn test_summarize_renders_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/t5-small"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "summary_text":
                        "the team needs a data scientist for forecasting and experiment design work"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let app = app_with_api(&server).await;

        let request = Request::builder()
            .method("POST")
            .uri("/summarize")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("text=We+need+a+data+scientist"))
            .unwrap();
        let page = body_text(app.oneshot(request).await.unwrap()).await;

        assert!(page.contains("Summary:"));
        assert!(page.contains("forecasting and experiment design"));
    }

    #[tokio::test]
    async fn test_summarize_blank_text_prompts_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let app = app_with_api(&server).await;

        let request = Request::builder()
            .method("POST")
            .uri("/summarize")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("text=+++"))
            .unwrap();
        let page = body_text(app.oneshot(request).await.unwrap()).await;

        assert!(page.contains("Please enter some text to summarize."));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let app = app_with_api(&server).await;

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(body_text(response).await, "ok");
    }
}
