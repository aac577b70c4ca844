//! Job Search Web Server
//!
//! Serves the search form, runs one backend query per submission and renders
//! the postings; also exposes the summarizer and a JSON search API.

mod config;
mod pages;
mod routes;

use anyhow::{Context, Result};
use config::ServerConfig;
use fetcher::logging::init_logging;
use fetcher::{HuggingFaceSummarizer, JobSearchService};
use routes::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Builds the service with every backend the configuration supports.
fn build_service(config: &ServerConfig) -> Result<JobSearchService> {
    let service = JobSearchService::with_standard_backends(
        config.default_backend,
        &config.google_url,
        &config.serpapi_url,
        config.api_key.clone(),
        config.secrets_path.clone(),
    )
    .context("Invalid backend URL in configuration")?;
    let summarizer =
        HuggingFaceSummarizer::new(config.summarizer_url.clone(), config.hf_token.clone())
            .context("Failed to create summarizer")?;

    Ok(service.with_summarizer(Arc::new(summarizer)))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");
    info!("Starting Job Search Server");

    let config_path = std::env::var_os("JOBSEARCH_CONFIG").map(PathBuf::from);
    let config = ServerConfig::load(config_path.as_deref())?;

    if config.api_key.is_none() {
        info!("No inline API key configured; the api backend will ask for one");
    }
    info!(
        default_backend = %config.default_backend,
        secrets = %config.secrets_path.display(),
        "Configuration loaded"
    );

    let service = build_service(&config)?;
    let app = routes::router(Arc::new(AppState { service }));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Server running at http://{}", config.bind);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
