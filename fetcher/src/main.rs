//! Job search from the terminal.
//!
//! Runs one search (or one summary) and prints the result as markdown.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::BackendKind;
use common::render::{render_markdown, search_header_markdown};
use fetcher::credentials::DEFAULT_SECRETS_PATH;
use fetcher::logging::init_logging;
use fetcher::scrape::GOOGLE_BASE_URL;
use fetcher::serpapi::SERPAPI_BASE_URL;
use fetcher::summarize::DEFAULT_SUMMARIZER_URL;
use fetcher::{HuggingFaceSummarizer, JobSearchService};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "jobsearch", version, about = "Find job postings and summarize descriptions")]
struct Cli {
    /// Base URL of the Google Jobs API
    #[arg(long, env = "SERPAPI_BASE_URL", default_value = SERPAPI_BASE_URL, global = true)]
    serpapi_url: String,

    /// Inline key for the `api` backend
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Secrets file for the `secret-api` backend
    #[arg(long, env = "JOBSEARCH_SECRETS", default_value = DEFAULT_SECRETS_PATH, global = true)]
    secrets: PathBuf,

    /// Base URL of the search engine scraped by the `scrape` backend
    #[arg(long, env = "GOOGLE_BASE_URL", default_value = GOOGLE_BASE_URL, global = true)]
    google_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for postings matching a role
    Search {
        /// Job role, e.g. "TPM" or "Data Scientist"
        #[arg(long, short)]
        role: String,

        /// Location; "Worldwide" when omitted
        #[arg(long, short)]
        location: Option<String>,

        /// scrape, api or secret-api
        #[arg(long, short, env = "JOBSEARCH_BACKEND", default_value = "api")]
        backend: BackendKind,

        /// Print the raw API record under each posting
        #[arg(long)]
        raw: bool,
    },
    /// Summarize a job description
    Summarize {
        /// Text to summarize
        text: String,

        /// Summarization model endpoint
        #[arg(long, env = "HF_SUMMARIZER_URL", default_value = DEFAULT_SUMMARIZER_URL)]
        model_url: String,

        /// Hugging Face API token
        #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
        hf_token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging("warn");
    let cli = Cli::parse();

    let service = JobSearchService::with_standard_backends(
        BackendKind::Api,
        &cli.google_url,
        &cli.serpapi_url,
        cli.api_key.clone(),
        cli.secrets.clone(),
    )
    .context("Failed to create search backends")?;

    match cli.command {
        Command::Search {
            role,
            location,
            backend,
            raw,
        } => {
            let outcome = service
                .search(Some(backend), &role, location.as_deref())
                .await;

            if let Some(query) = &outcome.query {
                println!("🔍 {}\n", search_header_markdown(query));
            }
            if let Some(error) = &outcome.error {
                eprintln!("❌ {error}");
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", render_markdown(&outcome.jobs, raw));
        }
        Command::Summarize {
            text,
            model_url,
            hf_token,
        } => {
            let summarizer = HuggingFaceSummarizer::new(model_url, hf_token)
                .context("Failed to create summarizer")?;
            let service = service.with_summarizer(Arc::new(summarizer));

            match service.summarize(&text).await {
                Ok(summary) => println!("#### Summary:\n{summary}"),
                Err(e) => {
                    eprintln!("❌ {}", e.user_message());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
