//! Server configuration: optional TOML file, then environment overrides.

use anyhow::{Context, Result};
use common::BackendKind;
use fetcher::credentials::DEFAULT_SECRETS_PATH;
use fetcher::scrape::GOOGLE_BASE_URL;
use fetcher::serpapi::SERPAPI_BASE_URL;
use fetcher::summarize::DEFAULT_SUMMARIZER_URL;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Config file read from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "jobsearch.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web UI listens on
    pub bind: SocketAddr,
    /// Backend used when the form does not pick one
    pub default_backend: BackendKind,
    pub google_url: String,
    pub serpapi_url: String,
    /// Inline key for the `api` backend
    pub api_key: Option<String>,
    /// Secret store for the `secret-api` backend
    pub secrets_path: PathBuf,
    pub summarizer_url: String,
    pub hf_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_backend: BackendKind::Api,
            google_url: GOOGLE_BASE_URL.to_string(),
            serpapi_url: SERPAPI_BASE_URL.to_string(),
            api_key: None,
            secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            summarizer_url: DEFAULT_SUMMARIZER_URL.to_string(),
            hf_token: None,
        }
    }
}

impl ServerConfig {
    /// Loads `path` (required to exist) or `jobsearch.toml` if present,
    /// then applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides fields from variables looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("JOBSEARCH_BIND") {
            self.bind = bind
                .parse()
                .with_context(|| format!("Invalid JOBSEARCH_BIND '{bind}'"))?;
        }
        if let Some(backend) = lookup("JOBSEARCH_BACKEND") {
            self.default_backend = backend
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid JOBSEARCH_BACKEND")?;
        }
        if let Some(url) = lookup("GOOGLE_BASE_URL") {
            self.google_url = url;
        }
        if let Some(url) = lookup("SERPAPI_BASE_URL") {
            self.serpapi_url = url;
        }
        if let Some(key) = lookup("SERPAPI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(path) = lookup("JOBSEARCH_SECRETS") {
            self.secrets_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("HF_SUMMARIZER_URL") {
            self.summarizer_url = url;
        }
        if let Some(token) = lookup("HF_API_TOKEN") {
            self.hf_token = Some(token);
        }
        Ok(())
    }
}
