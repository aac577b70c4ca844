//! API key resolution: inline configuration or the local secret store.

use common::JobSearchError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name the job API key is stored under.
pub const SERPAPI_KEY_NAME: &str = "SERPAPI_API_KEY";

/// Default location of the secret store file.
pub const DEFAULT_SECRETS_PATH: &str = "secrets.toml";

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("failed to read secrets file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse secrets file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Flat TOML table of named secrets.
///
/// An environment variable with the same name as a secret takes precedence
/// over the file, so deployments can inject keys without writing files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SecretStore {
    values: HashMap<String, toml::Value>,
}

impl SecretStore {
    /// Loads the store from `path`; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, SecretStoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "No secrets file, using empty store");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SecretStoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| SecretStoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Looks up a string secret in the file only.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_str())
    }

    /// Looks up a secret, preferring the environment over the file.
    pub fn resolve(&self, name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .or_else(|| self.get(name).map(str::to_string))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Where an API backend gets its key from.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// Key given directly in configuration.
    Inline(Option<String>),
    /// Key read from the secret store on every request.
    SecretStore { path: PathBuf, name: String },
}

impl ApiKeySource {
    pub fn secret_store(path: impl Into<PathBuf>) -> Self {
        ApiKeySource::SecretStore {
            path: path.into(),
            name: SERPAPI_KEY_NAME.to_string(),
        }
    }

    /// Name shown to the user when the key is missing.
    pub fn key_name(&self) -> &str {
        match self {
            ApiKeySource::Inline(_) => SERPAPI_KEY_NAME,
            ApiKeySource::SecretStore { name, .. } => name,
        }
    }

    /// Resolves the key.
    ///
    /// # Errors
    /// - `JobSearchError::MissingApiKey` - no non-empty key is available
    pub fn resolve(&self) -> Result<String, JobSearchError> {
        let key = match self {
            ApiKeySource::Inline(key) => key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            ApiKeySource::SecretStore { path, name } => match SecretStore::load(path) {
                Ok(store) => store.resolve(name),
                Err(e) => {
                    warn!(error = %e, "Secret store unreadable");
                    None
                }
            },
        };

        key.ok_or_else(|| JobSearchError::MissingApiKey {
            name: self.key_name().to_string(),
        })
    }
}
