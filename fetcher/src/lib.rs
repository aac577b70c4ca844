//! Job sources and the search pipeline.
//!
//! - [`GoogleScrapeBackend`]: Google news results page, parsed by class markers
//! - [`SerpApiBackend`]: Google Jobs API, key inline or from the secret store
//! - [`HuggingFaceSummarizer`]: hosted summarization model
//! - [`JobSearchService`]: validation + one fetch per action, failures as messages

pub mod backend;
pub mod credentials;
pub mod logging;
pub mod scrape;
pub mod serpapi;
pub mod service;
pub mod summarize;

pub use backend::JobBackend;
pub use credentials::{ApiKeySource, SecretStore};
pub use scrape::GoogleScrapeBackend;
pub use serpapi::SerpApiBackend;
pub use service::{JobSearchService, SearchOutcome};
pub use summarize::{HuggingFaceSummarizer, Summarizer};
