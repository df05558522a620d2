//! Precache: a sitemap-driven cache warmer
//!
//! This crate discovers every URL listed in a site's sitemap, requests each one
//! under a bounded concurrency ceiling with paced, jittered starts, and reports
//! how the cache layer in front of the site answered.

pub mod analysis;
pub mod config;
pub mod output;
pub mod sitemap;
pub mod warmer;

use thiserror::Error;

/// Main error type for precache operations
///
/// Only document-level failures surface here. Failures of individual page
/// probes are carried inside [`warmer::RequestOutcome`] instead.
#[derive(Debug, Error)]
pub enum PrecacheError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch sitemap {url}: {message}")]
    DocumentFetch { url: String, message: String },

    #[error("Failed to fetch sitemap {url}: HTTP status {status}")]
    DocumentStatus { url: String, status: u16 },

    #[error("No URLs could be extracted from sitemap {url}")]
    EmptyExtraction { url: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid sitemap URL: {0}")]
    InvalidUrl(String),

    #[error("A sitemap URL is required (--sitemap or `sitemap` in the config file)")]
    MissingSitemap,
}

/// Result type alias for precache operations
pub type Result<T> = std::result::Result<T, PrecacheError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analysis::{aggregate, classify, CacheStatus, ClassificationCounts};
pub use config::RunConfig;
pub use output::{ConsoleReporter, Level, MemoryReporter, Reporter};
pub use sitemap::{extract, extract_targets, Extraction, HostRewriter};
pub use warmer::{
    dispatch, warm, Fetcher, HttpFetcher, ProbeRequest, ProbeResponse, RequestError, RequestOutcome,
    RunSummary, Warmer,
};
