//! Fan-Crawl: a bounded-depth concurrent web crawler
//!
//! Given a seed address, a depth limit and a [`Fetcher`], this crate visits every
//! reachable page within budget exactly once, fanning out one task per discovered
//! link and joining the results into a single [`CrawlReport`].

pub mod config;
pub mod crawler;
pub mod fetcher;
pub mod output;

use thiserror::Error;

/// Main error type for Fan-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Why a single page could not be fetched
///
/// A fetch error is recorded as the outcome for its address and never aborts
/// the rest of the crawl.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("not found: {address}")]
    NotFound { address: String },

    #[error("HTTP {status} for {address}")]
    Http { address: String, status: u16 },

    #[error("request timeout for {address}")]
    Timeout { address: String },

    #[error("{address} is unreachable: {message}")]
    Unreachable { address: String, message: String },

    #[error("{address} is not HTML (content-type: {content_type})")]
    ContentMismatch {
        address: String,
        content_type: String,
    },

    #[error("failed to read body of {address}: {message}")]
    Body { address: String, message: String },

    #[error("unknown address: {address}")]
    UnknownAddress { address: String },
}

/// Result type alias for Fan-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, crawl_blocking, run_crawl, Coordinator, CrawlReport, FetchOutcome};
pub use fetcher::{FetchedPage, Fetcher, HttpFetcher, StaticFetcher};
