//! Crawl summary data and output errors

use crate::crawler::CrawlReport;
use crate::output::stats::CrawlStatistics;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything needed to describe one finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub seed: String,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Hash of the config file, when the crawl was configured from one
    pub config_hash: Option<String>,
    pub statistics: CrawlStatistics,
    pub report: CrawlReport,
}

impl CrawlSummary {
    pub fn new(
        seed: impl Into<String>,
        max_depth: u32,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        report: CrawlReport,
    ) -> Self {
        Self {
            seed: seed.into(),
            max_depth,
            started_at,
            finished_at,
            config_hash: None,
            statistics: CrawlStatistics::from_report(&report),
            report,
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Wall-clock duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
