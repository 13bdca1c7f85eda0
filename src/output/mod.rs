//! Output module for presenting crawl results
//!
//! This module handles:
//! - Deriving statistics from a crawl report
//! - Generating markdown summaries of a crawl

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics};
pub use summary::{CrawlSummary, OutputError, OutputResult};
