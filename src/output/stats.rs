//! Statistics derived from a crawl report

use crate::crawler::CrawlReport;
use std::collections::HashSet;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of addresses fetched
    pub pages_fetched: usize,

    /// Fetches that succeeded
    pub pages_succeeded: usize,

    /// Fetches that failed
    pub pages_failed: usize,

    /// Links found on successful pages, counting repeats
    pub links_discovered: usize,

    /// Distinct link targets found on successful pages
    pub unique_links: usize,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut links_discovered = 0;
        let mut targets = HashSet::new();

        for (_, outcome) in report {
            links_discovered += outcome.links().len();
            targets.extend(outcome.links().iter().map(String::as_str));
        }

        let pages_succeeded = report.success_count();

        Self {
            pages_fetched: report.len(),
            pages_succeeded,
            pages_failed: report.len() - pages_succeeded,
            links_discovered,
            unique_links: targets.len(),
        }
    }

    /// Percentage of fetched pages that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            0.0
        } else {
            (self.pages_succeeded as f64 / self.pages_fetched as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Succeeded: {}", stats.pages_succeeded);
    println!("  Failed: {}", stats.pages_failed);
    println!(
        "  Links discovered: {} ({} distinct)",
        stats.links_discovered, stats.unique_links
    );
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages)",
        stats.success_rate(),
        stats.pages_succeeded,
        stats.pages_fetched
    );
}
