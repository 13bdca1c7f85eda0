//! Crawler coordinator - entry point of a crawl
//!
//! The coordinator owns the visited registry for the duration of one crawl:
//! - starts a fresh registry
//! - runs the root crawl task with the full depth budget
//! - waits for the whole fan-out below it to finish
//! - shuts the registry down and hands back the merged report

use crate::config::{canonical_seed, Config};
use crate::crawler::registry::VisitedRegistry;
use crate::crawler::report::CrawlReport;
use crate::crawler::task::CrawlTask;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Runs crawls against one fetcher
///
/// Each call to [`Coordinator::crawl`] is independent: it gets its own visited
/// registry, so an address fetched by one crawl is fetched again by the next.
#[derive(Clone)]
pub struct Coordinator {
    fetcher: Arc<dyn Fetcher>,
    fetch_limit: Option<usize>,
}

impl Coordinator {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            fetch_limit: None,
        }
    }

    /// Caps how many fetches may run at the same time
    ///
    /// Only the calls into the fetcher wait for a slot. Tasks are still spawned
    /// for every link as soon as it is discovered, and claiming is unaffected.
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = Some(limit.max(1));
        self
    }

    /// Crawls from `seed`, fetching pages up to `max_depth` levels deep
    ///
    /// The seed is level one, so `max_depth == 0` fetches nothing. Returns only
    /// once every task of the crawl has finished; fetch failures are part of the
    /// report, never an error.
    ///
    /// # Panics
    ///
    /// Panics if a crawl invariant is broken (an address fetched twice, a child
    /// task lost, or the registry stopping early). These are bugs, not input
    /// problems.
    pub async fn crawl(&self, seed: &str, max_depth: u32) -> CrawlReport {
        tracing::info!("Starting crawl of {} (max depth {})", seed, max_depth);
        let start_time = Instant::now();

        let (registry, handle) = VisitedRegistry::start();
        let limit = self.fetch_limit.map(|n| Arc::new(Semaphore::new(n)));

        // The root task consumes the only handle; every clone is dropped by the
        // time its subtree has been joined
        let root = CrawlTask::new(self.fetcher.clone(), handle, limit);
        let report = root.run(seed.to_string(), max_depth).await;

        let claimed = match registry.shutdown().await {
            Ok(claimed) => claimed,
            Err(e) => panic!("crawl invariant violated: {}", e),
        };
        assert_eq!(
            claimed,
            report.len(),
            "crawl invariant violated: {} addresses claimed but {} reported",
            claimed,
            report.len()
        );

        tracing::info!(
            "Crawl completed: {} pages fetched ({} failed) in {:?}",
            report.len(),
            report.len() - report.success_count(),
            start_time.elapsed()
        );

        report
    }
}

/// Crawls `seed` to `max_depth` levels with a fresh coordinator
///
/// # Example
///
/// ```
/// use fan_crawl::{crawl, StaticFetcher};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let fetcher = Arc::new(StaticFetcher::new().page("a", "A", ["b"]).page("b", "B", ["a"]));
/// let report = crawl("a", 3, fetcher).await;
/// assert_eq!(report.len(), 2);
/// # }
/// ```
pub async fn crawl(seed: &str, max_depth: u32, fetcher: Arc<dyn Fetcher>) -> CrawlReport {
    Coordinator::new(fetcher).crawl(seed, max_depth).await
}

/// Blocking form of [`crawl`] for callers outside an async runtime
///
/// Builds a multi-threaded tokio runtime for the duration of the crawl. Must not
/// be called from within a runtime.
pub fn crawl_blocking(
    seed: &str,
    max_depth: u32,
    fetcher: Arc<dyn Fetcher>,
) -> Result<CrawlReport> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(crawl(seed, max_depth, fetcher)))
}

/// Runs the crawl described by a configuration
///
/// Builds the HTTP fetcher from the user agent and fetcher sections and applies
/// the configured fetch limit. The seed is crawled in canonical URL form, the
/// same form discovered links take.
///
/// # Example
///
/// ```no_run
/// use fan_crawl::config::load_config;
/// use fan_crawl::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} pages", report.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport> {
    let seed = canonical_seed(&config.crawler.seed)?;
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.fetcher)?;

    let mut coordinator = Coordinator::new(Arc::new(fetcher));
    if let Some(limit) = config.crawler.max_concurrent_fetches {
        coordinator = coordinator.with_fetch_limit(limit as usize);
    }

    Ok(coordinator.crawl(&seed, config.crawler.max_depth).await)
}
