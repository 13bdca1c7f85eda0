//! The recursive unit of crawl work
//!
//! A task claims its address, fetches it, spawns one child task per discovered
//! link with one less level of depth budget, then waits for every child and
//! folds their reports into its own.

use crate::crawler::registry::RegistryHandle;
use crate::crawler::report::{CrawlReport, FetchOutcome};
use crate::fetcher::{FetchedPage, Fetcher};
use crate::FetchError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Boxed so a task can spawn more of itself
pub(crate) type TaskFuture = Pin<Box<dyn Future<Output = CrawlReport> + Send + 'static>>;

/// Everything a task needs, shared by all tasks of one crawl
#[derive(Clone)]
pub(crate) struct CrawlTask {
    fetcher: Arc<dyn Fetcher>,
    registry: RegistryHandle,
    fetch_limit: Option<Arc<Semaphore>>,
}

impl CrawlTask {
    pub(crate) fn new(
        fetcher: Arc<dyn Fetcher>,
        registry: RegistryHandle,
        fetch_limit: Option<Arc<Semaphore>>,
    ) -> Self {
        Self {
            fetcher,
            registry,
            fetch_limit,
        }
    }

    /// Crawls `address` and everything below it within `depth` levels
    pub(crate) fn run(self, address: String, depth: u32) -> TaskFuture {
        Box::pin(self.explore(address, depth))
    }

    async fn explore(self, address: String, depth: u32) -> CrawlReport {
        // Out of budget: leave the address unclaimed so a shorter path can still take it
        if depth == 0 {
            tracing::trace!("Depth budget exhausted at {}", address);
            return CrawlReport::new();
        }

        if !self.claim(&address).await {
            tracing::trace!("{} already claimed", address);
            return CrawlReport::new();
        }

        let outcome = FetchOutcome::from(self.fetch(&address).await);
        let links = match &outcome {
            FetchOutcome::Success { links, .. } => {
                tracing::debug!(
                    "Fetched {} ({} links, depth budget {})",
                    address,
                    links.len(),
                    depth
                );
                links.clone()
            }
            FetchOutcome::Failure(error) => {
                tracing::warn!("Fetch failed: {}", error);
                Vec::new()
            }
        };

        let mut report = CrawlReport::single(address.as_str(), outcome);

        let mut children = JoinSet::new();
        for link in links {
            children.spawn(self.clone().run(link, depth - 1));
        }
        let spawned = children.len();

        let mut joined = 0;
        while let Some(result) = children.join_next().await {
            joined += 1;
            match result {
                Ok(child) => report.merge(child),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => panic!("crawl task below {} ended without a report: {}", address, e),
            }
        }
        assert_eq!(
            joined, spawned,
            "crawl invariant violated: {} joined {} of {} children",
            address, joined, spawned
        );

        report
    }

    async fn claim(&self, address: &str) -> bool {
        match self.registry.claim_if_new(address).await {
            Ok(claimed) => claimed,
            Err(e) => panic!("crawl invariant violated while claiming {}: {}", address, e),
        }
    }

    /// Calls the fetcher, holding a fetch permit for the duration if limited
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError> {
        let _permit = match &self.fetch_limit {
            // The semaphore is never closed, so acquire cannot fail
            Some(limit) => limit.acquire().await.ok(),
            None => None,
        };
        self.fetcher.fetch(address).await
    }
}
