//! In-memory fetcher serving canned pages
//!
//! Used by the `--demo` mode and throughout the tests. Every call is counted so
//! callers can check how often each address was fetched.

use crate::fetcher::{FetchedPage, Fetcher};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Computes an artificial latency for a fetch of the given address
pub type DelayFn = Arc<dyn Fn(&str) -> Duration + Send + Sync>;

/// [`Fetcher`] that answers from a fixed table of pages
///
/// Addresses missing from the table fail with [`FetchError::UnknownAddress`].
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, Result<FetchedPage, FetchError>>,
    delay: Option<DelayFn>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page with its content and outgoing links
    pub fn page<I, S>(mut self, address: &str, content: &str, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let page = FetchedPage {
            content: content.to_string(),
            links: links.into_iter().map(Into::into).collect(),
        };
        self.pages.insert(address.to_string(), Ok(page));
        self
    }

    /// Makes fetches of `address` fail with `error`
    pub fn failing(mut self, address: &str, error: FetchError) -> Self {
        self.pages.insert(address.to_string(), Err(error));
        self
    }

    /// Delays every fetch by the duration `delay` computes for its address
    pub fn with_delay(mut self, delay: DelayFn) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The small documentation site used by `--demo`
    pub fn demo_site() -> Self {
        Self::new()
            .page(
                "https://golang.org/",
                "The Go Programming Language",
                ["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .page(
                "https://golang.org/pkg/",
                "Packages",
                [
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
            .page(
                "https://golang.org/pkg/os/",
                "Package os",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    /// Seed address of [`StaticFetcher::demo_site`]
    pub const DEMO_SEED: &str = "https://golang.org/";

    /// Number of times `address` has been fetched
    pub fn calls_for(&self, address: &str) -> usize {
        self.lock_calls().get(address).copied().unwrap_or(0)
    }

    /// Total number of fetches across all addresses
    pub fn total_calls(&self) -> usize {
        self.lock_calls().values().sum()
    }

    /// Highest number of fetches that were ever running at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_calls(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError> {
        *self.lock_calls().entry(address.to_string()).or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(address)).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.pages.get(address) {
            Some(result) => result.clone(),
            None => Err(FetchError::UnknownAddress {
                address: address.to_string(),
            }),
        }
    }
}
