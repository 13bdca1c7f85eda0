//! Crawl results: one outcome per fetched address

use crate::fetcher::FetchedPage;
use crate::FetchError;
use std::collections::btree_map::{self, BTreeMap, Entry};

/// What happened when an address was fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was retrieved
    Success { content: String, links: Vec<String> },

    /// The fetcher failed; nothing below this address was explored
    Failure(FetchError),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Links discovered on the page (empty for failures)
    pub fn links(&self) -> &[String] {
        match self {
            Self::Success { links, .. } => links,
            Self::Failure(_) => &[],
        }
    }
}

impl From<Result<FetchedPage, FetchError>> for FetchOutcome {
    fn from(result: Result<FetchedPage, FetchError>) -> Self {
        match result {
            Ok(page) => Self::Success {
                content: page.content,
                links: page.links,
            },
            Err(error) => Self::Failure(error),
        }
    }
}

/// Every address fetched during one crawl, mapped to its outcome
///
/// Keys are unique: each address is fetched by exactly one task, so reports
/// coming from different branches of the crawl never overlap. Iteration is in
/// address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pages: BTreeMap<String, FetchOutcome>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report holding a single entry
    pub fn single(address: impl Into<String>, outcome: FetchOutcome) -> Self {
        let mut pages = BTreeMap::new();
        pages.insert(address.into(), outcome);
        Self { pages }
    }

    /// Moves every entry of `other` into this report
    ///
    /// # Panics
    ///
    /// Panics if both reports contain the same address. That can only happen if
    /// two tasks fetched the same page, which the visited registry rules out.
    pub fn merge(&mut self, other: CrawlReport) {
        for (address, outcome) in other.pages {
            match self.pages.entry(address) {
                Entry::Vacant(slot) => {
                    slot.insert(outcome);
                }
                Entry::Occupied(slot) => {
                    panic!(
                        "crawl invariant violated: {} was fetched by more than one task",
                        slot.key()
                    );
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, address: &str) -> Option<&FetchOutcome> {
        self.pages.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.pages.contains_key(address)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FetchOutcome> {
        self.pages.iter()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Entries whose fetch failed
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.pages.iter().filter_map(|(address, outcome)| match outcome {
            FetchOutcome::Failure(error) => Some((address.as_str(), error)),
            FetchOutcome::Success { .. } => None,
        })
    }

    pub fn success_count(&self) -> usize {
        self.pages.values().filter(|o| o.is_success()).count()
    }
}

impl IntoIterator for CrawlReport {
    type Item = (String, FetchOutcome);
    type IntoIter = btree_map::IntoIter<String, FetchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a> IntoIterator for &'a CrawlReport {
    type Item = (&'a String, &'a FetchOutcome);
    type IntoIter = btree_map::Iter<'a, String, FetchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
