//! Page fetching capability consumed by the crawler
//!
//! The crawl engine never talks to the network itself. It asks a [`Fetcher`]
//! for the content of an address and the addresses that page links to.
//!
//! - [`HttpFetcher`]: real HTTP fetching with HTML link extraction
//! - [`StaticFetcher`]: canned in-memory pages, used for demos and tests

mod canned;
mod http;
mod parser;

pub use canned::{DelayFn, StaticFetcher};
pub use http::{build_http_client, HttpFetcher};
pub use parser::{parse_html, ParsedPage};

use crate::FetchError;
use async_trait::async_trait;

/// Content and outgoing links of one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page content (for HTML pages, the title when there is one)
    pub content: String,

    /// Addresses linked from the page, in document order
    pub links: Vec<String>,
}

/// Retrieves a page and the addresses it links to
///
/// Implementations are shared by every concurrent crawl task, so they must be
/// `Send + Sync`. The crawler calls `fetch` at most once per address within a
/// single crawl.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError>;
}
