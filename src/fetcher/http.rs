//! HTTP fetcher implementation
//!
//! Builds a `reqwest` client with a descriptive user agent, fetches pages with a
//! single GET and classifies failures into [`FetchError`] variants. HTML bodies
//! are handed to the parser for link extraction.

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::fetcher::parser::parse_html;
use crate::fetcher::{FetchedPage, Fetcher};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

const MAX_REDIRECTS: usize = 10;

/// Formats the user agent string: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use fan_crawl::config::{FetcherConfig, UserAgentConfig};
/// use fan_crawl::fetcher::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .https_only(fetcher.https_only)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by real HTTP requests
///
/// Each call issues one GET. There is no retry: a failed fetch is final for
/// that address within a crawl.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetcher: &FetcherConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, fetcher)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| classify_request_error(address, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                address: address.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch {
                address: address.to_string(),
                content_type,
            });
        }

        // Relative links resolve against where we actually ended up
        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| FetchError::Body {
            address: address.to_string(),
            message: e.to_string(),
        })?;

        let parsed = parse_html(&body, &final_url);
        tracing::trace!("{} yielded {} links", address, parsed.links.len());

        Ok(FetchedPage {
            content: parsed.title.unwrap_or(body),
            links: parsed.links,
        })
    }
}

fn classify_request_error(address: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            address: address.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Unreachable {
            address: address.to_string(),
            message: "connection refused".to_string(),
        }
    } else {
        FetchError::Unreachable {
            address: address.to_string(),
            message: error.to_string(),
        }
    }
}
