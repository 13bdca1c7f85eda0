//! Crawl engine: concurrent fan-out with global deduplication
//!
//! This module contains the coordination logic:
//! - the visited registry actor that hands out at most one claim per address
//! - the recursive crawl task (claim, fetch, fan out, join)
//! - the coordinator that owns a crawl from start to final report

mod coordinator;
mod registry;
mod report;
mod task;

pub use coordinator::{crawl, crawl_blocking, run_crawl, Coordinator};
pub use registry::{RegistryError, RegistryHandle, VisitedRegistry};
pub use report::{CrawlReport, FetchOutcome};
