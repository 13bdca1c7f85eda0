//! Integration tests for the crawler
//!
//! Crawl behavior is exercised against canned in-memory sites, and the full
//! HTTP path against wiremock servers.

use fan_crawl::config::{Config, CrawlerConfig, FetcherConfig, OutputConfig, UserAgentConfig};
use fan_crawl::{
    crawl, run_crawl, Coordinator, CrawlReport, FetchError, FetchOutcome, StaticFetcher,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_links() -> Vec<String> {
    Vec::new()
}

fn addresses(report: &CrawlReport) -> Vec<&str> {
    report.addresses().collect()
}

#[tokio::test]
async fn test_shared_child_is_fetched_once() {
    let fetcher = Arc::new(
        StaticFetcher::new()
            .page("A", "Page A", ["B", "C"])
            .page("B", "Page B", ["C", "D"])
            .page("C", "Page C", no_links())
            .page("D", "Page D", no_links()),
    );

    let report = crawl("A", 3, fetcher.clone()).await;

    assert_eq!(addresses(&report), vec!["A", "B", "C", "D"]);
    assert!(report.iter().all(|(_, outcome)| outcome.is_success()));
    assert_eq!(fetcher.total_calls(), 4);
    assert_eq!(fetcher.calls_for("C"), 1);
}

#[tokio::test]
async fn test_zero_depth_yields_empty_report() {
    let fetcher = Arc::new(StaticFetcher::demo_site());

    let report = crawl(StaticFetcher::DEMO_SEED, 0, fetcher.clone()).await;

    assert!(report.is_empty());
    assert_eq!(fetcher.total_calls(), 0);
}

#[tokio::test]
async fn test_depth_bounds_the_crawl() {
    let chain = || {
        Arc::new(
            StaticFetcher::new()
                .page("a", "A", ["b"])
                .page("b", "B", ["c"])
                .page("c", "C", ["d"])
                .page("d", "D", no_links()),
        )
    };

    let fetcher = chain();
    let report = crawl("a", 2, fetcher.clone()).await;
    assert_eq!(addresses(&report), vec!["a", "b"]);
    assert_eq!(fetcher.calls_for("c"), 0);

    let report = crawl("a", 3, chain()).await;
    assert_eq!(addresses(&report), vec!["a", "b", "c"]);

    let report = crawl("a", 10, chain()).await;
    assert_eq!(addresses(&report), vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_failure_does_not_stop_siblings() {
    let fetcher = Arc::new(
        StaticFetcher::new()
            .page("root", "Root", ["bad", "left", "right"])
            .failing(
                "bad",
                FetchError::Http {
                    address: "bad".to_string(),
                    status: 500,
                },
            )
            .page("left", "Left", ["left-child"])
            .page("right", "Right", ["right-child"])
            .page("left-child", "Left child", no_links())
            .page("right-child", "Right child", no_links()),
    );

    let report = crawl("root", 3, fetcher.clone()).await;

    assert_eq!(
        addresses(&report),
        vec!["bad", "left", "left-child", "right", "right-child", "root"]
    );
    assert_eq!(
        report.get("bad"),
        Some(&FetchOutcome::Failure(FetchError::Http {
            address: "bad".to_string(),
            status: 500
        }))
    );
    assert_eq!(report.success_count(), 5);
}

#[tokio::test]
async fn test_every_fetch_failing_still_returns_report() {
    let fetcher = Arc::new(StaticFetcher::new());

    let report = crawl("https://nowhere.invalid/", 5, fetcher.clone()).await;

    assert_eq!(report.len(), 1);
    assert_eq!(report.success_count(), 0);
    assert_eq!(fetcher.total_calls(), 1);
}

#[tokio::test]
async fn test_cycles_terminate() {
    let fetcher = Arc::new(
        StaticFetcher::new()
            .page("a", "A", ["b"])
            .page("b", "B", ["c"])
            .page("c", "C", ["a", "b"]),
    );

    let report = crawl("a", u32::MAX, fetcher.clone()).await;

    assert_eq!(addresses(&report), vec!["a", "b", "c"]);
    assert_eq!(fetcher.total_calls(), 3);
}

/// A densely cross-linked site where some addresses are missing
fn tangled_site(nodes: usize) -> StaticFetcher {
    let name = |i: usize| format!("page-{}", i % nodes);
    let mut fetcher = StaticFetcher::new();
    for i in 0..nodes {
        // every fifth page has no entry and fails
        if i % 5 == 4 {
            continue;
        }
        let links = [name(i + 1), name(i * 7 + 3), name(i * 3 + 2), name(i)];
        fetcher = fetcher.page(&name(i), &format!("content {}", i), links);
    }
    fetcher
}

fn jitter(run: u64) -> Arc<dyn Fn(&str) -> Duration + Send + Sync> {
    Arc::new(move |address: &str| {
        let mut hasher = DefaultHasher::new();
        (address, run).hash(&mut hasher);
        Duration::from_micros(hasher.finish() % 3000)
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_report_is_stable_under_scheduling_jitter() {
    const NODES: usize = 30;
    // Deep enough that every claiming task still has budget for its children
    let depth = NODES as u32 + 2;

    let mut baseline: Option<CrawlReport> = None;
    for run in 0..25 {
        let fetcher = Arc::new(tangled_site(NODES).with_delay(jitter(run)));

        let report = crawl("page-0", depth, fetcher.clone()).await;

        assert_eq!(fetcher.total_calls(), report.len(), "run {}", run);
        for address in report.addresses() {
            assert_eq!(fetcher.calls_for(address), 1, "run {}: {}", run, address);
        }

        match &baseline {
            None => baseline = Some(report),
            Some(expected) => assert_eq!(&report, expected, "run {} diverged", run),
        }
    }

    let baseline = baseline.unwrap();
    assert!(baseline.len() > 1);
    assert!(baseline.failures().count() > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fetch_limit_keeps_report_complete() {
    let delay = Arc::new(|_: &str| Duration::from_millis(5));
    let limited = Arc::new(tangled_site(20).with_delay(delay.clone()));
    let unlimited = Arc::new(tangled_site(20).with_delay(delay));

    let limited_report = Coordinator::new(limited.clone())
        .with_fetch_limit(2)
        .crawl("page-0", 25)
        .await;
    let unlimited_report = crawl("page-0", 25, unlimited).await;

    assert_eq!(limited_report, unlimited_report);
    assert_eq!(limited.peak_concurrency(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_links_fan_out_in_parallel() {
    let leaves: Vec<String> = (0..8).map(|i| format!("leaf-{}", i)).collect();
    let mut site = StaticFetcher::new().page("hub", "Hub", leaves.clone());
    for leaf in &leaves {
        site = site.page(leaf, "Leaf", no_links());
    }
    let fetcher = Arc::new(site.with_delay(Arc::new(|_: &str| Duration::from_millis(50))));

    let report = crawl("hub", 2, fetcher.clone()).await;

    assert_eq!(report.len(), 9);
    // one level at a time would mean a single fetch in flight
    assert_eq!(fetcher.peak_concurrency(), 8);
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Creates a test configuration for the given seed
fn create_test_config(seed: String, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed,
            max_depth,
            max_concurrent_fetches: Some(4),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        fetcher: FetcherConfig::default(),
        output: OutputConfig::default(),
    }
}

#[tokio::test]
async fn test_full_http_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(
            r#"<html><head><title>Page 1</title></head><body>
            <a href="/page2">again</a>
            <a href="/page3">onwards</a>
            <a href="/missing">gone</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html(
            r#"<html><head><title>Page 2</title></head><body>
            <a href="/">home</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(html(
            r#"<html><head><title>Page 3</title></head><body>
            <a href="/deep">deeper</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Three links away from the seed, beyond max depth 3
    Mock::given(method("GET"))
        .and(path("/deep"))
        .respond_with(html("<html><body>deep</body></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", base_url), 3);
    let report = run_crawl(&config).await.expect("crawl should run");

    let page = |p: &str| format!("{}{}", base_url, p);
    assert_eq!(report.len(), 5);
    assert!(matches!(
        report.get(&page("/")),
        Some(FetchOutcome::Success { content, .. }) if content == "Home"
    ));
    assert!(matches!(
        report.get(&page("/page1")),
        Some(FetchOutcome::Success { content, .. }) if content == "Page 1"
    ));
    assert!(matches!(
        report.get(&page("/page2")),
        Some(FetchOutcome::Success { content, .. }) if content == "Page 2"
    ));
    assert!(report.get(&page("/page3")).is_some_and(|o| o.is_success()));
    assert_eq!(
        report.get(&page("/missing")),
        Some(&FetchOutcome::Failure(FetchError::NotFound {
            address: page("/missing")
        }))
    );
    assert!(!report.contains(&page("/deep")));
}

#[tokio::test]
async fn test_bare_host_seed_is_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Home</title></head><body>
            <a href="/about">About</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(
            r#"<html><head><title>About</title></head><body>
            <a href="/">home</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // No trailing slash, while the link back home is reported as "<base>/"
    let config = create_test_config(base_url.clone(), 3);
    let report = run_crawl(&config).await.expect("crawl should run");

    assert_eq!(
        addresses(&report),
        vec![format!("{}/", base_url), format!("{}/about", base_url)]
    );
}

#[tokio::test]
async fn test_http_crawl_with_unreachable_seed() {
    // Nothing listens on port 9 of localhost
    let config = create_test_config("http://127.0.0.1:9/".to_string(), 2);

    let report = run_crawl(&config).await.expect("crawl should run");

    assert_eq!(report.len(), 1);
    assert!(matches!(
        report.get("http://127.0.0.1:9/"),
        Some(FetchOutcome::Failure(FetchError::Unreachable { .. }))
    ));
}
