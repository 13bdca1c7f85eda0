//! Fan-Crawl main entry point
//!
//! This is the command-line interface for the Fan-Crawl concurrent crawler.

use chrono::Utc;
use clap::Parser;
use fan_crawl::config::{
    canonical_seed, load_config_with_hash, validate, Config, CrawlerConfig, FetcherConfig,
    OutputConfig, UserAgentConfig,
};
use fan_crawl::output::{generate_markdown_summary, print_statistics, CrawlSummary};
use fan_crawl::{run_crawl, ConfigError, Coordinator, CrawlReport, FetchOutcome, StaticFetcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_DEPTH: u32 = 2;
const DEMO_MAX_DEPTH: u32 = 4;

/// Fan-Crawl: a bounded-depth concurrent web crawler
///
/// Fetches every page reachable from a seed within the depth limit exactly
/// once, one concurrent task per discovered link.
#[derive(Parser, Debug)]
#[command(name = "fan-crawl")]
#[command(version)]
#[command(about = "A bounded-depth concurrent web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", conflicts_with = "demo")]
    config: Option<PathBuf>,

    /// Address to start from (overrides the config)
    #[arg(long)]
    seed: Option<String>,

    /// Number of link levels to fetch, the seed being the first (overrides the config)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of simultaneous fetches (overrides the config)
    #[arg(long)]
    max_concurrent_fetches: Option<u32>,

    /// Write a markdown summary to this path (overrides the config)
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Crawl a built-in canned site instead of the network
    #[arg(long)]
    demo: bool,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> fan_crawl::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = resolve_config(&cli)?;

    if cli.dry_run {
        print_plan(&config, cli.demo);
        return Ok(());
    }

    let started_at = Utc::now();
    let report = if cli.demo {
        let mut coordinator = Coordinator::new(Arc::new(StaticFetcher::demo_site()));
        if let Some(limit) = config.crawler.max_concurrent_fetches {
            coordinator = coordinator.with_fetch_limit(limit as usize);
        }
        coordinator
            .crawl(&config.crawler.seed, config.crawler.max_depth)
            .await
    } else {
        run_crawl(&config).await.map_err(|e| {
            tracing::error!("Crawl failed: {}", e);
            e
        })?
    };
    let finished_at = Utc::now();

    let mut summary = CrawlSummary::new(
        config.crawler.seed.as_str(),
        config.crawler.max_depth,
        started_at,
        finished_at,
        report,
    );
    if let Some(hash) = config_hash {
        summary = summary.with_config_hash(hash);
    }

    if !cli.quiet {
        print_pages(&summary.report);
        print_statistics(&summary.statistics);
    }

    if let Some(path) = &config.output.summary_path {
        generate_markdown_summary(&summary, Path::new(path))?;
        tracing::info!("Summary written to {}", path);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fan_crawl=info,warn"),
            1 => EnvFilter::new("fan_crawl=debug,info"),
            2 => EnvFilter::new("fan_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration from the config file, demo mode and overrides
///
/// Returns the config hash alongside when a config file was loaded.
fn resolve_config(cli: &Cli) -> fan_crawl::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => {
            let seed = match (&cli.seed, cli.demo) {
                (Some(seed), _) => seed.clone(),
                (None, true) => StaticFetcher::DEMO_SEED.to_string(),
                (None, false) => {
                    return Err(ConfigError::Validation(
                        "either a CONFIG file, --seed or --demo is required".to_string(),
                    )
                    .into())
                }
            };
            let max_depth = if cli.demo { DEMO_MAX_DEPTH } else { DEFAULT_MAX_DEPTH };
            (default_config(seed, max_depth), None)
        }
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = seed.clone();
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(limit) = cli.max_concurrent_fetches {
        config.crawler.max_concurrent_fetches = Some(limit);
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = Some(path.display().to_string());
    }

    validate(&config)?;
    config.crawler.seed = canonical_seed(&config.crawler.seed)?;
    Ok((config, hash))
}

fn default_config(seed: String, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed,
            max_depth,
            max_concurrent_fetches: None,
        },
        user_agent: UserAgentConfig::default(),
        fetcher: FetcherConfig::default(),
        output: OutputConfig::default(),
    }
}

/// Handles --dry-run: shows what would be crawled
fn print_plan(config: &Config, demo: bool) {
    println!("=== Fan-Crawl Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", config.crawler.seed);
    println!("  Max depth: {}", config.crawler.max_depth);
    match config.crawler.max_concurrent_fetches {
        Some(limit) => println!("  Max concurrent fetches: {}", limit),
        None => println!("  Max concurrent fetches: unbounded"),
    }

    println!("\nFetcher:");
    if demo {
        println!("  Built-in demo site");
    } else {
        println!(
            "  HTTP, timeout {}s (connect {}s), https only: {}",
            config.fetcher.timeout_secs,
            config.fetcher.connect_timeout_secs,
            config.fetcher.https_only
        );
        println!(
            "  User agent: {}/{}",
            config.user_agent.crawler_name, config.user_agent.crawler_version
        );
    }

    if let Some(path) = &config.output.summary_path {
        println!("\nOutput:");
        println!("  Summary: {}", path);
    }

    println!("\n✓ Configuration is valid");
}

fn print_pages(report: &CrawlReport) {
    for (address, outcome) in report {
        match outcome {
            FetchOutcome::Success { content, .. } => println!("found: {} {:?}", address, content),
            FetchOutcome::Failure(error) => println!("failed: {}", error),
        }
    }
    println!();
}
