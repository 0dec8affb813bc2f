//! Fanout-Crawl main entry point
//!
//! This is the command-line interface for the Fanout-Crawl coordinator and
//! its generator demos.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fanout_crawl::config::{load_config_with_hash, validate, Config};
use fanout_crawl::crawler::{run_crawl, VisitPolicy};
use fanout_crawl::generator::{drain_buffered, spawn_fibonacci};
use fanout_crawl::output::{print_statistics, write_report};
use fanout_crawl::state::{hammer, KeyedCounter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Fanout-Crawl: concurrent crawl coordinator
///
/// Crawls a canned link graph with one task per visit, waits for every
/// task to finish, then reports what was found.
#[derive(Parser, Debug)]
#[command(name = "fanout-crawl")]
#[command(version)]
#[command(about = "A concurrent crawl coordinator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to the built-in golang.org fixture)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the root URL
    #[arg(long)]
    url: Option<String>,

    /// Override the depth budget
    #[arg(long)]
    depth: Option<u32>,

    /// Override the visit policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["fibonacci", "buffered", "counter"])]
    dry_run: bool,

    /// Run the select-based Fibonacci generator and exit
    #[arg(long, conflicts_with_all = ["dry_run", "buffered", "counter"])]
    fibonacci: bool,

    /// Run the buffered range-and-close Fibonacci generator and exit
    #[arg(long, conflicts_with_all = ["dry_run", "fibonacci", "counter"])]
    buffered: bool,

    /// Increment a shared counter from N concurrent tasks and exit
    #[arg(long, value_name = "N", conflicts_with_all = ["dry_run", "fibonacci", "buffered"])]
    counter: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Refetch,
    Claim,
}

impl From<PolicyArg> for VisitPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Refetch => VisitPolicy::Refetch,
            PolicyArg::Claim => VisitPolicy::Claim,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.fibonacci {
        handle_fibonacci(&config).await?;
    } else if cli.buffered {
        handle_buffered(&config).await?;
    } else if let Some(tasks) = cli.counter {
        handle_counter(tasks).await?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fanout_crawl=info,warn"),
            1 => EnvFilter::new("fanout_crawl=debug,info"),
            2 => EnvFilter::new("fanout_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file (or the built-in fixture) and applies CLI overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration given, using the golang.org fixture");
            Config::default()
        }
    };

    if let Some(url) = &cli.url {
        config.crawler.root_url = url.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(policy) = cli.policy {
        config.crawler.visit_policy = policy.into();
    }

    validate(&config).context("invalid command-line override")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Fanout-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Visit policy: {}", config.crawler.visit_policy);
    println!("  Fetch latency: {}ms", config.crawler.fetch_latency_ms);

    println!("\nGenerator:");
    println!("  Count: {}", config.generator.count);

    println!("\nCanned Pages ({}):", config.pages.len());
    for page in &config.pages {
        println!("  - {} {:?} ({} links)", page.url, page.body, page.links.len());
        for link in &page.links {
            println!("    * {}", link);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --fibonacci mode
async fn handle_fibonacci(config: &Config) -> anyhow::Result<()> {
    let (values, summary) = spawn_fibonacci(config.generator.count as usize).await?;
    for value in values {
        println!("{}", value);
    }
    println!("quit");
    tracing::info!(
        "Producer stopped ({:?}) after {} values",
        summary.stop,
        summary.produced
    );
    Ok(())
}

/// Handles the --buffered mode
async fn handle_buffered(config: &Config) -> anyhow::Result<()> {
    let values = drain_buffered(config.generator.count as usize).await?;
    for value in values {
        println!("{}", value);
    }
    println!("closed");
    Ok(())
}

/// Handles the --counter mode
async fn handle_counter(tasks: usize) -> anyhow::Result<()> {
    let counter = Arc::new(KeyedCounter::new());
    let value = hammer(counter, "somekey", tasks).await?;
    println!("{}", value);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let coordinator = run_crawl(config).await?;

    let lines = coordinator.report_all().await;
    let mut stdout = std::io::stdout().lock();
    write_report(&mut stdout, lines).context("failed to write report")?;
    drop(stdout);

    println!();
    print_statistics(&coordinator.stats());
    Ok(())
}
