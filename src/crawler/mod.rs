//! Crawler module for concurrent link-graph exploration
//!
//! This module contains the core crawling logic, including:
//! - The `Fetcher` abstraction and a canned in-memory fetcher
//! - The `PendingWork` counter used to join fan-out tasks
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pending;

pub use coordinator::{Coordinator, VisitPolicy};
pub use fetcher::{CannedFetcher, FetchError, FetchedPage, Fetcher};
pub use pending::{PendingWork, WorkGuard};

use crate::config::{validate, Config};
use std::time::Duration;

/// Runs a complete crawl described by `config`
///
/// This is the main entry point for a crawl. It will:
/// 1. Validate the configuration and build a canned fetcher from its pages
/// 2. Spawn the root visit
/// 3. Wait for every visit to finish
///
/// The finished coordinator is returned for reporting.
///
/// # Example
///
/// ```no_run
/// use fanout_crawl::config::Config;
/// use fanout_crawl::crawler::run_crawl;
///
/// # async fn example() -> fanout_crawl::Result<()> {
/// let coordinator = run_crawl(&Config::default()).await?;
/// for line in coordinator.report_all().await {
///     println!("{}", line);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> crate::Result<Coordinator<CannedFetcher>> {
    validate(config)?;

    let fetcher = CannedFetcher::from_pages(&config.pages)
        .with_latency(Duration::from_millis(config.crawler.fetch_latency_ms));
    tracing::debug!("Canned fetcher serves {} pages", fetcher.len());

    let coordinator = Coordinator::new(fetcher, config.crawler.visit_policy);
    coordinator.crawl(config.crawler.root_url.clone(), config.crawler.max_depth);
    coordinator.wait().await;

    let stats = coordinator.stats();
    tracing::info!(
        "Crawl finished: {} URLs recorded, {} tasks, {} fetches",
        stats.urls_recorded,
        stats.tasks_spawned,
        stats.fetches
    );

    Ok(coordinator)
}
