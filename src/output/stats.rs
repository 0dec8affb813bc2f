//! Crawl statistics
//!
//! Counters collected by the coordinator while a crawl runs, and a printer
//! for them.

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Visit tasks spawned, including the root
    pub tasks_spawned: u64,

    /// Tasks that stopped because their depth budget was zero
    pub depth_exhausted: u64,

    /// Calls made to the fetcher
    pub fetches: u64,

    /// Fetches that returned a page
    pub found: u64,

    /// Fetches that failed
    pub not_found: u64,

    /// Tasks skipped because the URL was already claimed
    pub skipped: u64,

    /// Distinct URLs with a record
    pub urls_recorded: u64,
}

impl CrawlStats {
    /// Share of fetches that returned a page, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.fetches == 0 {
            return 0.0;
        }
        (self.found as f64 / self.fetches as f64) * 100.0
    }

    /// Fetches per recorded URL; above 1.0 means some URL was fetched twice
    pub fn refetch_ratio(&self) -> f64 {
        if self.urls_recorded == 0 {
            return 0.0;
        }
        self.fetches as f64 / self.urls_recorded as f64
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Tasks:");
    println!("  Spawned: {}", stats.tasks_spawned);
    println!("  Depth exhausted: {}", stats.depth_exhausted);
    println!("  Skipped (already claimed): {}", stats.skipped);
    println!();

    println!("Fetches:");
    println!("  Total: {}", stats.fetches);
    println!("  Found: {}", stats.found);
    println!("  Not found: {}", stats.not_found);
    println!();

    println!(
        "Success Rate: {:.1}% ({} URLs recorded, {:.2} fetches per URL)",
        stats.success_rate(),
        stats.urls_recorded,
        stats.refetch_ratio()
    );
}
