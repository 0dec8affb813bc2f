//! Crawler coordinator - concurrent crawl orchestration
//!
//! This module fans a crawl out over the tokio runtime:
//! - Every visit runs as its own task, registered with a `PendingWork`
//!   counter before it is spawned
//! - Results land in a shared `VisitStore`
//! - `wait()` resolves once every transitively spawned visit has finished
//! - Reporting fans out the same way

use crate::crawler::fetcher::Fetcher;
use crate::crawler::pending::PendingWork;
use crate::output::{format_report_line, CrawlStats};
use crate::state::{ClaimOutcome, VisitRecord, VisitStore};
use serde::Deserialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What to do when a URL is reached more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitPolicy {
    /// Fetch on every arrival; depth exhaustion alone bounds the crawl and
    /// the last write for a URL wins
    #[default]
    Refetch,

    /// Claim the URL before fetching; later arrivals are skipped unless
    /// they carry a larger depth budget, in which case the known links are
    /// re-spawned with that budget without fetching again
    Claim,
}

impl VisitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refetch => "refetch",
            Self::Claim => "claim",
        }
    }
}

impl fmt::Display for VisitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct Counters {
    tasks_spawned: AtomicU64,
    depth_exhausted: AtomicU64,
    fetches: AtomicU64,
    found: AtomicU64,
    not_found: AtomicU64,
    skipped: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, urls_recorded: u64) -> CrawlStats {
        CrawlStats {
            tasks_spawned: self.tasks_spawned.load(Ordering::Relaxed),
            depth_exhausted: self.depth_exhausted.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            urls_recorded,
        }
    }
}

struct Shared<F> {
    fetcher: F,
    store: VisitStore,
    pending: PendingWork,
    policy: VisitPolicy,
    counters: Counters,
}

/// Concurrent crawl coordinator
///
/// Cheap to clone; clones share the same store and pending counter. Each
/// coordinator owns its own counter, so independent crawls never wait on
/// each other.
pub struct Coordinator<F> {
    shared: Arc<Shared<F>>,
}

impl<F> Clone for Coordinator<F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around `fetcher`
    pub fn new(fetcher: F, policy: VisitPolicy) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                store: VisitStore::new(),
                pending: PendingWork::new(),
                policy,
                counters: Counters::default(),
            }),
        }
    }

    pub fn policy(&self) -> VisitPolicy {
        self.shared.policy
    }

    /// Starts crawling from `url` with a depth budget of `depth`
    ///
    /// Returns as soon as the root visit is spawned; use [`Coordinator::wait`]
    /// to learn when exploration is complete. Must be called from within a
    /// tokio runtime.
    pub fn crawl(&self, url: impl Into<String>, depth: u32) {
        let url = url.into();
        tracing::info!(
            "Starting crawl at {} (depth {}, policy {})",
            url,
            depth,
            self.shared.policy
        );
        spawn_visit(Arc::clone(&self.shared), url, depth);
    }

    /// Waits until every visit spawned by this coordinator has finished
    pub async fn wait(&self) {
        self.shared.pending.wait().await;
        tracing::debug!("All visit tasks finished");
    }

    /// Number of visit tasks still running
    pub fn outstanding(&self) -> usize {
        self.shared.pending.outstanding()
    }

    /// Returns the record for `url`, if any task wrote one
    pub fn record(&self, url: &str) -> Option<VisitRecord> {
        self.shared.store.get(url)
    }

    /// Every URL with a record, in no particular order
    pub fn visited_urls(&self) -> Vec<String> {
        self.shared.store.urls()
    }

    /// Formats the report line for `url`
    ///
    /// Reading never mutates the store, so repeated calls agree.
    pub fn report(&self, url: &str) -> String {
        format_report_line(url, self.shared.store.get(url).as_ref())
    }

    /// Reports every recorded URL, one task per URL
    ///
    /// Line order follows task completion and is therefore unspecified.
    pub async fn report_all(&self) -> Vec<String> {
        let pending = PendingWork::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        for url in self.visited_urls() {
            let guard = pending.register();
            let tx = tx.clone();
            let coordinator = self.clone();
            tokio::spawn(async move {
                let _guard = guard;
                // The receiver outlives every report task.
                let _ = tx.send(coordinator.report(&url));
            });
        }
        drop(tx);

        pending.wait().await;

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        lines
    }

    /// Snapshot of the crawl counters
    pub fn stats(&self) -> CrawlStats {
        self.shared
            .counters
            .snapshot(self.shared.store.len() as u64)
    }
}

/// Registers a visit and spawns it
///
/// The guard is taken before the task exists and dropped when the task
/// ends, so the pending count can never reach zero while a child is about to
/// be spawned.
fn spawn_visit<F: Fetcher>(shared: Arc<Shared<F>>, url: String, depth: u32) {
    let guard = shared.pending.register();
    Counters::bump(&shared.counters.tasks_spawned);

    tokio::spawn(async move {
        let _guard = guard;

        if depth == 0 {
            tracing::trace!("Depth exhausted at {}", url);
            Counters::bump(&shared.counters.depth_exhausted);
            return;
        }

        if shared.policy == VisitPolicy::Claim {
            match shared.store.claim(&url, depth) {
                ClaimOutcome::Fetch => {}
                ClaimOutcome::Expand(links) => {
                    tracing::trace!("Re-expanding {} with depth {}", url, depth);
                    Counters::bump(&shared.counters.skipped);
                    spawn_links(&shared, links, depth);
                    return;
                }
                ClaimOutcome::Skip => {
                    tracing::trace!("Already claimed: {}", url);
                    Counters::bump(&shared.counters.skipped);
                    return;
                }
            }
        }

        Counters::bump(&shared.counters.fetches);
        match shared.fetcher.fetch(&url).await {
            Ok(page) => {
                tracing::debug!(
                    "Fetched {} (depth {}, {} links)",
                    url,
                    depth,
                    page.links.len()
                );
                Counters::bump(&shared.counters.found);

                // Under claim, a deeper arrival during the fetch may have
                // raised the budget for this URL
                let depth = match shared.policy {
                    VisitPolicy::Refetch => {
                        shared.store.record_found(&url, page.body);
                        depth
                    }
                    VisitPolicy::Claim => {
                        shared
                            .store
                            .settle_found(&url, page.body, page.links.clone())
                    }
                };
                spawn_links(&shared, page.links, depth);
            }
            Err(e) => {
                tracing::debug!("Fetch failed for {}: {}", url, e);
                Counters::bump(&shared.counters.not_found);
                shared.store.record_not_found(&url);
            }
        }
    });
}

fn spawn_links<F: Fetcher>(shared: &Arc<Shared<F>>, links: Vec<String>, depth: u32) {
    for link in links {
        spawn_visit(Arc::clone(shared), link, depth - 1);
    }
}
