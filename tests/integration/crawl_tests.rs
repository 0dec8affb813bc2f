//! Integration tests for the crawler
//!
//! These tests drive full crawls against canned and custom fetchers and
//! check the recorded results once every task has finished.

use fanout_crawl::config::parse_config;
use fanout_crawl::crawler::{
    run_crawl, CannedFetcher, Coordinator, FetchError, FetchedPage, Fetcher, VisitPolicy,
};
use fanout_crawl::generator::{run_fibonacci, StopReason};
use fanout_crawl::state::VisitRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ROOT: &str = "https://golang.org/";

fn expected_bodies() -> Vec<(&'static str, &'static str)> {
    vec![
        ("https://golang.org/", "The Go Programming Language"),
        ("https://golang.org/pkg/", "Packages"),
        ("https://golang.org/pkg/fmt/", "Package fmt"),
        ("https://golang.org/pkg/os/", "Package os"),
    ]
}

fn assert_golang_results(coordinator: &Coordinator<CannedFetcher>) {
    for (url, body) in expected_bodies() {
        assert_eq!(
            coordinator.record(url),
            Some(VisitRecord::Found {
                body: body.to_string()
            }),
            "unexpected record for {}",
            url
        );
    }

    assert_eq!(
        coordinator.record("https://golang.org/cmd/"),
        Some(VisitRecord::NotFound)
    );

    let mut visited = coordinator.visited_urls();
    visited.sort();
    assert_eq!(
        visited,
        vec![
            "https://golang.org/",
            "https://golang.org/cmd/",
            "https://golang.org/pkg/",
            "https://golang.org/pkg/fmt/",
            "https://golang.org/pkg/os/",
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_golang_fixture() {
    let coordinator = Coordinator::new(CannedFetcher::golang(), VisitPolicy::Refetch);
    coordinator.crawl(ROOT, 4);
    coordinator.wait().await;

    assert_golang_results(&coordinator);
    assert_eq!(coordinator.outstanding(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_claim_policy_records_same_results() {
    let coordinator = Coordinator::new(CannedFetcher::golang(), VisitPolicy::Claim);
    coordinator.crawl(ROOT, 4);
    coordinator.wait().await;

    assert_golang_results(&coordinator);
    assert_eq!(coordinator.stats().fetches, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_fetcher_still_completes() {
    let fetcher = CannedFetcher::golang().with_latency(Duration::from_millis(5));
    let coordinator = Coordinator::new(fetcher, VisitPolicy::Refetch);
    coordinator.crawl(ROOT, 4);
    coordinator.wait().await;

    assert_golang_results(&coordinator);
}

#[tokio::test]
async fn test_missing_root_returns_promptly() {
    let coordinator = Coordinator::new(CannedFetcher::golang(), VisitPolicy::Refetch);
    coordinator.crawl("https://example.com/missing", 4);

    tokio::time::timeout(Duration::from_secs(1), coordinator.wait())
        .await
        .expect("wait should return promptly for a missing page");

    assert_eq!(
        coordinator.record("https://example.com/missing"),
        Some(VisitRecord::NotFound)
    );
    assert_eq!(coordinator.visited_urls().len(), 1);
    assert_eq!(coordinator.stats().fetches, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_urls_beyond_depth_have_no_record() {
    let coordinator = Coordinator::new(CannedFetcher::golang(), VisitPolicy::Refetch);
    coordinator.crawl(ROOT, 2);
    coordinator.wait().await;

    // fmt and os are only reachable at depth three
    assert_eq!(coordinator.record("https://golang.org/pkg/fmt/"), None);
    assert_eq!(coordinator.record("https://golang.org/pkg/os/"), None);
    assert!(coordinator.record("https://golang.org/pkg/").is_some());
    assert_eq!(coordinator.record("https://golang.org/never-linked/"), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_report_lines_for_fixture() {
    let coordinator = Coordinator::new(CannedFetcher::golang(), VisitPolicy::Refetch);
    coordinator.crawl(ROOT, 4);
    coordinator.wait().await;

    let mut lines = coordinator.report_all().await;
    lines.sort();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "found: https://golang.org/ \"The Go Programming Language\"");
    assert_eq!(lines[4], "not found: https://golang.org/cmd/");

    // Reporting twice gives the same answer
    let mut again = coordinator.report_all().await;
    again.sort();
    assert_eq!(lines, again);
}

#[derive(Default)]
struct FetchLog {
    calls: AtomicU64,
    seen: Mutex<HashMap<String, u64>>,
}

/// Fetcher over a complete tree: every page has `branching` children
struct TreeFetcher {
    branching: usize,
    log: Arc<FetchLog>,
}

impl Fetcher for TreeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.log.calls.fetch_add(1, Ordering::Relaxed);
        *self
            .log
            .seen
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        Ok(FetchedPage {
            body: format!("page {}", url),
            links: (0..self.branching)
                .map(|i| format!("{}/{}", url, i))
                .collect(),
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fan_out_bounded_by_branching_and_depth() {
    let log = Arc::new(FetchLog::default());
    let fetcher = TreeFetcher {
        branching: 3,
        log: Arc::clone(&log),
    };
    let coordinator = Coordinator::new(fetcher, VisitPolicy::Refetch);

    coordinator.crawl("https://tree.test", 4);
    coordinator.wait().await;

    // Fetches happen at depths 4..=1: 1 + 3 + 9 + 27
    assert_eq!(log.calls.load(Ordering::Relaxed), 40);
    // Plus the 81 tasks that stop at depth zero
    assert_eq!(coordinator.stats().tasks_spawned, 121);
    assert_eq!(coordinator.visited_urls().len(), 40);

    // A tree has no shared paths, so nothing was fetched twice
    assert!(log.seen.lock().unwrap().values().all(|&n| n == 1));
    assert_eq!(
        coordinator.record("https://tree.test/2/0/1"),
        Some(VisitRecord::Found {
            body: "page https://tree.test/2/0/1".to_string()
        })
    );
}

/// Fetcher over a small graph where some pages answer slowly
struct DelayedGraphFetcher {
    pages: HashMap<&'static str, Vec<&'static str>>,
    slow: HashMap<&'static str, Duration>,
    log: Arc<FetchLog>,
}

impl DelayedGraphFetcher {
    /// a -> [s, b], s -> [c], b -> [x], x -> [c], c -> [d]
    ///
    /// `s` is slow, so `c` is usually reached first through the longer
    /// `b -> x` path with the smaller remaining budget.
    fn short_slow_path(log: Arc<FetchLog>) -> Self {
        let pages = HashMap::from([
            ("a", vec!["s", "b"]),
            ("s", vec!["c"]),
            ("b", vec!["x"]),
            ("x", vec!["c"]),
            ("c", vec!["d"]),
            ("d", vec![]),
        ]);
        let slow = HashMap::from([("s", Duration::from_millis(200))]);
        Self { pages, slow, log }
    }
}

impl Fetcher for DelayedGraphFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if let Some(delay) = self.slow.get(url) {
            tokio::time::sleep(*delay).await;
        }

        self.log.calls.fetch_add(1, Ordering::Relaxed);
        *self
            .log
            .seen
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        match self.pages.get(url) {
            Some(links) => Ok(FetchedPage {
                body: format!("page {}", url),
                links: links.iter().map(|l| l.to_string()).collect(),
            }),
            None => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

async fn crawl_short_slow_path(policy: VisitPolicy) -> (Vec<String>, Arc<FetchLog>) {
    let log = Arc::new(FetchLog::default());
    let coordinator = Coordinator::new(
        DelayedGraphFetcher::short_slow_path(Arc::clone(&log)),
        policy,
    );
    coordinator.crawl("a", 4);
    coordinator.wait().await;

    let mut visited = coordinator.visited_urls();
    visited.sort();
    (visited, log)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_claim_reaches_what_refetch_reaches_over_a_slow_short_path() {
    let (refetched, _) = crawl_short_slow_path(VisitPolicy::Refetch).await;
    let (claimed, log) = crawl_short_slow_path(VisitPolicy::Claim).await;

    assert_eq!(refetched, vec!["a", "b", "c", "d", "s", "x"]);
    assert_eq!(claimed, refetched);

    // c is reached twice but fetched once; the deeper arrival re-spawns its links
    assert_eq!(log.calls.load(Ordering::Relaxed), 6);
    assert!(log.seen.lock().unwrap().values().all(|&n| n == 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_run_crawl_from_config() {
    let config = parse_config(
        r#"
[crawler]
root-url = "https://example.com/"
max-depth = 3
visit-policy = "claim"

[[page]]
url = "https://example.com/"
body = "Home"
links = ["https://example.com/a", "https://example.com/b"]

[[page]]
url = "https://example.com/a"
body = "A"
links = ["https://example.com/", "https://example.com/b"]
"#,
    )
    .unwrap();

    let coordinator = run_crawl(&config).await.unwrap();

    let mut lines = coordinator.report_all().await;
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "found: https://example.com/ \"Home\"",
            "found: https://example.com/a \"A\"",
            "not found: https://example.com/b",
        ]
    );
    assert_eq!(coordinator.stats().fetches, 3);
}

#[tokio::test]
async fn test_run_crawl_rejects_invalid_config() {
    let mut config = fanout_crawl::Config::default();
    config.crawler.root_url = "not a url".to_string();

    assert!(matches!(
        run_crawl(&config).await,
        Err(fanout_crawl::FanoutError::Config(_))
    ));
}

#[test]
fn test_fibonacci_generator_scenario() {
    let (values, summary) = run_fibonacci(10).expect("generator failed");

    assert_eq!(values, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
    assert_eq!(summary.produced, 10);
    assert_eq!(summary.stop, StopReason::Quit);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_example_config_matches_builtin_fixture() {
    let config = parse_config(include_str!("../../crawl.example.toml")).unwrap();
    assert_eq!(config.pages.len(), 4);

    let from_file = run_crawl(&config).await.unwrap();
    let builtin = run_crawl(&fanout_crawl::Config::default()).await.unwrap();

    let mut file_lines = from_file.report_all().await;
    let mut builtin_lines = builtin.report_all().await;
    file_lines.sort();
    builtin_lines.sort();

    assert_eq!(file_lines, builtin_lines);
    assert_eq!(from_file.stats(), builtin.stats());
}
