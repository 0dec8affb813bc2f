use crate::crawler::VisitPolicy;
use serde::Deserialize;

/// Main configuration structure for Fanout-Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Canned pages served by the in-memory fetcher
    #[serde(default, rename = "page")]
    pub pages: Vec<PageEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Depth budget handed to the root visit
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Whether a URL reachable by several paths is fetched once or every time
    #[serde(rename = "visit-policy", default)]
    pub visit_policy: VisitPolicy,

    /// Simulated latency of every fetch (milliseconds)
    #[serde(rename = "fetch-latency-ms", default)]
    pub fetch_latency_ms: u64,
}

/// Fibonacci generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Number of values the consumer pulls before signalling quit
    #[serde(default = "default_generator_count")]
    pub count: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: default_generator_count(),
        }
    }
}

fn default_generator_count() -> u32 {
    10
}

/// A canned page: its body and the links found on it
#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    pub url: String,
    pub body: String,
    #[serde(default)]
    pub links: Vec<String>,
}

impl PageEntry {
    fn new(url: &str, body: &str, links: &[&str]) -> Self {
        Self {
            url: url.to_string(),
            body: body.to_string(),
            links: links.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl Default for Config {
    /// The four-page golang.org fixture, crawled to depth 4
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig {
                root_url: "https://golang.org/".to_string(),
                max_depth: 4,
                visit_policy: VisitPolicy::default(),
                fetch_latency_ms: 0,
            },
            generator: GeneratorConfig::default(),
            pages: golang_pages(),
        }
    }
}

/// Canned pages of the golang.org fixture
///
/// `https://golang.org/cmd/` is linked from two pages but has no entry, so
/// it always ends up recorded as not found.
pub fn golang_pages() -> Vec<PageEntry> {
    vec![
        PageEntry::new(
            "https://golang.org/",
            "The Go Programming Language",
            &["https://golang.org/pkg/", "https://golang.org/cmd/"],
        ),
        PageEntry::new(
            "https://golang.org/pkg/",
            "Packages",
            &[
                "https://golang.org/",
                "https://golang.org/cmd/",
                "https://golang.org/pkg/fmt/",
                "https://golang.org/pkg/os/",
            ],
        ),
        PageEntry::new(
            "https://golang.org/pkg/fmt/",
            "Package fmt",
            &["https://golang.org/", "https://golang.org/pkg/"],
        ),
        PageEntry::new(
            "https://golang.org/pkg/os/",
            "Package os",
            &["https://golang.org/", "https://golang.org/pkg/"],
        ),
    ]
}
