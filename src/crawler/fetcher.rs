//! Fetcher abstraction and the canned in-memory implementation
//!
//! The coordinator only ever talks to a [`Fetcher`]; it never knows whether
//! pages come from a map, a slow backend, or somewhere else.

use crate::config::PageEntry;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page body content
    pub body: String,

    /// Outbound links, in page order
    pub links: Vec<String>,
}

/// Errors a fetcher can report
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found: {url}")]
    NotFound { url: String },
}

/// Resolves a URL into a body and its outbound links
///
/// Implementations may be slow and may fail; the coordinator records a
/// failure and moves on.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Fetcher that serves canned pages from memory
#[derive(Debug, Clone, Default)]
pub struct CannedFetcher {
    pages: HashMap<String, FetchedPage>,
    latency: Duration,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fetcher serving the given page entries
    pub fn from_pages(pages: &[PageEntry]) -> Self {
        let mut fetcher = Self::new();
        for page in pages {
            fetcher.insert(&page.url, &page.body, page.links.clone());
        }
        fetcher
    }

    /// The four-page golang.org fixture
    pub fn golang() -> Self {
        Self::from_pages(&crate::config::golang_pages())
    }

    /// Adds or replaces a canned page
    pub fn insert(&mut self, url: &str, body: &str, links: Vec<String>) {
        self.pages.insert(
            url.to_string(),
            FetchedPage {
                body: body.to_string(),
                links,
            },
        );
    }

    /// Delays every fetch by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}
