/// Visit records for crawled URLs
///
/// Every record lives in a single map behind one lock, so `found` and
/// `body` are always read and written together.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Outcome of visiting one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitRecord {
    /// Claimed by a task whose fetch has not completed yet
    Claimed,

    /// Fetch succeeded with this body
    Found { body: String },

    /// Fetch failed
    NotFound,
}

impl VisitRecord {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Body of a successful fetch, `None` otherwise
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Found { body } => Some(body),
            _ => None,
        }
    }
}

/// Result of trying to claim a URL at some depth budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// First arrival; the caller fetches the URL
    Fetch,

    /// Already fetched with a smaller budget; the caller re-spawns these
    /// links with its own, larger budget instead of fetching again
    Expand(Vec<String>),

    /// Nothing to do: the URL was claimed with at least this budget, its
    /// fetch failed, or its fetch is still running and will use the raised
    /// budget when it completes
    Skip,
}

#[derive(Debug)]
struct StoredVisit {
    record: VisitRecord,
    /// Largest depth budget any arrival has claimed this URL with
    depth: u32,
    links: Vec<String>,
}

impl StoredVisit {
    fn settled(record: VisitRecord) -> Self {
        Self {
            record,
            depth: 0,
            links: Vec::new(),
        }
    }
}

/// Lock-guarded map from URL to its visit record
///
/// Keys are only ever added. Each method takes the lock for exactly one map
/// operation and releases it before returning.
#[derive(Debug, Default)]
pub struct VisitStore {
    records: Mutex<HashMap<String, StoredVisit>>,
}

impl VisitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredVisit>> {
        // A panicking writer cannot leave a half-written record behind, so the
        // map is still consistent after poisoning.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `url` with a remaining budget of `depth`
    ///
    /// Only the first arrival fetches. A later arrival with a larger budget
    /// raises the stored budget, so every URL reachable within the depth is
    /// explored no matter which path got there first.
    pub fn claim(&self, url: &str, depth: u32) -> ClaimOutcome {
        let mut records = self.lock();
        let entry = match records.entry(url.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(StoredVisit {
                    record: VisitRecord::Claimed,
                    depth,
                    links: Vec::new(),
                });
                return ClaimOutcome::Fetch;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if depth <= entry.depth {
            return ClaimOutcome::Skip;
        }
        entry.depth = depth;

        match entry.record {
            VisitRecord::Found { .. } => ClaimOutcome::Expand(entry.links.clone()),
            VisitRecord::Claimed | VisitRecord::NotFound => ClaimOutcome::Skip,
        }
    }

    /// Settles a claimed URL as found and keeps its links for later expansion
    ///
    /// Returns the largest budget claimed so far, which the caller uses for
    /// the links.
    pub fn settle_found(&self, url: &str, body: String, links: Vec<String>) -> u32 {
        let mut records = self.lock();
        let entry = records
            .entry(url.to_string())
            .or_insert_with(|| StoredVisit::settled(VisitRecord::Claimed));
        entry.record = VisitRecord::Found { body };
        entry.links = links;
        entry.depth
    }

    /// Records a successful fetch, replacing any earlier record
    pub fn record_found(&self, url: &str, body: String) {
        self.lock().insert(
            url.to_string(),
            StoredVisit::settled(VisitRecord::Found { body }),
        );
    }

    /// Records a failed fetch, replacing any earlier record
    pub fn record_not_found(&self, url: &str) {
        let mut records = self.lock();
        match records.entry(url.to_string()) {
            Entry::Occupied(mut slot) => slot.get_mut().record = VisitRecord::NotFound,
            Entry::Vacant(slot) => {
                slot.insert(StoredVisit::settled(VisitRecord::NotFound));
            }
        }
    }

    /// Returns a copy of the record for `url`
    pub fn get(&self, url: &str) -> Option<VisitRecord> {
        self.lock().get(url).map(|entry| entry.record.clone())
    }

    /// Returns every URL that has a record, in no particular order
    pub fn urls(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
