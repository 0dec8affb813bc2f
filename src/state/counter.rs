use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinSet;

/// Per-key counter that is safe to share between tasks
#[derive(Debug, Default)]
pub struct KeyedCounter {
    counts: Mutex<HashMap<String, u64>>,
}

impl KeyedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter for `key`
    pub fn inc(&self, key: &str) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Returns the current value for `key` (zero if never incremented)
    pub fn value(&self, key: &str) -> u64 {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.get(key).copied().unwrap_or(0)
    }
}

/// Spawns `tasks` tasks that each increment `key` once, then joins them all
///
/// Returns the counter value observed after every task has finished.
pub async fn hammer(counter: Arc<KeyedCounter>, key: &str, tasks: usize) -> crate::Result<u64> {
    let mut set = JoinSet::new();

    for _ in 0..tasks {
        let counter = Arc::clone(&counter);
        let key = key.to_string();
        set.spawn(async move { counter.inc(&key) });
    }

    while let Some(result) = set.join_next().await {
        result?;
    }

    tracing::debug!("{} tasks incremented '{}'", tasks, key);
    Ok(counter.value(key))
}
