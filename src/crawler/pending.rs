//! Counting join primitive for fan-out work
//!
//! Every task registers before it is spawned and holds the returned
//! [`WorkGuard`] for its whole lifetime. Dropping the guard deregisters the
//! task, whether it returned normally, bailed out early, or panicked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    drained: Notify,
}

/// Count of in-flight tasks, shared by cloning
#[derive(Debug, Clone, Default)]
pub struct PendingWork {
    inner: Arc<Inner>,
}

/// Registration of one task with a [`PendingWork`] counter
#[derive(Debug)]
#[must_use = "dropping the guard immediately deregisters the task"]
pub struct WorkGuard {
    inner: Arc<Inner>,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one task; call before spawning it
    pub fn register(&self) -> WorkGuard {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of tasks registered and not yet finished
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Waits until the outstanding count reaches zero
    ///
    /// Returns immediately if nothing is registered.
    pub async fn wait(&self) {
        loop {
            let drained = self.inner.drained.notified();
            tokio::pin!(drained);
            // Enable before checking the count so a wakeup between the load
            // and the await is not lost.
            drained.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            drained.await;
        }
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}
