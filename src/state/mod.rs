//! State module for shared, lock-guarded data
//!
//! # Components
//!
//! - `VisitStore`: URL → `VisitRecord` map written concurrently by crawl tasks
//! - `KeyedCounter`: per-key counter incremented from many tasks

mod counter;
mod visit;

// Re-export main types
pub use counter::{hammer, KeyedCounter};
pub use visit::{ClaimOutcome, VisitRecord, VisitStore};
