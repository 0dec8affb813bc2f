//! Output module for crawl reports and statistics
//!
//! This module handles:
//! - Formatting per-URL report lines
//! - Recording and printing crawl statistics

mod report;
pub mod stats;

pub use report::{format_report_line, write_report};
pub use stats::{print_statistics, CrawlStats};
