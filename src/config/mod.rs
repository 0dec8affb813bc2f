//! Configuration module for Fanout-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use fanout_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.example.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{golang_pages, Config, CrawlerConfig, GeneratorConfig, PageEntry};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
