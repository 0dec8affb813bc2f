//! Fanout-Crawl: concurrent coordination in practice
//!
//! This crate implements a depth-bounded concurrent crawl coordinator over a
//! pluggable fetcher, together with the channel-based generators and the
//! lock-guarded counter that share its coordination primitives.

pub mod config;
pub mod crawler;
pub mod generator;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Fanout-Crawl operations
#[derive(Debug, Error)]
pub enum FanoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generator error: {0}")]
    Generator(#[from] generator::GeneratorError),

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Fanout-Crawl operations
pub type Result<T> = std::result::Result<T, FanoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CannedFetcher, Coordinator, Fetcher, PendingWork, VisitPolicy};
pub use state::{KeyedCounter, VisitRecord};
