use crate::config::types::{Config, CrawlerConfig, GeneratorConfig, PageEntry};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Deepest crawl the config accepts; re-fetch fan-out grows with branching^depth
pub const MAX_DEPTH_LIMIT: u32 = 12;

/// Largest simulated fetch latency (milliseconds)
pub const MAX_FETCH_LATENCY_MS: u64 = 10_000;

/// Number of Fibonacci values that fit in a u64 (fib(0) through fib(93))
pub const MAX_GENERATOR_COUNT: u32 = 94;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_generator_config(&config.generator)?;
    validate_pages(&config.pages)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_url("root-url", &config.root_url)?;

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.fetch_latency_ms > MAX_FETCH_LATENCY_MS {
        return Err(ConfigError::Validation(format!(
            "fetch_latency_ms must be <= {}ms, got {}ms",
            MAX_FETCH_LATENCY_MS, config.fetch_latency_ms
        )));
    }

    Ok(())
}

/// Validates generator configuration
fn validate_generator_config(config: &GeneratorConfig) -> Result<(), ConfigError> {
    if config.count < 1 || config.count > MAX_GENERATOR_COUNT {
        return Err(ConfigError::Validation(format!(
            "generator count must be between 1 and {}, got {}",
            MAX_GENERATOR_COUNT, config.count
        )));
    }
    Ok(())
}

/// Validates canned pages: parseable URLs and no duplicate entries
fn validate_pages(pages: &[PageEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for page in pages {
        validate_url("page url", &page.url)?;

        if !seen.insert(page.url.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Page '{}' is defined more than once",
                page.url
            )));
        }

        for link in &page.links {
            validate_url("link", link)?;
        }
    }

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))
}
