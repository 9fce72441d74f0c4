//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation issues, not just the first
//! - Pure function: ServiceConfig → Result<(), Vec<ConfigIssue>>

use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("{section} latency min {min_ms}ms exceeds max {max_ms}ms")]
    InvertedLatency {
        section: &'static str,
        min_ms: u64,
        max_ms: u64,
    },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a configuration for semantic problems.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();
    let latency = &config.latency;

    if latency.validation_min_ms > latency.validation_max_ms {
        issues.push(ConfigIssue::InvertedLatency {
            section: "validation",
            min_ms: latency.validation_min_ms,
            max_ms: latency.validation_max_ms,
        });
    }

    if latency.search_min_ms > latency.search_max_ms {
        issues.push(ConfigIssue::InvertedLatency {
            section: "search",
            min_ms: latency.search_min_ms,
            max_ms: latency.search_max_ms,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        issues.push(ConfigIssue::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
