//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the validation service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Simulated backend latency.
    pub latency: LatencyConfig,

    /// Random outcome selection.
    pub simulation: SimulationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Simulated latency ranges, inclusive, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LatencyConfig {
    pub validation_min_ms: u64,
    pub validation_max_ms: u64,
    pub search_min_ms: u64,
    pub search_max_ms: u64,
}

impl LatencyConfig {
    /// No simulated delay at all.
    pub fn instant() -> Self {
        Self {
            validation_min_ms: 0,
            validation_max_ms: 0,
            search_min_ms: 0,
            search_max_ms: 0,
        }
    }

    pub fn validation_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.validation_min_ms),
            Duration::from_millis(self.validation_max_ms),
        )
    }

    pub fn search_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.search_min_ms),
            Duration::from_millis(self.search_max_ms),
        )
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            validation_min_ms: 500,
            validation_max_ms: 1500,
            search_min_ms: 200,
            search_max_ms: 800,
        }
    }
}

/// Random outcome selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed RNG seed for reproducible runs. Entropy-seeded when absent.
    pub seed: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
