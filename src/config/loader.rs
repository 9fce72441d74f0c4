//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ConfigIssue};

/// Overrides `simulation.seed`.
pub const SEED_ENV: &str = "ADDRESS_VALIDATION_SEED";
/// Overrides `observability.log_level`.
pub const LOG_LEVEL_ENV: &str = "ADDRESS_VALIDATION_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {name}: '{value}'")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ConfigIssue>),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, process_env)
}

/// Defaults plus environment overrides, validated, for runs without a file.
pub fn load_default_config() -> Result<ServiceConfig, ConfigError> {
    finalize_config(ServiceConfig::default(), process_env)
}

/// Parse, apply overrides from `lookup`, and validate.
pub fn parse_config<F>(content: &str, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config: ServiceConfig = toml::from_str(content)?;
    finalize_config(config, lookup)
}

/// Apply overrides from `lookup` to `config`, then validate the result.
pub fn finalize_config<F>(mut config: ServiceConfig, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Apply overrides from a variable lookup (the process environment in practice).
pub fn apply_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(SEED_ENV) {
        let seed = value.trim().parse::<u64>().map_err(|_| ConfigError::Env {
            name: SEED_ENV,
            value: value.clone(),
        })?;
        config.simulation.seed = Some(seed);
    }

    if let Some(level) = lookup(LOG_LEVEL_ENV) {
        config.observability.log_level = level;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = ServiceConfig::default();
        apply_overrides(&mut config, env(&[(SEED_ENV, "17"), (LOG_LEVEL_ENV, "debug")])).unwrap();
        assert_eq!(config.simulation.seed, Some(17));
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let mut config = ServiceConfig::default();
        let err = apply_overrides(&mut config, env(&[(SEED_ENV, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: SEED_ENV, .. }));
    }

    #[test]
    fn test_invalid_file_content() {
        let err = toml::from_str::<ServiceConfig>("[latency\n").unwrap_err();
        assert!(ConfigError::from(err).to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!(
            "address_validation_load_{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(
            &path,
            "[latency]\nvalidation_min_ms = 10\nvalidation_max_ms = 20\n",
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap_or_default();

        let config = parse_config(&content, env(&[])).unwrap();
        assert_eq!(config.latency.validation_min_ms, 10);
        assert_eq!(config.latency.validation_max_ms, 20);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!(
            "address_validation_missing_{}.toml",
            uuid::Uuid::new_v4()
        ));
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_parse_config_uses_lookup() {
        let config = parse_config("[simulation]\nseed = 1\n", env(&[(SEED_ENV, "9")])).unwrap();
        assert_eq!(config.simulation.seed, Some(9));
    }

    #[test]
    fn test_bad_env_log_level_rejected_without_file() {
        let err = finalize_config(ServiceConfig::default(), env(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        match err {
            ConfigError::Validation(issues) => {
                assert_eq!(issues, vec![ConfigIssue::UnknownLogLevel("loud".into())]);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_defaults_pass_finalize() {
        let config = finalize_config(ServiceConfig::default(), env(&[])).unwrap();
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.simulation.seed, None);
    }

    #[test]
    fn test_validation_errors_surface() {
        let mut config = ServiceConfig::default();
        config.latency.search_min_ms = 5000;
        let err = validate_config(&config).map_err(ConfigError::Validation).unwrap_err();
        assert!(err.to_string().contains("search latency min 5000ms"));
    }
}
