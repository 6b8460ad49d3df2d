//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Full-node HTTP endpoint.
pub const ENV_RPC_ENDPOINT: &str = "TRON_RPC_ENDPOINT";
/// Full-node API key.
pub const ENV_API_KEY: &str = "TRON_API_KEY";
/// HTTP bind address.
pub const ENV_BIND_ADDRESS: &str = "RENTAL_BIND_ADDRESS";
/// Log filter.
pub const ENV_LOG_LEVEL: &str = "RENTAL_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Overlay environment values onto a parsed config.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_RPC_ENDPOINT) {
        config.tron.rpc_url = url;
    }
    if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
        config.tron.api_key = Some(key);
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }
}

/// Parse a TOML document. Does not validate.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from an optional TOML file plus the process
/// environment, then validate.
///
/// Without a file, every section takes its defaults.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_RPC_ENDPOINT, "https://api.shasta.trongrid.io"),
            (ENV_API_KEY, "k"),
            (ENV_BIND_ADDRESS, "127.0.0.1:9000"),
        ]
        .into_iter()
        .collect();

        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.tron.rpc_url, "https://api.shasta.trongrid.io");
        assert_eq!(config.tron.api_key.as_deref(), Some("k"));
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_empty_api_key_ignored() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |key| (key == ENV_API_KEY).then(String::new));
        assert!(config.tron.api_key.is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/rental.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("[tron\n"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError::FeeLimit(0),
            ValidationError::ZeroTimeout("timeouts.request_secs"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: rental.fee_limit_sun must be positive (got 0), timeouts.request_secs must be greater than zero"
        );
    }
}
