//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, fee limit > 0)
//! - Check addresses and URLs parse before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::blockchain::address::is_valid_address;
use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("tron.rpc_url '{0}' is not an http(s) URL")]
    RpcUrl(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("rental.contract_address '{0}' is not a valid Tron address")]
    ContractAddress(String),

    #[error("rental.fee_limit_sun must be positive (got {0})")]
    FeeLimit(i64),

    #[error("observability.log_level '{0}' is not a valid filter")]
    LogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.graceful_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.graceful_secs"));
    }

    match url::Url::parse(&config.tron.rpc_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::RpcUrl(config.tron.rpc_url.clone())),
    }
    if config.tron.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("tron.rpc_timeout_secs"));
    }

    if !is_valid_address(&config.rental.contract_address) {
        errors.push(ValidationError::ContractAddress(config.rental.contract_address.clone()));
    }
    if config.rental.fee_limit_sun <= 0 {
        errors.push(ValidationError::FeeLimit(config.rental.fee_limit_sun));
    }

    if tracing_subscriber::EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(config.observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
