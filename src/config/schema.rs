//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the rental
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::blockchain::types::DEFAULT_FEE_LIMIT_SUN;

/// Root configuration for the rental service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Tron full-node connection.
    pub tron: TronConfig,

    /// Rental pool contract settings.
    pub rental: RentalConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8085").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8085".to_string(),
        }
    }
}

/// Timeout configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Time allowed for in-flight requests to drain on shutdown.
    pub graceful_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            graceful_secs: 15,
        }
    }
}

/// Tron full-node connection.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TronConfig {
    /// HTTP API base URL of the full node.
    pub rpc_url: String,

    /// Per-call deadline in seconds.
    pub rpc_timeout_secs: u64,

    /// Optional `TRON-PRO-API-KEY` header value.
    pub api_key: Option<String>,
}

impl Default for TronConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8090".to_string(),
            rpc_timeout_secs: 10,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for TronConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TronConfig")
            .field("rpc_url", &self.rpc_url)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Rental pool contract settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RentalConfig {
    /// Base58 address of the rental pool contract.
    pub contract_address: String,

    /// Fee limit attached to every contract call, in sun.
    pub fee_limit_sun: i64,

    /// Fail fee quotes when any contract sub-query fails instead of
    /// treating the missing value as zero.
    pub strict_fee_queries: bool,
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            contract_address: "TU2MJ5Veik1LRAgjeSzEdvmDYx7mefJZvd".to_string(),
            fee_limit_sun: DEFAULT_FEE_LIMIT_SUN,
            strict_fee_queries: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
