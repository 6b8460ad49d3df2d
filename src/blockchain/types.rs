//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export TronConfig from config module to avoid duplication
pub use crate::config::schema::TronConfig;

/// Smallest currency units (sun) per TRX.
pub const SUN_PER_TRX: i64 = 1_000_000;

/// Default fee limit attached to every contract call, in sun.
pub const DEFAULT_FEE_LIMIT_SUN: i64 = 200_000_000;

/// Resource that can be rented from the delegation pool.
///
/// The discriminants are the on-chain resource codes passed as ABI words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ResourceCode {
    Bandwidth = 0,
    Energy = 1,
}

impl ResourceCode {
    /// Integer code as encoded in contract calls.
    pub fn code(self) -> u64 {
        self as u64
    }
}

impl TryFrom<i32> for ResourceCode {
    type Error = BlockchainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bandwidth),
            1 => Ok(Self::Energy),
            other => Err(BlockchainError::InvalidParam(format!(
                "unknown resource type {}",
                other
            ))),
        }
    }
}

impl From<ResourceCode> for i32 {
    fn from(code: ResourceCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ResourceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bandwidth => f.write_str("bandwidth"),
            Self::Energy => f.write_str("energy"),
        }
    }
}

/// Snapshot of the network-wide energy pool as seen from an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResource {
    pub total_energy_weight: i64,
    pub total_energy_limit: i64,
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Malformed caller input: key, address, amount or transaction template.
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// Serialization, signing or resource-pool failure.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Transaction rejected by the network.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Account lookup refused or failed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),
}

/// Coarse error classes exposed to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParam,
    Internal,
    Unavailable,
    Forbidden,
    Timeout,
}

impl ErrorKind {
    /// Application code reported in the response envelope.
    pub fn code(self) -> u16 {
        match self {
            ErrorKind::Internal => 4000,
            ErrorKind::InvalidParam => 4002,
            ErrorKind::Timeout => 4003,
            ErrorKind::Forbidden => 4005,
            ErrorKind::Unavailable => 4008,
        }
    }

    /// Human-readable message shown to API callers.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal error, please try again later",
            ErrorKind::InvalidParam => "invalid parameter",
            ErrorKind::Timeout => "request timed out",
            ErrorKind::Forbidden => "access forbidden",
            ErrorKind::Unavailable => "resource unavailable",
        }
    }
}

impl BlockchainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlockchainError::InvalidParam(_) => ErrorKind::InvalidParam,
            BlockchainError::Internal(_) | BlockchainError::Rpc(_) => ErrorKind::Internal,
            BlockchainError::Unavailable(_) => ErrorKind::Unavailable,
            BlockchainError::Forbidden(_) => ErrorKind::Forbidden,
            BlockchainError::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Success code of the response envelope.
pub const SUCCESS_CODE: u16 = 1000;
