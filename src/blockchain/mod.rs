//! Tron integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request (private key, receiver, amounts)
//!     → wallet.rs (key → public key → address)
//!     → abi.rs (selector + 32-byte words)
//!     → contract.rs (ask the node for a template)
//!         → client.rs (TronTransport, HTTP with deadlines)
//!     → transaction.rs (fee limit, timestamp, sign every clause)
//!     → contract.rs (broadcast)
//! ```
//!
//! # Security Constraints
//! - Private keys arrive per request and are dropped when the call returns
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - No retries: a failed remote call fails the operation

pub mod abi;
pub mod address;
pub mod client;
pub mod contract;
pub mod proto;
pub mod transaction;
pub mod types;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub use address::Address;
pub use client::{HttpTransport, TronTransport};
pub use contract::{ContractCaller, TriggeredCall};
pub use types::{BlockchainError, BlockchainResult, ErrorKind, ResourceCode};
pub use wallet::Wallet;
