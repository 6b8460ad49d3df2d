//! Rental request and receipt types.

use serde::{Deserialize, Serialize};

use crate::blockchain::address::is_valid_address;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ResourceCode};

/// Length of a hex private key without prefix.
pub const PRIVATE_KEY_HEX_LEN: usize = 64;

fn check_private_key(private_key: &str) -> BlockchainResult<()> {
    if private_key.len() != PRIVATE_KEY_HEX_LEN {
        return Err(BlockchainError::InvalidParam(format!(
            "private key must be {} hex characters",
            PRIVATE_KEY_HEX_LEN
        )));
    }
    Ok(())
}

fn check_receiver(receive: &str) -> BlockchainResult<()> {
    if !is_valid_address(receive) {
        return Err(BlockchainError::InvalidParam(format!("invalid receiver address '{}'", receive)));
    }
    Ok(())
}

fn check_positive(field: &str, value: i64) -> BlockchainResult<()> {
    if value <= 0 {
        return Err(BlockchainError::InvalidParam(format!("{} must be positive", field)));
    }
    Ok(())
}

/// Fee quote request.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRatioRequest {
    /// Resource amount to quote for.
    pub energy: i64,
    pub private_key: String,
    #[serde(rename = "type")]
    pub resource: ResourceCode,
}

impl FeeRatioRequest {
    pub fn validate(&self) -> BlockchainResult<()> {
        check_positive("energy", self.energy)?;
        check_private_key(&self.private_key)
    }
}

/// Rent `amount` of a resource for `receive`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentResourceRequest {
    pub receive: String,
    #[serde(rename = "type")]
    pub resource: ResourceCode,
    pub amount: i64,
    pub private_key: String,
}

impl RentResourceRequest {
    pub fn validate(&self) -> BlockchainResult<()> {
        check_receiver(&self.receive)?;
        check_positive("amount", self.amount)?;
        check_private_key(&self.private_key)
    }
}

/// Return a previously rented stake.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResourceRequest {
    pub receive: String,
    #[serde(rename = "type")]
    pub resource: ResourceCode,
    /// Stake to return, in sun.
    pub stake_per_trx: i64,
    pub private_key: String,
}

impl ReturnResourceRequest {
    pub fn validate(&self) -> BlockchainResult<()> {
        check_receiver(&self.receive)?;
        check_positive("stakePerTrx", self.stake_per_trx)?;
        check_private_key(&self.private_key)
    }
}

macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("private_key", &"<redacted>")
                    .finish()
            }
        }
    };
}

redacted_debug!(FeeRatioRequest { energy, resource });
redacted_debug!(RentResourceRequest { receive, resource, amount });
redacted_debug!(ReturnResourceRequest { receive, resource, stake_per_trx });

/// Outcome of a rent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentReceipt {
    pub tx_id: String,
    /// Stake locked, in sun.
    pub stake_per_trx: i64,
}

/// Outcome of a return call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceipt {
    pub tx_id: String,
}
