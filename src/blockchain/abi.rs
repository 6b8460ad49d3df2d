//! Minimal ABI call-data encoding for the rental pool contract.
//!
//! Only static 32-byte arguments are needed: addresses (20-byte body,
//! left-padded) and unsigned integers.

use alloy::primitives::{keccak256, U256};

use crate::blockchain::address::Address;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Length of a function selector.
pub const SELECTOR_LEN: usize = 4;

/// Length of one ABI word.
pub const WORD_LEN: usize = 32;

/// `_rentalRate(uint256,uint256)`
pub const RENTAL_RATE_SELECTOR: &str = "0x3193fada";
/// `rentResource(address,uint256,uint256)`
pub const RENT_RESOURCE_SELECTOR: &str = "0xfd8527a1";
/// `returnResource(address,uint256,uint256)`
pub const RETURN_RESOURCE_SELECTOR: &str = "0xaf6f4896";
/// `liquidateThreshold()`
pub const LIQUIDATE_THRESHOLD_SELECTOR: &str = "0xfdcb648c";
/// `minFee()`
pub const MIN_FEE_SELECTOR: &str = "0x24ec7590";
/// `feeRatio()`
pub const FEE_RATIO_SELECTOR: &str = "0x41744dd4";

/// 4-byte function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector([u8; SELECTOR_LEN]);

impl Selector {
    /// Parse a selector literal such as `0xfd8527a1`.
    pub fn from_hex(selector_hex: &str) -> BlockchainResult<Self> {
        let raw = selector_hex.strip_prefix("0x").unwrap_or(selector_hex);
        let mut bytes = [0u8; SELECTOR_LEN];
        hex::decode_to_slice(raw, &mut bytes).map_err(|e| {
            BlockchainError::InvalidParam(format!("invalid selector '{}': {}", selector_hex, e))
        })?;
        Ok(Self(bytes))
    }

    /// First four bytes of the Keccak-256 of a canonical signature.
    pub fn from_signature(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        let mut bytes = [0u8; SELECTOR_LEN];
        bytes.copy_from_slice(&hash[..SELECTOR_LEN]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SELECTOR_LEN] {
        &self.0
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A static call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiParam {
    Address(Address),
    Uint(U256),
}

impl AbiParam {
    /// Left-padded 32-byte encoding.
    pub fn to_word(&self) -> [u8; WORD_LEN] {
        match self {
            AbiParam::Address(address) => {
                let mut word = [0u8; WORD_LEN];
                let id = address.account_id();
                word[WORD_LEN - id.len()..].copy_from_slice(id);
                word
            }
            AbiParam::Uint(value) => value.to_be_bytes::<WORD_LEN>(),
        }
    }
}

impl From<Address> for AbiParam {
    fn from(address: Address) -> Self {
        AbiParam::Address(address)
    }
}

impl From<U256> for AbiParam {
    fn from(value: U256) -> Self {
        AbiParam::Uint(value)
    }
}

impl From<u64> for AbiParam {
    fn from(value: u64) -> Self {
        AbiParam::Uint(U256::from(value))
    }
}

impl TryFrom<i64> for AbiParam {
    type Error = BlockchainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(AbiParam::from)
            .map_err(|_| BlockchainError::InvalidParam(format!("negative uint argument {}", value)))
    }
}

/// Selector followed by one word per parameter, in order.
pub fn encode_with_selector(selector: Selector, params: &[AbiParam]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SELECTOR_LEN + params.len() * WORD_LEN);
    out.extend_from_slice(selector.as_bytes());
    for param in params {
        out.extend_from_slice(&param.to_word());
    }
    out
}

/// Encode a call from a selector literal.
pub fn encode_call(selector_hex: &str, params: &[AbiParam]) -> BlockchainResult<Vec<u8>> {
    let selector = Selector::from_hex(selector_hex)?;
    Ok(encode_with_selector(selector, params))
}
