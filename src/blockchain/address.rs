//! Tron address handling (Base58Check, hex, validation, serde).
//!
//! An address is 21 bytes: the `0x41` network prefix followed by the 20-byte
//! account id. The human-facing form is Base58Check over those 21 bytes plus
//! a 4-byte double-SHA-256 checksum.

use alloy::primitives::U256;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

pub const ADDRESS_PREFIX: u8 = 0x41;
pub const ADDRESS_BASE58_PREFIX: char = 'T';
pub const ADDRESS_BYTES_LEN: usize = 21;
pub const ADDRESS_BASE58_LEN: usize = 34;
pub const ADDRESS_HEX_LEN: usize = 42;
/// Standard Base64 of the 21 address bytes.
pub const ADDRESS_BASE64_LEN: usize = 28;
pub const ACCOUNT_ID_LEN: usize = 20;
const CHECKSUM_LEN: usize = 4;

/// First four bytes of SHA-256(SHA-256(payload)).
fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&second[..CHECKSUM_LEN]);
    out
}

/// Base58-encode `input` with a trailing 4-byte checksum.
pub fn encode_check(input: &[u8]) -> String {
    let mut data = Vec::with_capacity(input.len() + CHECKSUM_LEN);
    data.extend_from_slice(input);
    data.extend_from_slice(&checksum(input));
    bs58::encode(data).into_string()
}

/// Decode a Base58Check address into its 21 raw bytes.
///
/// Rejects malformed Base58, any decoded length other than 25 bytes, a
/// prefix other than `0x41`, and checksum mismatches.
pub fn decode_check(input: &str) -> BlockchainResult<[u8; ADDRESS_BYTES_LEN]> {
    let decoded = bs58::decode(input)
        .into_vec()
        .map_err(|e| BlockchainError::InvalidParam(format!("invalid base58 address: {}", e)))?;

    if decoded.len() != ADDRESS_BYTES_LEN + CHECKSUM_LEN {
        tracing::debug!(length = decoded.len(), "Invalid decoded address length");
        return Err(BlockchainError::InvalidParam(format!(
            "invalid address length: {}",
            decoded.len()
        )));
    }

    if decoded[0] != ADDRESS_PREFIX {
        tracing::debug!(prefix = decoded[0], "Invalid address prefix");
        return Err(BlockchainError::InvalidParam(format!(
            "invalid address prefix: 0x{:02x}",
            decoded[0]
        )));
    }

    let (payload, check) = decoded.split_at(ADDRESS_BYTES_LEN);
    if checksum(payload)[..] != *check {
        tracing::debug!("Base58 checksum mismatch");
        return Err(BlockchainError::InvalidParam("address checksum mismatch".to_string()));
    }

    let mut out = [0u8; ADDRESS_BYTES_LEN];
    out.copy_from_slice(payload);
    Ok(out)
}

/// Cheap textual pre-check followed by a full checksum verification.
pub fn is_valid_address(addr: &str) -> bool {
    if addr.len() != ADDRESS_BASE58_LEN || !addr.starts_with(ADDRESS_BASE58_PREFIX) {
        return false;
    }
    decode_check(addr).is_ok()
}

/// Tron account address (21 bytes, normally `0x41` + 20-byte account id).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    inner: [u8; ADDRESS_BYTES_LEN],
}

impl Address {
    /// Wrap raw bytes as-is. A zero prefix marks a placeholder address.
    pub fn from_bytes(bytes: [u8; ADDRESS_BYTES_LEN]) -> Self {
        Self { inner: bytes }
    }

    /// Build a mainnet address from a 20-byte account id.
    pub fn from_account_id(id: [u8; ACCOUNT_ID_LEN]) -> Self {
        let mut inner = [0u8; ADDRESS_BYTES_LEN];
        inner[0] = ADDRESS_PREFIX;
        inner[1..].copy_from_slice(&id);
        Self { inner }
    }

    /// Parse the checksummed Base58 form.
    pub fn from_base58(s: &str) -> BlockchainResult<Self> {
        decode_check(s).map(Self::from_bytes)
    }

    /// Parse the hex form, with or without `0x`.
    pub fn from_hex(s: &str) -> BlockchainResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let data = hex::decode(s)
            .map_err(|e| BlockchainError::InvalidParam(format!("invalid hex address: {}", e)))?;
        Self::from_slice(&data)
    }

    /// Parse the standard Base64 form of the raw bytes.
    pub fn from_base64(s: &str) -> BlockchainResult<Self> {
        let data = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| BlockchainError::InvalidParam(format!("invalid base64 address: {}", e)))?;
        Self::from_slice(&data)
    }

    fn from_slice(data: &[u8]) -> BlockchainResult<Self> {
        let inner: [u8; ADDRESS_BYTES_LEN] = data.try_into().map_err(|_| {
            BlockchainError::InvalidParam(format!(
                "invalid address: expected {} bytes, got {}",
                ADDRESS_BYTES_LEN,
                data.len()
            ))
        })?;
        Ok(Self { inner })
    }

    /// Base58Check form.
    pub fn to_base58(&self) -> String {
        encode_check(&self.inner)
    }

    /// Lowercase hex of all 21 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner)
    }

    /// All 21 bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES_LEN] {
        &self.inner
    }

    /// The 20-byte account id, as used in ABI `address` words.
    pub fn account_id(&self) -> &[u8] {
        &self.inner[1..]
    }

    /// Whether the prefix byte is zero (placeholder address).
    pub fn is_placeholder(&self) -> bool {
        self.inner[0] == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_placeholder() {
            write!(f, "{}", U256::from_be_slice(&self.inner))
        } else {
            f.write_str(&self.to_base58())
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({} / 0x{})", self, self.to_hex())
    }
}

impl FromStr for Address {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == ADDRESS_BASE58_LEN && s.starts_with(ADDRESS_BASE58_PREFIX) {
            return Self::from_base58(s);
        }

        let prefix = format!("{:x}", ADDRESS_PREFIX);
        if (s.len() == ADDRESS_HEX_LEN && s.starts_with(&prefix))
            || (s.len() == ADDRESS_HEX_LEN + 2 && s.starts_with(&format!("0x{}", prefix)))
        {
            return Self::from_hex(s);
        }

        if s.len() == ADDRESS_BASE64_LEN {
            let addr = Self::from_base64(s)?;
            if addr.inner[0] == ADDRESS_PREFIX {
                return Ok(addr);
            }
        }

        Err(BlockchainError::InvalidParam(format!(
            "invalid Tron address '{}': expected Base58 (34 chars starting with 'T'), hex (42 chars starting with '41') or Base64 (28 chars)",
            s
        )))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}
