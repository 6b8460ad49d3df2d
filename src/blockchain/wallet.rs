//! Key derivation and digest signing.
//!
//! # Security
//! - A `Wallet` lives for a single request and is dropped when it returns
//! - Keys are never logged or serialized
//! - `Debug` output carries the derived address only

use alloy::primitives::{keccak256, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::blockchain::address::{Address, ACCOUNT_ID_LEN};
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Length of an uncompressed SEC1 public key (0x04 ‖ X ‖ Y).
pub const PUBLIC_KEY_LEN: usize = 65;

/// Length of a recoverable signature (r ‖ s ‖ recovery id).
pub const SIGNATURE_LEN: usize = 65;

const PRIVATE_KEY_LEN: usize = 32;

fn parse_private_key(private_key_hex: &str) -> BlockchainResult<PrivateKeySigner> {
    // Strip 0x prefix if present
    let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

    let mut bytes = [0u8; PRIVATE_KEY_LEN];
    hex::decode_to_slice(key_hex, &mut bytes)
        .map_err(|e| BlockchainError::InvalidParam(format!("Invalid private key format: {}", e)))?;

    PrivateKeySigner::from_bytes(&B256::from(bytes))
        .map_err(|e| BlockchainError::InvalidParam(format!("Invalid private key scalar: {}", e)))
}

fn encode_public_key(signer: &PrivateKeySigner) -> [u8; PUBLIC_KEY_LEN] {
    let point = signer.credential().verifying_key().to_encoded_point(false);
    let mut out = [0u8; PUBLIC_KEY_LEN];
    out.copy_from_slice(point.as_bytes());
    out
}

/// Uncompressed secp256k1 public key for a hex-encoded private key.
pub fn public_key_from_private_key(private_key_hex: &str) -> BlockchainResult<[u8; PUBLIC_KEY_LEN]> {
    parse_private_key(private_key_hex).map(|signer| encode_public_key(&signer))
}

/// Tron address of an uncompressed public key.
///
/// Keccak-256 over X ‖ Y, keep the last 20 bytes, prepend `0x41`.
pub fn address_from_public_key(public_key: &[u8; PUBLIC_KEY_LEN]) -> Address {
    let hash = keccak256(&public_key[1..]);
    let mut id = [0u8; ACCOUNT_ID_LEN];
    id.copy_from_slice(&hash[hash.len() - ACCOUNT_ID_LEN..]);
    Address::from_account_id(id)
}

/// A parsed private key together with its Tron address.
pub struct Wallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - 64 hex characters (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let signer = parse_private_key(private_key_hex)?;
        let address = address_from_public_key(&encode_public_key(&signer));

        tracing::debug!(address = %address, "Wallet loaded");

        Ok(Self { signer, address })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Uncompressed public key.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LEN] {
        encode_public_key(&self.signer)
    }

    /// Sign a 32-byte digest.
    ///
    /// # Returns
    /// `r ‖ s ‖ v` with `v` the raw recovery id (0 or 1).
    pub fn sign_digest(&self, digest: &B256) -> BlockchainResult<[u8; SIGNATURE_LEN]> {
        let signature = self
            .signer
            .sign_hash_sync(digest)
            .map_err(|e| BlockchainError::Internal(format!("Signing failed: {}", e)))?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
        out[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
        out[64] = signature.v() as u8;
        Ok(out)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
