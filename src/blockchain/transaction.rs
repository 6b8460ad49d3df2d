//! Transaction stamping and signing.
//!
//! # Data Flow
//! ```text
//! raw_data_hex from the node
//!     → UnsignedTransaction (decoded template, fee limit applied)
//!     → StampedTransaction  (timestamp fixed, digest defined)
//!     → SignedTransaction   (one signature per clause, ready to broadcast)
//! ```
//!
//! Each stage is an immutable value; moving to the next stage consumes the
//! previous one.

use alloy::primitives::B256;
use prost::Message;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blockchain::proto::{Transaction, TransactionRaw};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::{Wallet, SIGNATURE_LEN};

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Transaction template as returned by the node.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransaction {
    raw: TransactionRaw,
}

impl UnsignedTransaction {
    pub fn new(raw: TransactionRaw) -> Self {
        Self { raw }
    }

    /// Decode a `Transaction.raw` from its protobuf bytes.
    pub fn from_raw_bytes(bytes: &[u8]) -> BlockchainResult<Self> {
        let raw = TransactionRaw::decode(bytes)
            .map_err(|e| BlockchainError::InvalidParam(format!("invalid transaction: {}", e)))?;
        Ok(Self { raw })
    }

    /// Decode a `Transaction.raw` from hex (`raw_data_hex`).
    pub fn from_raw_hex(raw_hex: &str) -> BlockchainResult<Self> {
        let bytes = hex::decode(raw_hex.strip_prefix("0x").unwrap_or(raw_hex))
            .map_err(|e| BlockchainError::InvalidParam(format!("invalid transaction: {}", e)))?;
        Self::from_raw_bytes(&bytes)
    }

    pub fn raw(&self) -> &TransactionRaw {
        &self.raw
    }

    /// Number of clauses; each needs its own signature.
    pub fn clause_count(&self) -> usize {
        self.raw.contract.len()
    }

    /// Set the maximum fee, in sun, the transaction may burn.
    pub fn with_fee_limit(mut self, fee_limit_sun: i64) -> Self {
        self.raw.fee_limit = fee_limit_sun;
        self
    }

    /// Fix the timestamp (milliseconds since the epoch).
    pub fn stamp(mut self, timestamp_ms: i64) -> StampedTransaction {
        self.raw.timestamp = timestamp_ms;
        StampedTransaction { raw: self.raw }
    }

    /// Stamp with the current wall-clock time.
    pub fn stamp_now(self) -> StampedTransaction {
        self.stamp(now_millis())
    }
}

/// Transaction whose signed bytes are final.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedTransaction {
    raw: TransactionRaw,
}

impl StampedTransaction {
    pub fn raw(&self) -> &TransactionRaw {
        &self.raw
    }

    pub fn timestamp(&self) -> i64 {
        self.raw.timestamp
    }

    /// SHA-256 over the encoded raw data. Doubles as the transaction id.
    pub fn digest(&self) -> B256 {
        B256::from_slice(&Sha256::digest(self.raw.encode_to_vec()))
    }

    /// Sign every clause with the same key over the same digest.
    pub fn sign(self, wallet: &Wallet) -> BlockchainResult<SignedTransaction> {
        if self.raw.contract.is_empty() {
            return Err(BlockchainError::InvalidParam("invalid transaction".to_string()));
        }

        let digest = self.digest();
        let signatures = self
            .raw
            .contract
            .iter()
            .map(|_| wallet.sign_digest(&digest))
            .collect::<BlockchainResult<Vec<_>>>()?;

        tracing::debug!(
            tx_id = %hex::encode(digest),
            clauses = signatures.len(),
            "Transaction signed"
        );

        Ok(SignedTransaction {
            raw: self.raw,
            signatures,
            digest,
        })
    }
}

/// Fully signed transaction.
///
/// Invariant: exactly one signature per clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    raw: TransactionRaw,
    signatures: Vec<[u8; SIGNATURE_LEN]>,
    digest: B256,
}

impl SignedTransaction {
    pub fn raw(&self) -> &TransactionRaw {
        &self.raw
    }

    pub fn signatures(&self) -> &[[u8; SIGNATURE_LEN]] {
        &self.signatures
    }

    pub fn digest(&self) -> B256 {
        self.digest
    }

    /// Lowercase hex transaction id.
    pub fn tx_id(&self) -> String {
        hex::encode(self.digest)
    }

    pub fn to_proto(&self) -> Transaction {
        Transaction {
            raw_data: Some(self.raw.clone()),
            signature: self.signatures.iter().map(|s| s.to_vec()).collect(),
        }
    }

    /// Protobuf bytes for broadcast.
    pub fn encode(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    pub fn encode_hex(&self) -> String {
        hex::encode(self.encode())
    }
}

/// Stamp with the current time and sign.
///
/// # Returns
/// The hex digest and the signed transaction.
pub fn sign(
    unsigned: UnsignedTransaction,
    private_key_hex: &str,
) -> BlockchainResult<(String, SignedTransaction)> {
    sign_at(unsigned, private_key_hex, now_millis())
}

/// Stamp with a caller-supplied timestamp and sign.
pub fn sign_at(
    unsigned: UnsignedTransaction,
    private_key_hex: &str,
    timestamp_ms: i64,
) -> BlockchainResult<(String, SignedTransaction)> {
    let wallet = Wallet::from_private_key(private_key_hex)?;
    let signed = unsigned.stamp(timestamp_ms).sign(&wallet)?;
    Ok((signed.tx_id(), signed))
}
