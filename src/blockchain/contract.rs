//! Contract call orchestration: evaluate, sign, broadcast.

use alloy::primitives::U256;
use std::sync::Arc;

use crate::blockchain::address::Address;
use crate::blockchain::client::{ContractCall, TronTransport};
use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// A signed contract call together with the node's read-only results.
#[derive(Debug, Clone)]
pub struct TriggeredCall {
    pub transaction: SignedTransaction,
    pub tx_id: String,
    pub constant_result: Vec<Vec<u8>>,
}

impl TriggeredCall {
    /// First constant result as a big-endian unsigned integer.
    pub fn constant_word(&self) -> BlockchainResult<U256> {
        let first = self
            .constant_result
            .first()
            .ok_or_else(|| BlockchainError::Internal("empty constant result".to_string()))?;
        U256::try_from_be_slice(first).ok_or_else(|| {
            BlockchainError::Internal(format!("constant result too wide: {} bytes", first.len()))
        })
    }
}

fn method_label(data: &[u8]) -> String {
    data.get(..4)
        .map(|selector| format!("0x{}", hex::encode(selector)))
        .unwrap_or_else(|| "none".to_string())
}

/// Drives contract calls through a `TronTransport`.
#[derive(Clone)]
pub struct ContractCaller {
    transport: Arc<dyn TronTransport>,
    fee_limit_sun: i64,
}

impl ContractCaller {
    pub fn new(transport: Arc<dyn TronTransport>, fee_limit_sun: i64) -> Self {
        Self {
            transport,
            fee_limit_sun,
        }
    }

    pub fn transport(&self) -> &Arc<dyn TronTransport> {
        &self.transport
    }

    pub fn fee_limit_sun(&self) -> i64 {
        self.fee_limit_sun
    }

    /// Evaluate a call as the key's owner and sign the resulting template.
    ///
    /// # Arguments
    /// * `contract` - Target contract
    /// * `data` - ABI call data
    /// * `private_key_hex` - Caller key, used for this call only
    /// * `call_value` - Native value attached, in sun
    pub async fn trigger_constant_contract(
        &self,
        contract: &Address,
        data: Vec<u8>,
        private_key_hex: &str,
        call_value: i64,
    ) -> BlockchainResult<TriggeredCall> {
        let wallet = Wallet::from_private_key(private_key_hex)?;
        let method = method_label(&data);

        let call = ContractCall {
            owner: wallet.address(),
            contract: *contract,
            data,
            call_value,
        };

        let result = self.transport.trigger_constant_contract(&call).await.and_then(|response| {
            let unsigned = response
                .transaction
                .filter(|tx| tx.clause_count() > 0)
                .ok_or_else(|| BlockchainError::InvalidParam("invalid transaction".to_string()))?;

            let signed = unsigned
                .with_fee_limit(self.fee_limit_sun)
                .stamp_now()
                .sign(&wallet)?;

            Ok(TriggeredCall {
                tx_id: signed.tx_id(),
                transaction: signed,
                constant_result: response.constant_result,
            })
        });

        match &result {
            Ok(triggered) => {
                metrics::record_contract_call(&method, "ok");
                tracing::debug!(
                    method = %method,
                    owner = %call.owner,
                    tx_id = %triggered.tx_id,
                    call_value = call_value,
                    "Contract call signed"
                );
            }
            Err(e) => {
                metrics::record_contract_call(&method, "error");
                tracing::debug!(method = %method, error = %e, "Contract call failed");
            }
        }

        result
    }

    /// Submit a signed transaction.
    ///
    /// # Returns
    /// `true` when accepted; a rejection is `Unavailable` with the node's reason.
    pub async fn broadcast_transaction(&self, transaction: &SignedTransaction) -> BlockchainResult<bool> {
        let reply = self.transport.broadcast_transaction(transaction).await?;
        metrics::record_broadcast(reply.result);

        if !reply.result {
            tracing::warn!(
                tx_id = %transaction.tx_id(),
                code = %reply.code,
                message = %reply.message,
                "Broadcast rejected"
            );
            return Err(BlockchainError::Unavailable(format!("{}: {}", reply.code, reply.message)));
        }

        tracing::info!(tx_id = %transaction.tx_id(), "Transaction broadcast");
        Ok(true)
    }
}

impl std::fmt::Debug for ContractCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractCaller")
            .field("fee_limit_sun", &self.fee_limit_sun)
            .finish_non_exhaustive()
    }
}
