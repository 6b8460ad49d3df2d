//! In-memory `TronTransport` for unit tests.

use alloy::primitives::U256;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::blockchain::abi::Selector;
use crate::blockchain::address::Address;
use crate::blockchain::client::{BroadcastReply, ConstantCallResponse, ContractCall, TronTransport};
use crate::blockchain::proto::{TransactionRaw, TriggerSmartContract};
use crate::blockchain::transaction::{SignedTransaction, UnsignedTransaction};
use crate::blockchain::types::{AccountResource, BlockchainError, BlockchainResult};

pub(crate) struct MockTransport {
    words: HashMap<Selector, Result<Vec<u8>, String>>,
    resource: Option<AccountResource>,
    reply: BroadcastReply,
    template: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<ContractCall>>,
    broadcasts: Mutex<Vec<SignedTransaction>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            words: HashMap::new(),
            resource: None,
            reply: BroadcastReply {
                result: true,
                ..Default::default()
            },
            template: true,
            delay: None,
            calls: Mutex::new(Vec::new()),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    /// Answer calls to `selector` with one 32-byte word.
    pub(crate) fn with_word(mut self, selector: &str, value: u128) -> Self {
        let word = U256::from(value).to_be_bytes::<32>().to_vec();
        self.words.insert(parse(selector), Ok(word));
        self
    }

    /// Answer calls to `selector` with raw bytes.
    pub(crate) fn with_raw(mut self, selector: &str, bytes: Vec<u8>) -> Self {
        self.words.insert(parse(selector), Ok(bytes));
        self
    }

    pub(crate) fn with_failure(mut self, selector: &str, message: &str) -> Self {
        self.words.insert(parse(selector), Err(message.to_string()));
        self
    }

    pub(crate) fn with_resource(mut self, total_energy_weight: i64, total_energy_limit: i64) -> Self {
        self.resource = Some(AccountResource {
            total_energy_weight,
            total_energy_limit,
        });
        self
    }

    pub(crate) fn rejecting_broadcast(mut self, code: &str, message: &str) -> Self {
        self.reply = BroadcastReply {
            result: false,
            code: code.to_string(),
            message: message.to_string(),
        };
        self
    }

    /// Hold every contract call for `delay` before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn without_template(mut self) -> Self {
        self.template = false;
        self
    }

    pub(crate) fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn broadcasts(&self) -> Vec<SignedTransaction> {
        self.broadcasts.lock().unwrap().clone()
    }
}

fn parse(selector: &str) -> Selector {
    Selector::from_hex(selector).unwrap()
}

#[async_trait]
impl TronTransport for MockTransport {
    async fn trigger_constant_contract(&self, call: &ContractCall) -> BlockchainResult<ConstantCallResponse> {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let selector = Selector::from_hex(&hex::encode(&call.data[..4.min(call.data.len())]))?;
        let constant_result = match self.words.get(&selector) {
            Some(Ok(word)) => vec![word.clone()],
            Some(Err(message)) => return Err(BlockchainError::Rpc(message.clone())),
            None => Vec::new(),
        };

        let transaction = self.template.then(|| {
            let clause = TriggerSmartContract {
                owner_address: call.owner.as_bytes().to_vec(),
                contract_address: call.contract.as_bytes().to_vec(),
                call_value: call.call_value,
                data: call.data.clone(),
                ..Default::default()
            }
            .into_contract();
            UnsignedTransaction::new(TransactionRaw {
                ref_block_bytes: vec![0x5a, 0x3c],
                ref_block_hash: vec![0x11; 8],
                expiration: 1_700_000_060_000,
                contract: vec![clause],
                ..Default::default()
            })
        });

        Ok(ConstantCallResponse {
            transaction,
            constant_result,
        })
    }

    async fn broadcast_transaction(&self, transaction: &SignedTransaction) -> BlockchainResult<BroadcastReply> {
        self.broadcasts.lock().unwrap().push(transaction.clone());
        Ok(self.reply.clone())
    }

    async fn get_account_resource(&self, _address: &Address) -> BlockchainResult<AccountResource> {
        self.resource
            .ok_or_else(|| BlockchainError::Rpc("account not found".to_string()))
    }
}
