//! Protocol Buffers messages of the Tron transaction envelope.
//!
//! Hand-written `prost` definitions for the subset of `Tron.proto` the
//! signer touches. Every field of `Transaction.raw` is modeled so that a
//! decoded template re-encodes to the same bytes the node produced.

#![allow(missing_docs)]

use prost::Message;

/// `ContractType.TriggerSmartContract`.
pub const TRIGGER_SMART_CONTRACT: i32 = 31;

/// Type URL carried in `Contract.parameter` for smart-contract triggers.
pub const TRIGGER_SMART_CONTRACT_TYPE_URL: &str = "type.googleapis.com/protocol.TriggerSmartContract";

/// `google.protobuf.Any`.
#[derive(Clone, PartialEq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct AccountId {
    #[prost(bytes = "vec", tag = "1")]
    pub name: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub address: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Authority {
    #[prost(message, optional, tag = "1")]
    pub account: Option<AccountId>,
    #[prost(bytes = "vec", tag = "2")]
    pub permission_name: Vec<u8>,
}

/// One clause of a transaction.
#[derive(Clone, PartialEq, Message)]
pub struct Contract {
    /// `ContractType`, kept as the raw integer.
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub parameter: Option<Any>,
    #[prost(bytes = "vec", tag = "3")]
    pub provider: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub contract_name: Vec<u8>,
    #[prost(int32, tag = "5")]
    pub permission_id: i32,
}

/// `Transaction.raw`: the signed portion of a transaction.
#[derive(Clone, PartialEq, Message)]
pub struct TransactionRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub ref_block_bytes: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub ref_block_num: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub ref_block_hash: Vec<u8>,
    #[prost(int64, tag = "8")]
    pub expiration: i64,
    #[prost(message, repeated, tag = "9")]
    pub auths: Vec<Authority>,
    #[prost(bytes = "vec", tag = "10")]
    pub data: Vec<u8>,
    #[prost(message, repeated, tag = "11")]
    pub contract: Vec<Contract>,
    #[prost(bytes = "vec", tag = "12")]
    pub scripts: Vec<u8>,
    #[prost(int64, tag = "14")]
    pub timestamp: i64,
    #[prost(int64, tag = "18")]
    pub fee_limit: i64,
}

/// Raw data plus one signature per clause.
#[derive(Clone, PartialEq, Message)]
pub struct Transaction {
    #[prost(message, optional, tag = "1")]
    pub raw_data: Option<TransactionRaw>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub signature: Vec<Vec<u8>>,
}

/// Parameter of a `TriggerSmartContract` clause.
#[derive(Clone, PartialEq, Message)]
pub struct TriggerSmartContract {
    #[prost(bytes = "vec", tag = "1")]
    pub owner_address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub contract_address: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub call_value: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub data: Vec<u8>,
    #[prost(int64, tag = "5")]
    pub call_token_value: i64,
    #[prost(int64, tag = "6")]
    pub token_id: i64,
}

impl TriggerSmartContract {
    /// Wrap into a transaction clause.
    pub fn into_contract(self) -> Contract {
        Contract {
            r#type: TRIGGER_SMART_CONTRACT,
            parameter: Some(Any {
                type_url: TRIGGER_SMART_CONTRACT_TYPE_URL.to_string(),
                value: self.encode_to_vec(),
            }),
            ..Default::default()
        }
    }
}

impl Contract {
    /// Decode the parameter as a smart-contract trigger, if it is one.
    pub fn trigger(&self) -> Option<TriggerSmartContract> {
        if self.r#type != TRIGGER_SMART_CONTRACT {
            return None;
        }
        let parameter = self.parameter.as_ref()?;
        TriggerSmartContract::decode(parameter.value.as_slice()).ok()
    }
}
