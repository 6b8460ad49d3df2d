//! Tron full-node transport with timeout and error handling.
//!
//! # Responsibilities
//! - Define the `TronTransport` boundary used by the rest of the crate
//! - Talk to a full node's HTTP wallet API
//! - Bound every call with the configured deadline
//! - Translate node-side failures into `BlockchainError`

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::address::Address;
use crate::blockchain::transaction::{SignedTransaction, UnsignedTransaction};
use crate::blockchain::types::{AccountResource, BlockchainError, BlockchainResult, TronConfig};

/// Header carrying the optional API key.
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// A contract invocation to be evaluated by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub owner: Address,
    pub contract: Address,
    pub data: Vec<u8>,
    /// Native value attached to the call, in sun.
    pub call_value: i64,
}

/// Result of evaluating a call without committing it.
#[derive(Debug, Clone, Default)]
pub struct ConstantCallResponse {
    /// Transaction template, when the node produced one.
    pub transaction: Option<UnsignedTransaction>,
    /// Raw return data, one entry per result.
    pub constant_result: Vec<Vec<u8>>,
}

/// Node reply to a broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReply {
    pub result: bool,
    pub code: String,
    pub message: String,
}

/// Remote calls the rental flows depend on.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait TronTransport: Send + Sync {
    /// Evaluate a contract call and return a transaction template.
    async fn trigger_constant_contract(&self, call: &ContractCall) -> BlockchainResult<ConstantCallResponse>;

    /// Submit a signed transaction.
    async fn broadcast_transaction(&self, transaction: &SignedTransaction) -> BlockchainResult<BroadcastReply>;

    /// Network-wide energy figures as seen from an account.
    async fn get_account_resource(&self, address: &Address) -> BlockchainResult<AccountResource>;
}

#[derive(Serialize)]
struct TriggerRequest {
    owner_address: String,
    contract_address: String,
    data: String,
    call_value: i64,
    visible: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ReturnStatus {
    #[serde(default)]
    result: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct WireTransaction {
    #[serde(default)]
    raw_data_hex: String,
}

#[derive(Deserialize)]
struct TriggerResponse {
    #[serde(default)]
    result: ReturnStatus,
    #[serde(default)]
    constant_result: Vec<String>,
    #[serde(default)]
    transaction: Option<WireTransaction>,
}

#[derive(Serialize)]
struct BroadcastRequest {
    transaction: String,
}

#[derive(Deserialize)]
struct BroadcastResponse {
    #[serde(default)]
    result: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct AccountRequest {
    address: String,
    visible: bool,
}

#[derive(Deserialize)]
struct AccountResourceResponse {
    #[serde(rename = "TotalEnergyLimit", default)]
    total_energy_limit: i64,
    #[serde(rename = "TotalEnergyWeight", default)]
    total_energy_weight: i64,
}

/// Node messages are hex-encoded UTF-8; fall back to the raw text.
pub(crate) fn decode_node_message(message: &str) -> String {
    hex::decode(message)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| message.to_string())
}

/// `TronTransport` over the full node's HTTP wallet API.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: url::Url,
    config: TronConfig,
    timeout_duration: Duration,
}

impl HttpTransport {
    /// Create a new transport.
    ///
    /// No request is made until the first call.
    pub fn new(config: TronConfig) -> BlockchainResult<Self> {
        let mut base_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        // Keep any path prefix when joining endpoint paths
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BlockchainError::Rpc(format!("HTTP client setup failed: {}", e)))?;

        tracing::info!(
            rpc_url = %config.rpc_url,
            timeout_secs = config.rpc_timeout_secs,
            api_key = config.api_key.is_some(),
            "Tron transport initialized"
        );

        Ok(Self {
            http,
            base_url,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &TronConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> BlockchainResult<url::Url> {
        self.base_url
            .join(path)
            .map_err(|e| BlockchainError::Rpc(format!("Invalid endpoint '{}': {}", path, e)))
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> BlockchainResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let mut request = self.http.post(url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let call = async {
            let response = request.send().await.map_err(|e| BlockchainError::Rpc(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(BlockchainError::Rpc(format!("{} returned HTTP {}", path, status)));
            }
            response
                .json::<Resp>()
                .await
                .map_err(|e| BlockchainError::Rpc(format!("{}: malformed response: {}", path, e)))
        };

        match timeout(self.timeout_duration, call).await {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::warn!(path = path, error = %e, "RPC error");
                }
                result
            }
            Err(_) => {
                tracing::warn!(path = path, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }
}

#[async_trait]
impl TronTransport for HttpTransport {
    async fn trigger_constant_contract(&self, call: &ContractCall) -> BlockchainResult<ConstantCallResponse> {
        let body = TriggerRequest {
            owner_address: call.owner.to_hex(),
            contract_address: call.contract.to_hex(),
            data: hex::encode(&call.data),
            call_value: call.call_value,
            visible: false,
        };
        let response: TriggerResponse = self.post("wallet/triggerconstantcontract", &body).await?;

        if !response.result.result {
            return Err(BlockchainError::Rpc(format!(
                "{}: {}",
                response.result.code.as_deref().unwrap_or("UNKNOWN"),
                decode_node_message(response.result.message.as_deref().unwrap_or_default())
            )));
        }

        let transaction = match response.transaction {
            Some(tx) if !tx.raw_data_hex.is_empty() => {
                Some(UnsignedTransaction::from_raw_hex(&tx.raw_data_hex)?)
            }
            _ => None,
        };

        let constant_result = response
            .constant_result
            .iter()
            .map(|word| hex::decode(word))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BlockchainError::Rpc(format!("malformed constant result: {}", e)))?;

        Ok(ConstantCallResponse {
            transaction,
            constant_result,
        })
    }

    async fn broadcast_transaction(&self, transaction: &SignedTransaction) -> BlockchainResult<BroadcastReply> {
        let body = BroadcastRequest {
            transaction: transaction.encode_hex(),
        };
        let response: BroadcastResponse = self.post("wallet/broadcasthex", &body).await?;

        Ok(BroadcastReply {
            result: response.result,
            code: response.code.unwrap_or_default(),
            message: decode_node_message(&response.message.unwrap_or_default()),
        })
    }

    async fn get_account_resource(&self, address: &Address) -> BlockchainResult<AccountResource> {
        let body = AccountRequest {
            address: address.to_hex(),
            visible: false,
        };
        let response: AccountResourceResponse = self.post("wallet/getaccountresource", &body).await?;

        Ok(AccountResource {
            total_energy_weight: response.total_energy_weight,
            total_energy_limit: response.total_energy_limit,
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("rpc_url", &self.config.rpc_url)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .field("api_key", &self.config.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
