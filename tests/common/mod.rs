//! Shared utilities for integration testing.
//!
//! `MockNode` answers the three full-node wallet endpoints the service
//! uses, with fixed contract getter values and a programmable broadcast
//! outcome.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use prost::Message;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use tron_rental::blockchain::abi::{
    FEE_RATIO_SELECTOR, LIQUIDATE_THRESHOLD_SELECTOR, MIN_FEE_SELECTOR, RENTAL_RATE_SELECTOR,
};
use tron_rental::blockchain::proto::{TransactionRaw, TriggerSmartContract};
use tron_rental::config::ServiceConfig;
use tron_rental::{blockchain::HttpTransport, HttpServer, RentalService};

pub const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const OWNER: &str = "TYBNgWfhGuNzdLtjKtxXTfskAhTbMcqbaG";
pub const RECEIVER: &str = "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL";

#[derive(Default)]
pub struct NodeState {
    words: HashMap<String, u128>,
    reject: Option<(String, String)>,
    delay: Option<Duration>,
    pub triggers: Mutex<Vec<Value>>,
    pub broadcasts: Mutex<Vec<String>>,
    pub api_keys: Mutex<Vec<Option<String>>>,
}

pub struct MockNode {
    pub addr: SocketAddr,
    pub state: Arc<NodeState>,
}

impl MockNode {
    /// Node with a 1:1 energy pool and the standard fee getters.
    pub async fn start() -> Self {
        Self::start_with(None, None).await
    }

    /// Node that holds every contract call for `delay`.
    pub async fn slow(delay: Duration) -> Self {
        Self::start_with(None, Some(delay)).await
    }

    /// Node that rejects every broadcast with `code` and a hex-encoded `message`.
    pub async fn rejecting(code: &str, message: &str) -> Self {
        Self::start_with(Some((code.to_string(), hex::encode(message))), None).await
    }

    async fn start_with(reject: Option<(String, String)>, delay: Option<Duration>) -> Self {
        let words = [
            (LIQUIDATE_THRESHOLD_SELECTOR, 5_000_000u128),
            (RENTAL_RATE_SELECTOR, 100_000_000_000_000),
            (MIN_FEE_SELECTOR, 10_000_000),
            (FEE_RATIO_SELECTOR, 20_000_000_000_000),
        ]
        .into_iter()
        .map(|(selector, value)| (selector.trim_start_matches("0x").to_string(), value))
        .collect();

        let state = Arc::new(NodeState {
            words,
            reject,
            delay,
            ..Default::default()
        });

        let app = Router::new()
            .route("/wallet/triggerconstantcontract", post(trigger))
            .route("/wallet/broadcasthex", post(broadcast))
            .route("/wallet/getaccountresource", post(account_resource))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn triggers(&self) -> Vec<Value> {
        self.state.triggers.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<String> {
        self.state.broadcasts.lock().unwrap().clone()
    }

    pub fn api_keys(&self) -> Vec<Option<String>> {
        self.state.api_keys.lock().unwrap().clone()
    }
}

fn record_key(state: &NodeState, headers: &HeaderMap) {
    let key = headers
        .get("TRON-PRO-API-KEY")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.api_keys.lock().unwrap().push(key);
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

async fn trigger(State(state): State<Arc<NodeState>>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record_key(&state, &headers);
    state.triggers.lock().unwrap().push(body.clone());
    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let data = field(&body, "data");
    let constant_result: Vec<String> = state
        .words
        .get(data.get(..8).unwrap_or_default())
        .map(|value| vec![format!("{:064x}", value)])
        .unwrap_or_default();

    let clause = TriggerSmartContract {
        owner_address: hex::decode(field(&body, "owner_address")).unwrap_or_default(),
        contract_address: hex::decode(field(&body, "contract_address")).unwrap_or_default(),
        call_value: body.get("call_value").and_then(Value::as_i64).unwrap_or_default(),
        data: hex::decode(data).unwrap_or_default(),
        ..Default::default()
    }
    .into_contract();
    let raw = TransactionRaw {
        ref_block_bytes: vec![0x5a, 0x3c],
        ref_block_hash: vec![0x11; 8],
        expiration: 1_700_000_060_000,
        contract: vec![clause],
        ..Default::default()
    };

    Json(json!({
        "result": {"result": true},
        "constant_result": constant_result,
        "transaction": {"raw_data_hex": hex::encode(raw.encode_to_vec())},
    }))
}

async fn broadcast(State(state): State<Arc<NodeState>>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record_key(&state, &headers);
    state
        .broadcasts
        .lock()
        .unwrap()
        .push(field(&body, "transaction").to_string());

    match &state.reject {
        Some((code, message)) => Json(json!({"result": false, "code": code, "message": message})),
        None => Json(json!({"result": true})),
    }
}

async fn account_resource(State(state): State<Arc<NodeState>>, headers: HeaderMap) -> Json<Value> {
    record_key(&state, &headers);
    Json(json!({"TotalEnergyLimit": 1000, "TotalEnergyWeight": 1000}))
}

/// Rental service config pointed at `rpc_url`.
pub fn service_config(rpc_url: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.tron.rpc_url = rpc_url.to_string();
    config.tron.rpc_timeout_secs = 2;
    config
}

/// Serve the rental API on a free local port. Returns its base URL.
pub async fn start_service(config: ServiceConfig) -> String {
    let transport = Arc::new(HttpTransport::new(config.tron.clone()).unwrap());
    let service = RentalService::new(transport, &config.rental).unwrap();
    let router = HttpServer::new(config, service).router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}
