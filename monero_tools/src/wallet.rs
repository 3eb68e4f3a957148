use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    config::WalletRpcConfig,
    data_objects::{AddressIndexResponse, CreatedAddress, HeightResponse, IncomingTransfer, SubaddressIndex, TransfersResponse},
    WalletRpcError,
};

/// Wallet RPC error code for an address the wallet does not own.
const RPC_ERR_ADDRESS_NOT_FOUND: i64 = -2;

/// JSON-RPC 2.0 client for `monero-wallet-rpc`.
#[derive(Clone)]
pub struct WalletClient {
    config: WalletRpcConfig,
    client: Arc<Client>,
}

impl WalletClient {
    pub fn new(config: WalletRpcConfig) -> Result<Self, WalletRpcError> {
        let client = Client::builder().build().map_err(|e| WalletRpcError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self) -> String {
        format!("{}/json_rpc", self.config.base_url)
    }

    pub async fn rpc_call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, WalletRpcError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "0",
            "method": method,
            "params": params,
        });
        trace!("Sending wallet RPC call: {method}");
        let mut req = self.client.post(self.url()).json(&body);
        if let Some(user) = &self.config.username {
            req = req.basic_auth(user, Some(self.config.password.reveal()));
        }
        let response = req.send().await.map_err(|e| WalletRpcError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WalletRpcError::RequestError(format!("wallet RPC returned HTTP {}", response.status())));
        }
        let envelope: Value = response.json().await.map_err(|e| WalletRpcError::JsonError(e.to_string()))?;
        parse_rpc_envelope(envelope)
    }

    /// Request one fresh, never-before-returned subaddress.
    pub async fn create_address(&self) -> Result<CreatedAddress, WalletRpcError> {
        info!("Creating subaddress...");
        let created: CreatedAddress = self.rpc_call("create_address", json!({ "account_index": 0 })).await?;
        info!("Created subaddress {} (index {})", created.address, created.address_index);
        Ok(created)
    }

    /// Resolve the subaddress index for `address`. The wallet answers with an error for any
    /// address it never issued, which is how unknown addresses are detected.
    pub async fn address_index(&self, address: &str) -> Result<SubaddressIndex, WalletRpcError> {
        let response: AddressIndexResponse =
            self.rpc_call("get_address_index", json!({ "address": address })).await.map_err(|e| match e {
                WalletRpcError::RpcError { code, .. } if code == RPC_ERR_ADDRESS_NOT_FOUND => {
                    warn!("Address does not exist: {address}");
                    WalletRpcError::AddressNotFound(address.to_string())
                },
                other => other,
            })?;
        Ok(response.index)
    }

    /// Confirmed incoming transfers to `address`, no deeper in the chain than `max_height`,
    /// oldest first.
    pub async fn incoming_transfers(
        &self,
        address: &str,
        max_height: u64,
    ) -> Result<Vec<IncomingTransfer>, WalletRpcError> {
        let index = self.address_index(address).await?;
        let params = json!({
            "in": true,
            "filter_by_height": true,
            "min_height": 0,
            "max_height": max_height,
            "account_index": index.major,
            "subaddr_indices": [index.minor],
        });
        let response: TransfersResponse = self.rpc_call("get_transfers", params).await?;
        let mut transfers: Vec<IncomingTransfer> =
            response.incoming.into_iter().filter(|t| t.address == address && t.height <= max_height).collect();
        transfers.sort_by_key(|t| t.height);
        debug!("Fetched {} confirmed transfers for {address} up to height {max_height}", transfers.len());
        Ok(transfers)
    }

    pub async fn get_height(&self) -> Result<u64, WalletRpcError> {
        let response: HeightResponse = self.rpc_call("get_height", json!({})).await?;
        Ok(response.height)
    }
}

fn parse_rpc_envelope<T: DeserializeOwned>(envelope: Value) -> Result<T, WalletRpcError> {
    if let Some(error) = envelope.get("error") {
        let code = error["code"].as_i64().unwrap_or_default();
        let message = error["message"].as_str().unwrap_or("unknown error").to_string();
        return Err(WalletRpcError::RpcError { code, message });
    }
    let result = envelope
        .get("result")
        .cloned()
        .ok_or_else(|| WalletRpcError::JsonError("response contains neither result nor error".to_string()))?;
    serde_json::from_value(result).map_err(|e| WalletRpcError::JsonError(e.to_string()))
}
