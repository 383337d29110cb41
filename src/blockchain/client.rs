// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TronGrid HTTP client.
//!
//! Implements [`LedgerClient`] against the full-node `/wallet/*` HTTP API.
//! Every request asks for `visible: true`, so addresses come back in base58.

use std::time::Duration;

use alloy::primitives::U256;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::address::Address;
use super::ledger::{
    BroadcastResult, ContractCall, LedgerClient, LedgerError, LedgerTransaction, TransactionInfo,
};
use super::types::NetworkConfig;

/// Header carrying the TronGrid API key.
const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// TRON full-node client.
#[derive(Debug, Clone)]
pub struct TronClient {
    /// Network configuration
    network: NetworkConfig,
    /// Validated full-node base URL, without trailing slash
    base_url: String,
    /// Validated event server base URL, without trailing slash
    event_url: String,
    http: Client,
}

impl TronClient {
    /// Create a new client for the specified network.
    pub fn new(network: NetworkConfig) -> Result<Self, LedgerError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| LedgerError::Transport(format!("Invalid RPC URL: {e}")))?;
        let event_url: url::Url = network.event_url.parse().map_err(|e: url::ParseError| {
            LedgerError::Transport(format!("Invalid event URL: {e}"))
        })?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            event_url: event_url.as_str().trim_end_matches('/').to_string(),
            network,
            http,
        })
    }

    /// Create a client for the Nile testnet.
    pub fn nile() -> Result<Self, LedgerError> {
        Self::new(NetworkConfig::nile())
    }

    /// Create a client for mainnet.
    pub fn mainnet() -> Result<Self, LedgerError> {
        Self::new(NetworkConfig::mainnet())
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Whether the full node answers a head-block query.
    pub async fn check_connection(&self) -> bool {
        match self.get_block_number().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(url = %self.base_url, error = %e, "TRON node is not reachable");
                false
            }
        }
    }

    /// Whether the event server answers its status page.
    pub async fn check_event_connection(&self) -> bool {
        let mut request = self.http.get(format!("{}/", self.event_url));
        if let Some(key) = &self.network.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    url = %self.event_url,
                    status = %response.status(),
                    "TRON event server is not healthy"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    url = %self.event_url,
                    error = %e,
                    "TRON event server is not reachable"
                );
                false
            }
        }
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, LedgerError> {
        tracing::debug!(path, "TronGrid request");

        let mut request = self.http.post(format!("{}{}", self.base_url, path)).json(body);
        if let Some(key) = &self.network.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LedgerError::Transport(format!("POST {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Transport(format!(
                "POST {path} returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(format!("POST {path} invalid JSON: {e}")))
    }

    fn call_body(call: &ContractCall) -> Value {
        json!({
            "owner_address": call.owner.to_base58(),
            "contract_address": call.contract.to_base58(),
            "data": alloy::hex::encode(&call.data),
            "fee_limit": call.fee_limit,
            "call_value": call.call_value,
            "visible": true,
        })
    }
}

/// Extract a node-side rejection from a `{"result": {...}}` envelope.
fn check_result(response: &Value) -> Result<(), LedgerError> {
    let Some(result) = response.get("result") else {
        return Ok(());
    };
    if result.get("result").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    let code = result
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN");
    let message = result
        .get("message")
        .and_then(Value::as_str)
        .map(decode_hex_message)
        .unwrap_or_default();
    Err(LedgerError::Rejected(format!("{code}: {message}")))
}

/// Node messages are usually hex-encoded UTF-8; pass through anything else.
fn decode_hex_message(raw: &str) -> String {
    match alloy::hex::decode(raw) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn parse_transaction(value: Value) -> Result<LedgerTransaction, LedgerError> {
    serde_json::from_value(value).map_err(|e| LedgerError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl LedgerClient for TronClient {
    async fn get_balance(&self, owner: &Address) -> Result<U256, LedgerError> {
        let response = self
            .post_json(
                "/wallet/getaccount",
                &json!({ "address": owner.to_base58(), "visible": true }),
            )
            .await?;
        // Accounts that were never activated come back as `{}`.
        let balance = response.get("balance").and_then(Value::as_u64).unwrap_or(0);
        Ok(U256::from(balance))
    }

    async fn get_block_number(&self) -> Result<u64, LedgerError> {
        let response = self.post_json("/wallet/getnowblock", &json!({})).await?;
        response
            .pointer("/block_header/raw_data/number")
            .and_then(Value::as_u64)
            .ok_or_else(|| LedgerError::InvalidResponse("missing block number".to_string()))
    }

    async fn get_transaction(&self, id: &str) -> Result<Option<LedgerTransaction>, LedgerError> {
        let response = self
            .post_json(
                "/wallet/gettransactionbyid",
                &json!({ "value": id, "visible": true }),
            )
            .await?;
        if response.get("txID").is_none() {
            return Ok(None);
        }
        parse_transaction(response).map(Some)
    }

    async fn get_transaction_info(
        &self,
        id: &str,
    ) -> Result<Option<TransactionInfo>, LedgerError> {
        let response = self
            .post_json("/wallet/gettransactioninfobyid", &json!({ "value": id }))
            .await?;
        if response.get("id").is_none() {
            return Ok(None);
        }
        serde_json::from_value(response)
            .map(Some)
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }

    async fn trigger_contract(&self, call: &ContractCall) -> Result<LedgerTransaction, LedgerError> {
        let response = self
            .post_json("/wallet/triggersmartcontract", &Self::call_body(call))
            .await?;
        check_result(&response)?;
        let tx = response
            .get("transaction")
            .cloned()
            .ok_or_else(|| LedgerError::InvalidResponse("missing transaction".to_string()))?;
        parse_transaction(tx)
    }

    async fn call_constant(&self, call: &ContractCall) -> Result<Option<Vec<u8>>, LedgerError> {
        let response = self
            .post_json("/wallet/triggerconstantcontract", &Self::call_body(call))
            .await?;
        check_result(&response)?;

        let vm_result = response
            .pointer("/transaction/ret/0/ret")
            .or_else(|| response.pointer("/transaction/ret/0/contractRet"))
            .and_then(Value::as_str);
        if let Some(outcome) = vm_result {
            if outcome.eq_ignore_ascii_case("FAILED") || outcome.eq_ignore_ascii_case("REVERT") {
                return Err(LedgerError::Rejected(format!("constant call {outcome}")));
            }
        }

        let output = response
            .pointer("/constant_result/0")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if output.is_empty() {
            return Ok(None);
        }
        alloy::hex::decode(output)
            .map(Some)
            .map_err(|e| LedgerError::InvalidResponse(format!("constant_result: {e}")))
    }

    async fn create_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<LedgerTransaction, LedgerError> {
        let amount = u64::try_from(amount)
            .map_err(|_| LedgerError::Rejected(format!("amount {amount} exceeds int64")))?;
        let response = self
            .post_json(
                "/wallet/createtransaction",
                &json!({
                    "owner_address": from.to_base58(),
                    "to_address": to.to_base58(),
                    "amount": amount,
                    "visible": true,
                }),
            )
            .await?;
        if let Some(error) = response.get("Error").and_then(Value::as_str) {
            return Err(LedgerError::Rejected(error.to_string()));
        }
        parse_transaction(response)
    }

    async fn estimate_energy(&self, call: &ContractCall) -> Result<u64, LedgerError> {
        let response = self
            .post_json("/wallet/estimateenergy", &Self::call_body(call))
            .await?;
        check_result(&response)?;
        response
            .get("energy_required")
            .and_then(Value::as_u64)
            .ok_or_else(|| LedgerError::InvalidResponse("missing energy_required".to_string()))
    }

    async fn broadcast(&self, tx: &LedgerTransaction) -> Result<BroadcastResult, LedgerError> {
        let body = serde_json::to_value(tx)
            .map_err(|e| LedgerError::InvalidResponse(format!("serialize transaction: {e}")))?;
        let response = self.post_json("/wallet/broadcasttransaction", &body).await?;
        serde_json::from_value(response).map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }
}
