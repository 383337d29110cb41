// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger client interface and the node's wire shapes.
//!
//! The adapter talks to the ledger exclusively through [`LedgerClient`], so
//! every asset and transaction component can run against TronGrid or against
//! an in-process double.

use alloy::primitives::U256;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::address::Address;
use super::signing;

/// Contract type of a native value transfer.
pub const TRANSFER_CONTRACT: &str = "TransferContract";

/// Contract type of a smart-contract invocation.
pub const TRIGGER_SMART_CONTRACT: &str = "TriggerSmartContract";

/// A transaction as returned by the node, signed or not.
///
/// `raw_data` is kept verbatim so that a signed transaction can be broadcast
/// exactly as the node built it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: Value,
    #[serde(default)]
    pub raw_data_hex: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signature: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ret: Vec<ContractResult>,
    #[serde(default)]
    pub visible: bool,
}

impl LedgerTransaction {
    /// First (and on TRON, only) contract entry of the transaction.
    pub fn contract(&self) -> Option<ContractEntry> {
        let entry = self.raw_data.get("contract")?.get(0)?;
        serde_json::from_value(entry.clone()).ok()
    }

    pub fn fee_limit(&self) -> Option<u64> {
        self.raw_data.get("fee_limit").and_then(Value::as_u64)
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

/// Per-contract execution result attached to a transaction body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractResult {
    #[serde(rename = "contractRet", default, skip_serializing_if = "Option::is_none")]
    pub contract_ret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContractEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub parameter: ContractParameter,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContractParameter {
    pub value: ContractValue,
    #[serde(default)]
    pub type_url: String,
}

/// Fields of the contract payloads this adapter reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContractValue {
    #[serde(default)]
    pub owner_address: Option<String>,
    /// `TransferContract` receiver
    #[serde(default)]
    pub to_address: Option<String>,
    /// `TransferContract` value in sun
    #[serde(default)]
    pub amount: Option<u64>,
    /// `TriggerSmartContract` target
    #[serde(default)]
    pub contract_address: Option<String>,
    /// `TriggerSmartContract` call data (hex)
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub call_value: Option<u64>,
}

/// Execution receipt (`gettransactioninfobyid`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionInfo {
    pub id: String,
    /// Total fee in sun
    #[serde(default)]
    pub fee: u64,
    #[serde(rename = "blockNumber", default)]
    pub block_number: u64,
    /// Block time in milliseconds
    #[serde(rename = "blockTimeStamp", default)]
    pub block_timestamp: u64,
    #[serde(rename = "contractResult", default)]
    pub contract_result: Vec<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub receipt: ResourceReceipt,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    /// Present (as `FAILED`) only when execution failed
    #[serde(default)]
    pub result: Option<String>,
    /// Hex-encoded failure message
    #[serde(rename = "resMessage", default)]
    pub res_message: Option<String>,
}

impl TransactionInfo {
    /// Whether the receipt reports a revert or any other failure.
    pub fn is_failure(&self) -> bool {
        if self
            .result
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("FAILED"))
        {
            return true;
        }
        self.receipt
            .result
            .as_deref()
            .is_some_and(|r| !r.eq_ignore_ascii_case("SUCCESS"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceReceipt {
    #[serde(default)]
    pub energy_usage_total: Option<u64>,
    #[serde(default)]
    pub net_usage: Option<u64>,
    #[serde(default)]
    pub net_fee: Option<u64>,
    /// VM outcome (`SUCCESS`, `REVERT`, `OUT_OF_ENERGY`, ...); absent for native transfers
    #[serde(default)]
    pub result: Option<String>,
}

/// A raw event log entry from a receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Emitting contract (20-byte hex)
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

/// A contract invocation ready to be sent to the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub contract: Address,
    pub owner: Address,
    /// Full call data, selector included
    pub data: Vec<u8>,
    /// Maximum fee in sun
    pub fee_limit: u64,
    /// TRX attached to the call, in sun
    pub call_value: u64,
}

/// Broadcast response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BroadcastResult {
    /// Success marker
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    /// Hex-encoded rejection reason
    #[serde(default)]
    pub message: Option<String>,
}

impl BroadcastResult {
    /// Rejection reason with the hex layer removed, when the node sent one.
    pub fn decoded_message(&self) -> Option<String> {
        let message = self.message.as_deref()?.trim();
        if message.is_empty() {
            return None;
        }
        match alloy::hex::decode(message) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(_) => Some(message.to_string()),
        }
    }
}

/// Errors raised by a ledger client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("rejected by node: {0}")]
    Rejected(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

/// Operations consumed from the ledger node.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// TRX balance in sun; zero for accounts the ledger has never seen.
    async fn get_balance(&self, owner: &Address) -> Result<U256, LedgerError>;

    /// Current chain height.
    async fn get_block_number(&self) -> Result<u64, LedgerError>;

    /// Transaction body, or `None` while the id is unknown.
    async fn get_transaction(&self, id: &str) -> Result<Option<LedgerTransaction>, LedgerError>;

    /// Execution receipt, or `None` until the transaction is executed.
    async fn get_transaction_info(&self, id: &str)
        -> Result<Option<TransactionInfo>, LedgerError>;

    /// Build an unsigned state-changing contract call.
    async fn trigger_contract(&self, call: &ContractCall) -> Result<LedgerTransaction, LedgerError>;

    /// Execute a read-only call; `None` when the contract returned nothing.
    async fn call_constant(&self, call: &ContractCall) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Build an unsigned native TRX transfer.
    async fn create_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<LedgerTransaction, LedgerError>;

    /// Predicted energy consumption of a contract call.
    async fn estimate_energy(&self, call: &ContractCall) -> Result<u64, LedgerError>;

    /// Submit a signed transaction.
    async fn broadcast(&self, tx: &LedgerTransaction) -> Result<BroadcastResult, LedgerError>;

    /// Sign a transaction locally with a hex or PEM private key.
    fn sign(&self, tx: &LedgerTransaction, private_key: &str) -> Result<LedgerTransaction, LedgerError> {
        signing::sign_transaction(tx, private_key)
    }
}
