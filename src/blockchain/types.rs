// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use serde::{Deserialize, Serialize};

/// Static description of a TRON network's public endpoints.
#[derive(Debug, Clone, Copy)]
pub struct NetworkPreset {
    /// Short identifier used in configuration (`mainnet`, `nile`)
    pub id: &'static str,
    /// Network name for display
    pub name: &'static str,
    /// Genesis-derived chain identifier
    pub chain_id: &'static str,
    /// Whether this is a test network
    pub testnet: bool,
    /// Full-node HTTP endpoint
    pub rpc_url: &'static str,
    /// Event server endpoint
    pub event_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// TRON Mainnet via TronGrid.
pub const TRON_MAINNET: NetworkPreset = NetworkPreset {
    id: "mainnet",
    name: "TronGrid Mainnet",
    chain_id: "0x2b6653dc",
    testnet: false,
    rpc_url: "https://api.trongrid.io",
    event_url: "https://api.trongrid.io",
    explorer_url: "https://tronscan.org/",
};

/// TRON Nile Testnet via TronGrid.
pub const TRON_NILE: NetworkPreset = NetworkPreset {
    id: "nile",
    name: "TronGrid Nile Testnet",
    chain_id: "0xcd8690dc",
    testnet: true,
    rpc_url: "https://nile.trongrid.io",
    event_url: "https://event.nileex.io",
    explorer_url: "https://nile.tronscan.org/",
};

/// Resolve a configured network name to its preset.
///
/// `testnet` is accepted as an alias for Nile. An absent value selects Nile.
pub fn resolve_network(raw: Option<&str>) -> Result<&'static NetworkPreset, String> {
    let value = raw.unwrap_or(TRON_NILE.id).trim().to_ascii_lowercase();
    match value.as_str() {
        "mainnet" => Ok(&TRON_MAINNET),
        "nile" | "testnet" => Ok(&TRON_NILE),
        other => Err(format!(
            "Unknown network `{other}`; expected `mainnet` or `nile`."
        )),
    }
}

/// Active network configuration.
///
/// Built once at the composition root and handed to every component; there is
/// no process-wide instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: String,
    pub testnet: bool,
    pub rpc_url: String,
    pub event_url: String,
    pub explorer_url: String,
    /// TronGrid API key sent as `TRON-PRO-API-KEY`
    pub api_key: Option<String>,
}

impl NetworkConfig {
    pub fn from_preset(preset: &NetworkPreset) -> Self {
        Self {
            name: preset.name.to_string(),
            chain_id: preset.chain_id.to_string(),
            testnet: preset.testnet,
            rpc_url: preset.rpc_url.to_string(),
            event_url: preset.event_url.to_string(),
            explorer_url: preset.explorer_url.to_string(),
            api_key: None,
        }
    }

    pub fn mainnet() -> Self {
        Self::from_preset(&TRON_MAINNET)
    }

    pub fn nile() -> Self {
        Self::from_preset(&TRON_NILE)
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    pub fn with_event_url(mut self, url: impl Into<String>) -> Self {
        self.event_url = url.into();
        self
    }

    pub fn with_explorer_url(mut self, url: impl Into<String>) -> Self {
        self.explorer_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Explorer link for a transaction id.
    pub fn transaction_url(&self, tx_id: &str) -> String {
        let base = if self.explorer_url.ends_with('/') {
            self.explorer_url.clone()
        } else {
            format!("{}/", self.explorer_url)
        };
        format!("{base}#/transaction/{tx_id}")
    }
}

/// Kind of operation a transaction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Anything that is neither a value transfer nor a contract trigger
    General,
    /// Native TRX transfer
    Coin,
    /// TRC-20 token operation
    Token,
    /// TRC-721 token operation
    Nft,
    /// Contract trigger with an unrecognised selector
    Contract,
}

/// Execution status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Not yet visible, or visible without an execution receipt
    Pending,
    /// Executed successfully
    Confirmed,
    /// Reverted or otherwise failed
    Failed,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

/// Direction of a transfer relative to the address being verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetDirection {
    Incoming,
    Outgoing,
}
