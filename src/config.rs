// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names and the loaders that turn them into a
//! [`NetworkConfig`]. Nothing in the crate reads the environment on its own;
//! the composition root calls [`network_config_from_env`] once and passes the
//! result down.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TRON_NETWORK` | `mainnet` or `nile` (alias `testnet`) | `nile` |
//! | `TRON_RPC_URL` | Full-node HTTP endpoint override | Preset host |
//! | `TRON_EVENT_URL` | Event server override | Preset event host |
//! | `TRON_EXPLORER_URL` | Explorer base URL override | Preset explorer |
//! | `TRON_API_KEY` | TronGrid API key (`TRON-PRO-API-KEY` header) | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;

use crate::blockchain::types::{resolve_network, NetworkConfig};
use crate::error::{Result, TronError};

/// Environment variable selecting the network preset.
///
/// # Values
/// - `mainnet` - TronGrid mainnet
/// - `nile` / `testnet` - Nile testnet
pub const TRON_NETWORK_ENV: &str = "TRON_NETWORK";

/// Environment variable overriding the full-node HTTP endpoint.
pub const TRON_RPC_URL_ENV: &str = "TRON_RPC_URL";

/// Environment variable overriding the event server endpoint.
pub const TRON_EVENT_URL_ENV: &str = "TRON_EVENT_URL";

/// Environment variable overriding the block explorer base URL.
///
/// Transaction links are built as `{base}#/transaction/{id}`.
pub const TRON_EXPLORER_URL_ENV: &str = "TRON_EXPLORER_URL";

/// Environment variable holding the TronGrid API key.
///
/// Sent as the `TRON-PRO-API-KEY` header on every request. TronGrid
/// rate-limits anonymous traffic heavily, so production deployments set it.
pub const TRON_API_KEY_ENV: &str = "TRON_API_KEY";

/// Environment variable for the log output format.
///
/// # Values
/// - `json` - one JSON object per line
/// - `pretty` (or unset) - human-readable
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the network configuration from the process environment.
pub fn network_config_from_env() -> Result<NetworkConfig> {
    network_config_from(|name| env::var(name).ok())
}

/// Build the network configuration from any variable source.
pub fn network_config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<NetworkConfig> {
    let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let preset =
        resolve_network(var(TRON_NETWORK_ENV).as_deref()).map_err(TronError::Configuration)?;
    let mut config = NetworkConfig::from_preset(preset);

    if let Some(url) = var(TRON_RPC_URL_ENV) {
        config = config.with_rpc_url(validated_url(TRON_RPC_URL_ENV, url)?);
    }
    if let Some(url) = var(TRON_EVENT_URL_ENV) {
        config = config.with_event_url(validated_url(TRON_EVENT_URL_ENV, url)?);
    }
    if let Some(url) = var(TRON_EXPLORER_URL_ENV) {
        config = config.with_explorer_url(validated_url(TRON_EXPLORER_URL_ENV, url)?);
    }
    if let Some(key) = var(TRON_API_KEY_ENV) {
        config = config.with_api_key(key);
    }

    Ok(config)
}

fn validated_url(name: &str, raw: String) -> Result<String> {
    url::Url::parse(&raw).map_err(|e| TronError::Configuration(format!("{name}: {e}")))?;
    Ok(raw)
}

/// Install the global tracing subscriber.
///
/// Respects `RUST_LOG` (default `info`) and switches to JSON lines when
/// `LOG_FORMAT=json`. Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let _ = if json {
        fmt().json().with_env_filter(filter).try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };
}
