// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public error taxonomy.
//!
//! Validation failures are raised before anything is sent to the ledger.
//! Lower-layer failures (transport, codec, signing) are wrapped into
//! `TransactionCreationFailed` or `RpcRequestError` with the original message
//! preserved.

/// Errors surfaced by assets, transaction records and the signer pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TronError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unauthorized address")]
    UnauthorizedAddress,

    #[error("Transaction creation failed: {0}")]
    TransactionCreationFailed(String),

    #[error("RPC request error: {0}")]
    RpcRequestError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TronError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            TronError::InvalidAmount => "invalid_amount",
            TronError::InsufficientBalance => "insufficient_balance",
            TronError::InvalidAddress(_) => "invalid_address",
            TronError::UnauthorizedAddress => "unauthorized_address",
            TronError::TransactionCreationFailed(_) => "transaction_creation_failed",
            TronError::RpcRequestError(_) => "rpc_request_error",
            TronError::Configuration(_) => "configuration_error",
        }
    }

    /// Whether this error came from input validation rather than the ledger.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TronError::InvalidAmount
                | TronError::InsufficientBalance
                | TronError::InvalidAddress(_)
                | TronError::UnauthorizedAddress
        )
    }
}

pub type Result<T, E = TronError> = std::result::Result<T, E>;
