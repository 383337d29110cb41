// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Build, sign and broadcast pipeline.
//!
//! Every mutating asset operation returns a [`TransactionSigner`] holding the
//! unsigned transaction. Signing and broadcasting are separate steps so the
//! caller decides when (and whether) the transaction leaves the process.

use std::fmt;
use std::sync::Arc;

use super::ledger::{LedgerClient, LedgerTransaction};
use crate::error::{Result, TronError};

/// An unsigned transaction moving through sign and send.
pub struct TransactionSigner {
    raw: LedgerTransaction,
    signed: Option<LedgerTransaction>,
    broadcast_id: Option<String>,
    ledger: Arc<dyn LedgerClient>,
}

impl fmt::Debug for TransactionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionSigner")
            .field("tx_id", &self.raw.tx_id)
            .field("signed", &self.signed.is_some())
            .field("broadcast_id", &self.broadcast_id)
            .finish()
    }
}

impl TransactionSigner {
    pub fn new(raw: LedgerTransaction, ledger: Arc<dyn LedgerClient>) -> Self {
        Self {
            raw,
            signed: None,
            broadcast_id: None,
            ledger,
        }
    }

    /// The unsigned transaction as built by the ledger.
    pub fn raw_data(&self) -> &LedgerTransaction {
        &self.raw
    }

    /// The signed transaction, once [`TransactionSigner::sign`] succeeded.
    pub fn signed_data(&self) -> Option<&LedgerTransaction> {
        self.signed.as_ref()
    }

    /// Id returned by the node, once [`TransactionSigner::send`] succeeded.
    pub fn broadcast_id(&self) -> Option<&str> {
        self.broadcast_id.as_deref()
    }

    /// Sign with a hex or PEM private key; signing again replaces the signature.
    pub fn sign(&mut self, private_key: &str) -> Result<&mut Self> {
        let signed = self
            .ledger
            .sign(&self.raw, private_key)
            .map_err(|e| TronError::TransactionCreationFailed(e.to_string()))?;
        self.signed = Some(signed);
        Ok(self)
    }

    /// Broadcast the signed transaction and return its id.
    pub async fn send(&mut self) -> Result<String> {
        let signed = self.signed.as_ref().ok_or_else(|| {
            TronError::TransactionCreationFailed("transaction is not signed".to_string())
        })?;

        let response = self
            .ledger
            .broadcast(signed)
            .await
            .map_err(|e| TronError::TransactionCreationFailed(e.to_string()))?;

        if !response.result {
            let reason = response
                .decoded_message()
                .or(response.code.clone())
                .unwrap_or_else(|| "broadcast rejected".to_string());
            tracing::warn!(tx_id = %signed.tx_id, reason = %reason, "Broadcast rejected");
            return Err(TronError::TransactionCreationFailed(reason));
        }

        let id = response.txid.unwrap_or_else(|| signed.tx_id.clone());
        tracing::info!(tx_id = %id, "Transaction broadcast");
        self.broadcast_id = Some(id.clone());
        Ok(id)
    }
}
