// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field derivation for transfer-shaped transactions.
//!
//! Stateless: each function maps an already-fetched body or decoded call to
//! sender/receiver/amount. Anything that does not fit yields the defaults.

use alloy::primitives::U256;

use crate::blockchain::abi::{as_address, as_uint, DecodedCall};
use crate::blockchain::address::{same_address, Address};
use crate::blockchain::ledger::{LedgerTransaction, TRANSFER_CONTRACT};
use crate::blockchain::types::{AssetDirection, TransactionStatus};

/// Who moved what to whom. Unknown parts stay `None` / zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferFields {
    pub sender: Option<Address>,
    pub receiver: Option<Address>,
    /// Raw amount, or the token id for NFTs
    pub amount: U256,
}

impl TransferFields {
    /// Address compared against the counterparty for `direction`.
    pub fn party(&self, direction: AssetDirection) -> Option<&Address> {
        match direction {
            AssetDirection::Incoming => self.receiver.as_ref(),
            AssetDirection::Outgoing => self.sender.as_ref(),
        }
    }
}

/// Map a decoded token call by function name.
///
/// `transfer(to, amount)` takes its sender from the transaction signer;
/// `transferFrom` and `safeTransferFrom` carry it as the first argument.
pub fn call_fields(call: &DecodedCall, signer: Option<Address>) -> TransferFields {
    let address = |i| call.arg(i).and_then(as_address);
    let uint = |i| call.arg(i).and_then(as_uint).unwrap_or_default();

    match call.function.as_str() {
        "transfer" => TransferFields {
            sender: signer,
            receiver: address(0),
            amount: uint(1),
        },
        "transferFrom" | "safeTransferFrom" => TransferFields {
            sender: address(0),
            receiver: address(1),
            amount: uint(2),
        },
        _ => TransferFields::default(),
    }
}

/// Fields of a native TRX transfer; amount in sun.
pub fn coin_fields(body: &LedgerTransaction, signer: Option<Address>) -> TransferFields {
    let Some(contract) = body.contract().filter(|c| c.kind == TRANSFER_CONTRACT) else {
        return TransferFields::default();
    };
    let value = contract.parameter.value;
    TransferFields {
        sender: signer,
        receiver: value.to_address.as_deref().and_then(|a| a.parse().ok()),
        amount: U256::from(value.amount.unwrap_or(0)),
    }
}

/// Outcome of checking an expected transfer against what the ledger shows.
///
/// Pending and Failed are returned untouched: a reverted transfer moved
/// nothing. A confirmed one also needs the amount and the direction's party
/// to match.
pub fn verify(
    status: TransactionStatus,
    fields: &TransferFields,
    direction: AssetDirection,
    counterparty: &str,
    amount_matches: bool,
) -> TransactionStatus {
    if status != TransactionStatus::Confirmed {
        return status;
    }
    let party_matches = fields
        .party(direction)
        .is_some_and(|party| same_address(&party.to_base58(), counterparty));

    if amount_matches && party_matches {
        TransactionStatus::Confirmed
    } else {
        TransactionStatus::Failed
    }
}
