// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Payload classification.
//!
//! Sorting a transaction into coin, token/NFT or generic contract only needs
//! its first contract entry. Telling tokens from NFTs needs a ledger probe,
//! which [`TransactionRecord::get_type`](super::TransactionRecord::get_type)
//! performs on top of this.

use crate::blockchain::address::Address;
use crate::blockchain::ledger::{LedgerTransaction, TRANSFER_CONTRACT, TRIGGER_SMART_CONTRACT};

/// Selectors of the mutating TRC-20 / TRC-721 functions.
///
/// Matched case-sensitively against the lowercase hex the node returns.
pub const KNOWN_SELECTORS: [&str; 7] = [
    "a9059cbb", // transfer(address,uint256)
    "095ea7b3", // approve(address,uint256)
    "23b872dd", // transferFrom(address,address,uint256)
    "42842e0e", // safeTransferFrom(address,address,uint256)
    "b88d4fde", // safeTransferFrom(address,address,uint256,bytes)
    "2eb2c2d6", // safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)
    "a22cb465", // setApprovalForAll(address,bool)
];

/// What a transaction payload is, before any probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKind {
    /// Native TRX transfer
    CoinTransfer,
    /// Contract trigger whose selector belongs to a token standard
    StandardCall { contract: Option<Address> },
    /// Contract trigger with any other selector
    ContractCall,
    /// Everything else
    Other,
}

/// Leading four bytes of hex call data, as eight hex characters.
pub fn selector_of(data: &str) -> Option<&str> {
    let data = data.strip_prefix("0x").unwrap_or(data);
    data.get(..8)
}

pub fn is_known_selector(selector: &str) -> bool {
    KNOWN_SELECTORS.contains(&selector)
}

pub fn classify_payload(body: &LedgerTransaction) -> PayloadKind {
    let Some(contract) = body.contract() else {
        return PayloadKind::Other;
    };

    match contract.kind.as_str() {
        TRANSFER_CONTRACT => PayloadKind::CoinTransfer,
        TRIGGER_SMART_CONTRACT => {
            let value = &contract.parameter.value;
            match value.data.as_deref().and_then(selector_of) {
                Some(selector) if is_known_selector(selector) => PayloadKind::StandardCall {
                    contract: value
                        .contract_address
                        .as_deref()
                        .and_then(|a| a.parse().ok()),
                },
                Some(_) => PayloadKind::ContractCall,
                None => PayloadKind::Other,
            }
        }
        _ => PayloadKind::Other,
    }
}
