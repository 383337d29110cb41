// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction lookup, classification and per-asset views.

pub mod classify;
pub mod derived;
pub mod record;
pub mod views;

pub use classify::{classify_payload, PayloadKind, KNOWN_SELECTORS};
pub use derived::TransferFields;
pub use record::{TransactionData, TransactionRecord, WaitOptions, DEFAULT_POLL_INTERVAL};
pub use views::{CoinTransaction, ContractTransaction, NftTransaction, TokenTransaction};
