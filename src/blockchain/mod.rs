// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TRON ledger integration.
//!
//! This module provides:
//! - Address and amount primitives
//! - Contract descriptors and the ABI codec built on them
//! - The [`LedgerClient`] seam and its TronGrid implementation
//! - Contract reads/writes, transaction signing and broadcasting

pub mod abi;
pub mod address;
pub mod amount;
pub mod client;
pub mod contract;
pub mod descriptor;
pub mod ledger;
pub mod signer;
pub mod signing;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use abi::{AbiCodec, AbiError, DecodedCall, DecodedEvent, DescriptorCodec};
pub use address::{Address, AddressError};
pub use amount::Amount;
pub use client::TronClient;
pub use contract::{CallOutput, ContractCallSpec, ContractInvoker, DEFAULT_FEE_LIMIT};
pub use descriptor::{AssetDescriptor, Decimals, FunctionDescriptor, TRC20, TRC721};
pub use ledger::{LedgerClient, LedgerError, LedgerTransaction, TransactionInfo};
pub use signer::TransactionSigner;
pub use types::*;
