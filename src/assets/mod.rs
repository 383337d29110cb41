// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset variants.
//!
//! - [`Coin`] - native TRX
//! - [`Token`] - TRC-20 fungible token
//! - [`Nft`] - TRC-721 non-fungible token
//! - [`Contract`] - any contract, without asset semantics
//!
//! Mutating operations validate first and then return a
//! [`TransactionSigner`](crate::blockchain::signer::TransactionSigner) holding
//! the unsigned transaction.

use async_trait::async_trait;

use crate::blockchain::address::Address;
use crate::blockchain::amount::Amount;
use crate::blockchain::contract::CallOutput;
use crate::error::{Result, TronError};

pub mod coin;
pub mod contract;
pub mod nft;
pub mod token;
pub mod validation;

pub use coin::Coin;
pub use contract::{CallOptions, Contract};
pub use nft::Nft;
pub use token::Token;

/// Identity and balance common to every asset.
#[async_trait]
pub trait Asset: Send + Sync {
    async fn name(&self) -> Result<String>;

    async fn symbol(&self) -> Result<String>;

    async fn decimals(&self) -> Result<u8>;

    /// Balance of `owner`, at the asset's decimals.
    async fn balance(&self, owner: &str) -> Result<Amount>;
}

/// Unsigned integer out of a read result; an empty result reads as zero.
pub(crate) fn uint_or_zero(method: &str, output: Option<CallOutput>) -> Result<alloy::primitives::U256> {
    match output {
        None => Ok(alloy::primitives::U256::ZERO),
        Some(output) => output.as_uint().ok_or_else(|| {
            TronError::RpcRequestError(format!("`{method}` did not return an integer"))
        }),
    }
}

/// String out of a read result.
pub(crate) fn required_string(method: &str, output: Option<CallOutput>) -> Result<String> {
    output
        .as_ref()
        .and_then(CallOutput::as_str)
        .map(str::to_string)
        .ok_or_else(|| TronError::RpcRequestError(format!("`{method}` did not return a string")))
}

/// Owner/approval address out of a read result; empty sentinels mean nobody.
pub(crate) fn optional_address(output: Option<CallOutput>) -> Option<Address> {
    output
        .and_then(|o| o.as_address())
        .filter(|a| !a.is_zero())
}
