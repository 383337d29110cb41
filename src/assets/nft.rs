// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TRC-721 non-fungible tokens.
//!
//! Operations are keyed by token id instead of amount. Contracts report
//! "nobody" as an empty or all-zero address; those read as `None`.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;
use async_trait::async_trait;

use super::validation::{ensure_holds_units, ensure_owner, ensure_spender, parse_address};
use super::{optional_address, required_string, uint_or_zero, Asset};
use crate::blockchain::abi::{address_arg, uint_arg};
use crate::blockchain::address::Address;
use crate::blockchain::amount::Amount;
use crate::blockchain::contract::{ContractCallSpec, ContractInvoker};
use crate::blockchain::signer::TransactionSigner;
use crate::error::Result;

/// A TRC-721 collection.
#[derive(Debug)]
pub struct Nft {
    invoker: ContractInvoker,
}

impl Nft {
    pub fn new(invoker: ContractInvoker) -> Self {
        Self { invoker }
    }

    pub fn address(&self) -> &Address {
        self.invoker.address()
    }

    pub fn invoker(&self) -> &ContractInvoker {
        &self.invoker
    }

    /// Current owner of `token_id`.
    pub async fn owner_of(&self, token_id: U256) -> Result<Option<Address>> {
        let output = self.invoker.call_read("ownerOf", &[uint_arg(token_id)]).await?;
        Ok(optional_address(output))
    }

    /// Account approved to move `token_id`, if any.
    pub async fn get_approved(&self, token_id: U256) -> Result<Option<Address>> {
        let output = self
            .invoker
            .call_read("getApproved", &[uint_arg(token_id)])
            .await?;
        Ok(optional_address(output))
    }

    /// Metadata URI of `token_id`, unsanitized.
    pub async fn token_uri(&self, token_id: U256) -> Result<Option<String>> {
        let value = self
            .invoker
            .call_read_value("tokenURI", &[uint_arg(token_id)], None)
            .await?;
        Ok(match value {
            Some(DynSolValue::String(uri)) if !uri.is_empty() => Some(uri),
            _ => None,
        })
    }

    /// Send `token_id` from `sender` to `receiver`.
    pub async fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        token_id: U256,
    ) -> Result<TransactionSigner> {
        self.transfer_from(sender, sender, receiver, token_id).await
    }

    /// Move `owner`'s `token_id` to `receiver` on behalf of `spender`.
    pub async fn transfer_from(
        &self,
        spender: &str,
        owner: &str,
        receiver: &str,
        token_id: U256,
    ) -> Result<TransactionSigner> {
        ensure_holds_units(self.balance(owner).await?.raw())?;

        let owner = parse_address(owner)?;
        let spender = parse_address(spender)?;
        ensure_owner(&owner, self.owner_of(token_id).await?.as_ref())?;
        if spender != owner {
            let approved = self.get_approved(token_id).await?;
            ensure_spender(&spender, &owner, approved.as_ref())?;
        }

        let receiver = parse_address(receiver)?;
        let spec = self.invoker.build_call(
            "transferFrom",
            &spender,
            vec![
                address_arg(&owner),
                address_arg(&receiver),
                uint_arg(token_id),
            ],
        )?;
        self.submit(spec).await
    }

    /// Approve `spender` to move `owner`'s `token_id`.
    pub async fn approve(
        &self,
        owner: &str,
        spender: &str,
        token_id: U256,
    ) -> Result<TransactionSigner> {
        ensure_holds_units(self.balance(owner).await?.raw())?;

        let owner = parse_address(owner)?;
        ensure_owner(&owner, self.owner_of(token_id).await?.as_ref())?;

        let spender = parse_address(spender)?;
        let spec = self.invoker.build_call(
            "approve",
            &owner,
            vec![address_arg(&spender), uint_arg(token_id)],
        )?;
        self.submit(spec).await
    }

    async fn submit(&self, spec: ContractCallSpec) -> Result<TransactionSigner> {
        let raw = self.invoker.submit(&spec).await?;
        tracing::debug!(
            tx_id = %raw.tx_id,
            contract = %spec.contract,
            function = %spec.function.name,
            "Built NFT transaction"
        );
        Ok(TransactionSigner::new(raw, self.invoker.ledger().clone()))
    }
}

#[async_trait]
impl Asset for Nft {
    async fn name(&self) -> Result<String> {
        if let Some(name) = &self.invoker.descriptor().name {
            return Ok(name.clone());
        }
        required_string("name", self.invoker.call_read_cached("name").await?)
    }

    async fn symbol(&self) -> Result<String> {
        if let Some(symbol) = &self.invoker.descriptor().symbol {
            return Ok(symbol.clone());
        }
        required_string("symbol", self.invoker.call_read_cached("symbol").await?)
    }

    async fn decimals(&self) -> Result<u8> {
        Ok(0)
    }

    /// Number of tokens `owner` holds.
    async fn balance(&self, owner: &str) -> Result<Amount> {
        let owner = parse_address(owner)?;
        let output = self
            .invoker
            .call_read_from("balanceOf", &[address_arg(&owner)], Some(&owner))
            .await?;
        Ok(Amount::new(uint_or_zero("balanceOf", output)?, 0))
    }
}
