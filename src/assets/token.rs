// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TRC-20 fungible tokens.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::validation::{
    ensure_sufficient_balance, ensure_within_allowance, parse_address, to_amount,
};
use super::{required_string, uint_or_zero, Asset};
use crate::blockchain::abi::{address_arg, uint_arg};
use crate::blockchain::address::Address;
use crate::blockchain::amount::Amount;
use crate::blockchain::contract::{ContractCallSpec, ContractInvoker};
use crate::blockchain::descriptor::Decimals;
use crate::blockchain::signer::TransactionSigner;
use crate::error::{Result, TronError};

/// A TRC-20 token contract.
#[derive(Debug)]
pub struct Token {
    invoker: ContractInvoker,
}

impl Token {
    pub fn new(invoker: ContractInvoker) -> Self {
        Self { invoker }
    }

    pub fn address(&self) -> &Address {
        self.invoker.address()
    }

    pub fn invoker(&self) -> &ContractInvoker {
        &self.invoker
    }

    pub async fn total_supply(&self) -> Result<Amount> {
        let supply = uint_or_zero("totalSupply", self.invoker.call_read("totalSupply", &[]).await?)?;
        Ok(Amount::new(supply, self.decimals().await?))
    }

    /// Amount `spender` may still move out of `owner`'s balance.
    pub async fn allowance(&self, owner: &str, spender: &str) -> Result<Amount> {
        let owner = parse_address(owner)?;
        let spender = parse_address(spender)?;
        let output = self
            .invoker
            .call_read_from(
                "allowance",
                &[address_arg(&owner), address_arg(&spender)],
                Some(&owner),
            )
            .await?;
        Ok(Amount::new(
            uint_or_zero("allowance", output)?,
            self.decimals().await?,
        ))
    }

    /// Move `amount` tokens from `sender` to `receiver`.
    pub async fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        amount: Decimal,
    ) -> Result<TransactionSigner> {
        let value = to_amount(amount, self.decimals().await?)?;
        ensure_sufficient_balance(&value, &self.balance(sender).await?)?;

        let from = parse_address(sender)?;
        let to = parse_address(receiver)?;
        let spec = self.invoker.build_call(
            "transfer",
            &from,
            vec![address_arg(&to), uint_arg(value.raw())],
        )?;
        self.submit(spec).await
    }

    /// Move `amount` of `owner`'s tokens to `receiver` on behalf of `spender`.
    ///
    /// A spender acting on its own balance skips the allowance checks.
    pub async fn transfer_from(
        &self,
        spender: &str,
        owner: &str,
        receiver: &str,
        amount: Decimal,
    ) -> Result<TransactionSigner> {
        let value = to_amount(amount, self.decimals().await?)?;
        ensure_sufficient_balance(&value, &self.balance(owner).await?)?;

        let spender_address = parse_address(spender)?;
        let owner_address = parse_address(owner)?;
        if spender_address != owner_address {
            let allowance = self.allowance(owner, spender).await?;
            ensure_within_allowance(&value, &allowance)?;
        }

        let to = parse_address(receiver)?;
        let spec = self.invoker.build_call(
            "transferFrom",
            &spender_address,
            vec![
                address_arg(&owner_address),
                address_arg(&to),
                uint_arg(value.raw()),
            ],
        )?;
        self.submit(spec).await
    }

    /// Allow `spender` to move up to `amount` of `owner`'s tokens.
    pub async fn approve(
        &self,
        owner: &str,
        spender: &str,
        amount: Decimal,
    ) -> Result<TransactionSigner> {
        let value = to_amount(amount, self.decimals().await?)?;
        ensure_sufficient_balance(&value, &self.balance(owner).await?)?;

        let from = parse_address(owner)?;
        let spender = parse_address(spender)?;
        let spec = self.invoker.build_call(
            "approve",
            &from,
            vec![address_arg(&spender), uint_arg(value.raw())],
        )?;
        self.submit(spec).await
    }

    async fn submit(&self, spec: ContractCallSpec) -> Result<TransactionSigner> {
        let raw = self.invoker.submit(&spec).await?;
        tracing::debug!(
            tx_id = %raw.tx_id,
            contract = %spec.contract,
            function = %spec.function.name,
            "Built token transaction"
        );
        Ok(TransactionSigner::new(raw, self.invoker.ledger().clone()))
    }
}

#[async_trait]
impl Asset for Token {
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
        if let Decimals::Fixed(decimals) = self.invoker.descriptor().decimals {
            return Ok(decimals);
        }
        let raw = uint_or_zero("decimals", self.invoker.call_read_cached("decimals").await?)?;
        u8::try_from(raw)
            .map_err(|_| TronError::RpcRequestError(format!("decimals out of range: {raw}")))
    }

    async fn balance(&self, owner: &str) -> Result<Amount> {
        let owner = parse_address(owner)?;
        let output = self
            .invoker
            .call_read_from("balanceOf", &[address_arg(&owner)], Some(&owner))
            .await?;
        Ok(Amount::new(
            uint_or_zero("balanceOf", output)?,
            self.decimals().await?,
        ))
    }
}
