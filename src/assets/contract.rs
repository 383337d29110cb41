// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Generic contract access without asset semantics.

use alloy::dyn_abi::DynSolValue;

use super::validation::parse_address;
use crate::blockchain::address::Address;
use crate::blockchain::contract::{CallOutput, ContractCallSpec, ContractInvoker};
use crate::blockchain::signer::TransactionSigner;
use crate::error::Result;

/// Options for a read call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Account the read is issued from
    pub from: Option<Address>,
}

impl CallOptions {
    pub fn from_address(address: Address) -> Self {
        Self {
            from: Some(address),
        }
    }
}

/// Raw passthrough to any described contract.
#[derive(Debug)]
pub struct Contract {
    invoker: ContractInvoker,
}

impl Contract {
    pub fn new(invoker: ContractInvoker) -> Self {
        Self { invoker }
    }

    pub fn address(&self) -> &Address {
        self.invoker.address()
    }

    pub fn invoker(&self) -> &ContractInvoker {
        &self.invoker
    }

    /// Execute a read-only function.
    pub async fn call_method(
        &self,
        method: &str,
        args: &[DynSolValue],
        options: CallOptions,
    ) -> Result<Option<CallOutput>> {
        self.invoker
            .call_read_from(method, args, options.from.as_ref())
            .await
    }

    /// Read an argument-free function once and reuse the result.
    pub async fn call_method_cached(&self, method: &str) -> Result<Option<CallOutput>> {
        self.invoker.call_read_cached(method).await
    }

    /// Encoded call data for `method(args)`.
    pub fn get_method_data(&self, method: &str, args: &[DynSolValue]) -> Result<Vec<u8>> {
        self.invoker.encode(method, args)
    }

    /// Describe a state-changing call from `from`.
    pub fn create_transaction_data(
        &self,
        method: &str,
        from: &str,
        args: Vec<DynSolValue>,
    ) -> Result<ContractCallSpec> {
        let from = parse_address(from)?;
        self.invoker.build_call(method, &from, args)
    }

    /// Predicted energy for `method(args)`; `0` when the node cannot tell.
    pub async fn estimate_resource_cost(
        &self,
        method: &str,
        args: &[DynSolValue],
        from: &str,
    ) -> u64 {
        match parse_address(from) {
            Ok(from) => self.invoker.estimate_resource_cost(method, args, &from).await,
            Err(_) => 0,
        }
    }

    /// Have the ledger build the unsigned transaction for `spec`.
    pub async fn submit(&self, spec: &ContractCallSpec) -> Result<TransactionSigner> {
        let raw = self.invoker.submit(spec).await?;
        Ok(TransactionSigner::new(raw, self.invoker.ledger().clone()))
    }
}
