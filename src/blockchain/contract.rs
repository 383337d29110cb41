// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract invocation against a described interface.
//!
//! [`ContractInvoker`] turns named, typed calls into ledger calls and decodes
//! their results. Reads execute immediately as constant calls; writes are
//! captured as a [`ContractCallSpec`] and only reach the ledger through
//! [`ContractInvoker::submit`].

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address as EvmAddress, I256, U256};
use lru::LruCache;

use super::abi::AbiCodec;
use super::address::Address;
use super::descriptor::{AssetDescriptor, FunctionDescriptor};
use super::ledger::{ContractCall, LedgerClient, LedgerTransaction};
use crate::error::{Result, TronError};

/// Default fee ceiling for contract calls: 100 TRX in sun.
pub const DEFAULT_FEE_LIMIT: u64 = 100_000_000;

/// Distinct argument-free reads an invoker keeps.
const READ_CACHE_CAPACITY: usize = 16;

/// A state-changing call ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCallSpec {
    pub contract: Address,
    pub function: FunctionDescriptor,
    pub args: Vec<DynSolValue>,
    /// Maximum fee in sun
    pub fee_limit: u64,
    /// Invoking account
    pub from: Address,
    /// TRX attached to the call, in sun
    pub call_value: u64,
}

impl ContractCallSpec {
    pub fn with_fee_limit(mut self, fee_limit: u64) -> Self {
        self.fee_limit = fee_limit;
        self
    }

    pub fn with_call_value(mut self, call_value: u64) -> Self {
        self.call_value = call_value;
        self
    }
}

/// Decoded return value of a read call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutput {
    Address(Address),
    Bool(bool),
    Bytes(Vec<u8>),
    Int(I256),
    /// Sanitized to `[A-Za-z0-9._-]`
    String(String),
    Uint(U256),
}

impl CallOutput {
    fn from_value(value: DynSolValue) -> Option<Self> {
        match value {
            DynSolValue::Address(a) => Some(CallOutput::Address(Address::from_evm(a))),
            DynSolValue::Bool(b) => Some(CallOutput::Bool(b)),
            DynSolValue::Bytes(b) => Some(CallOutput::Bytes(b)),
            DynSolValue::FixedBytes(word, size) => {
                Some(CallOutput::Bytes(word[..size.min(32)].to_vec()))
            }
            DynSolValue::Int(i, _) => Some(CallOutput::Int(i)),
            DynSolValue::String(s) => Some(CallOutput::String(sanitize(&s))),
            DynSolValue::Uint(u, _) => Some(CallOutput::Uint(u)),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            CallOutput::Uint(u) => Some(*u),
            CallOutput::Int(i) if !i.is_negative() => Some(i.into_raw()),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            CallOutput::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CallOutput::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CallOutput::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for CallOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallOutput::Address(a) => write!(f, "{a}"),
            CallOutput::Bool(b) => write!(f, "{b}"),
            CallOutput::Bytes(b) => write!(f, "0x{}", alloy::hex::encode(b)),
            CallOutput::Int(i) if i.is_negative() => write!(f, "-0x{:x}", i.unsigned_abs()),
            CallOutput::Int(i) => write!(f, "0x{:x}", i.into_raw()),
            CallOutput::String(s) => f.write_str(s),
            CallOutput::Uint(u) => write!(f, "0x{u:x}"),
        }
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Read and write calls against one contract.
pub struct ContractInvoker {
    address: Address,
    descriptor: Arc<AssetDescriptor>,
    ledger: Arc<dyn LedgerClient>,
    codec: Arc<dyn AbiCodec>,
    /// Argument-free read results, keyed by function name
    cache: Mutex<LruCache<String, CallOutput>>,
}

impl fmt::Debug for ContractInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractInvoker")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl ContractInvoker {
    pub fn new(
        address: Address,
        descriptor: Arc<AssetDescriptor>,
        ledger: Arc<dyn LedgerClient>,
        codec: Arc<dyn AbiCodec>,
    ) -> Self {
        Self {
            address,
            descriptor,
            ledger,
            codec,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(READ_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn descriptor(&self) -> &Arc<AssetDescriptor> {
        &self.descriptor
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    pub fn codec(&self) -> &Arc<dyn AbiCodec> {
        &self.codec
    }

    /// Resolve `method` for the given number of arguments.
    pub fn function(&self, method: &str, arity: usize) -> Option<&FunctionDescriptor> {
        self.descriptor
            .function_with_arity(method, arity)
            .or_else(|| self.descriptor.function(method))
    }

    /// Encoded call data (selector included) for `method(args)`.
    pub fn encode(&self, method: &str, args: &[DynSolValue]) -> Result<Vec<u8>> {
        let function = self
            .function(method, args.len())
            .ok_or_else(|| TronError::TransactionCreationFailed(format!("unknown function `{method}`")))?;
        self.codec
            .encode_call(function, args)
            .map_err(|e| TronError::TransactionCreationFailed(e.to_string()))
    }

    /// Execute a read call and decode its return value.
    pub async fn call_read(&self, method: &str, args: &[DynSolValue]) -> Result<Option<CallOutput>> {
        self.call_read_from(method, args, None).await
    }

    /// [`ContractInvoker::call_read`] issued on behalf of `from`.
    pub async fn call_read_from(
        &self,
        method: &str,
        args: &[DynSolValue],
        from: Option<&Address>,
    ) -> Result<Option<CallOutput>> {
        let value = self.call_read_value(method, args, from).await?;
        Ok(value.and_then(CallOutput::from_value))
    }

    /// Execute a read call and return the raw decoded value, unsanitized.
    pub async fn call_read_value(
        &self,
        method: &str,
        args: &[DynSolValue],
        from: Option<&Address>,
    ) -> Result<Option<DynSolValue>> {
        let function = self
            .function(method, args.len())
            .ok_or_else(|| TronError::RpcRequestError(format!("unknown function `{method}`")))?;
        let data = self
            .codec
            .encode_call(function, args)
            .map_err(|e| TronError::RpcRequestError(e.to_string()))?;

        let call = ContractCall {
            contract: self.address,
            owner: from
                .copied()
                .unwrap_or_else(|| Address::from_evm(EvmAddress::ZERO)),
            data,
            fee_limit: DEFAULT_FEE_LIMIT,
            call_value: 0,
        };

        let output = self
            .ledger
            .call_constant(&call)
            .await
            .map_err(|e| TronError::RpcRequestError(e.to_string()))?;
        let Some(output) = output else {
            return Ok(None);
        };

        self.codec
            .decode_output(function, &output)
            .map_err(|e| TronError::RpcRequestError(e.to_string()))
    }

    /// Read an argument-free function once and reuse the result.
    ///
    /// Only successful, non-empty results are cached. Functions that declare
    /// inputs are rejected, since the cache key is the name alone.
    pub async fn call_read_cached(&self, method: &str) -> Result<Option<CallOutput>> {
        let function = self
            .descriptor
            .function_with_arity(method, 0)
            .ok_or_else(|| {
                TronError::RpcRequestError(format!("`{method}` is not an argument-free function"))
            })?;

        if let Some(hit) = self.cache.lock().ok().and_then(|mut c| c.get(method).cloned()) {
            return Ok(Some(hit));
        }

        let name = function.name.clone();
        let result = self.call_read(&name, &[]).await?;
        if let Some(output) = &result {
            if let Ok(mut cache) = self.cache.lock() {
                cache.put(name, output.clone());
            }
        }
        Ok(result)
    }

    /// Describe a state-changing call without executing it.
    pub fn build_call(
        &self,
        method: &str,
        from: &Address,
        args: Vec<DynSolValue>,
    ) -> Result<ContractCallSpec> {
        let function = self
            .function(method, args.len())
            .ok_or_else(|| TronError::TransactionCreationFailed(format!("unknown function `{method}`")))?
            .clone();
        self.codec
            .encode_call(&function, &args)
            .map_err(|e| TronError::TransactionCreationFailed(e.to_string()))?;

        Ok(ContractCallSpec {
            contract: self.address,
            function,
            args,
            fee_limit: DEFAULT_FEE_LIMIT,
            from: *from,
            call_value: 0,
        })
    }

    /// Predicted energy for `method(args)` sent by `from`; `0` when unknown.
    pub async fn estimate_resource_cost(
        &self,
        method: &str,
        args: &[DynSolValue],
        from: &Address,
    ) -> u64 {
        let data = match self.encode(method, args) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(method, error = %e, "Resource estimation skipped");
                return 0;
            }
        };
        let call = ContractCall {
            contract: self.address,
            owner: *from,
            data,
            fee_limit: DEFAULT_FEE_LIMIT,
            call_value: 0,
        };
        match self.ledger.estimate_energy(&call).await {
            Ok(energy) => energy,
            Err(e) => {
                tracing::debug!(method, error = %e, "Resource estimation failed");
                0
            }
        }
    }

    /// Have the ledger build the unsigned transaction for `spec`.
    pub async fn submit(&self, spec: &ContractCallSpec) -> Result<LedgerTransaction> {
        let data = self
            .codec
            .encode_call(&spec.function, &spec.args)
            .map_err(|e| TronError::TransactionCreationFailed(e.to_string()))?;
        let call = ContractCall {
            contract: spec.contract,
            owner: spec.from,
            data,
            fee_limit: spec.fee_limit,
            call_value: spec.call_value,
        };
        self.ledger
            .trigger_contract(&call)
            .await
            .map_err(|e| TronError::TransactionCreationFailed(e.to_string()))
    }
}
