// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ABI call codec.
//!
//! TRON contracts use the Solidity ABI unchanged, so encoding and decoding is
//! delegated to `alloy`'s dynamic ABI support. Addresses cross the ABI boundary
//! as their 20-byte account hash and are re-prefixed on the way out.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{B256, U256};

use super::address::Address;
use super::descriptor::{AssetDescriptor, FunctionDescriptor};
use super::ledger::LogEntry;

/// A decoded contract call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCall {
    pub function: String,
    pub args: Vec<DynSolValue>,
}

impl DecodedCall {
    pub fn arg(&self, index: usize) -> Option<&DynSolValue> {
        self.args.get(index)
    }
}

/// A decoded event log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub name: String,
    /// Contract that emitted the event
    pub address: Option<Address>,
    /// Indexed and non-indexed parameters in declaration order
    pub args: Vec<DynSolValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("unknown selector 0x{0}")]
    UnknownSelector(String),

    #[error("`{function}` expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("argument {index} of `{function}` does not match `{expected}`")]
    ArgumentType {
        function: String,
        index: usize,
        expected: String,
    },

    #[error("call data shorter than a selector")]
    Truncated,

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Encodes typed arguments into call data and decodes call data, return values
/// and event logs back into typed values.
pub trait AbiCodec: Send + Sync {
    fn encode_call(
        &self,
        function: &FunctionDescriptor,
        args: &[DynSolValue],
    ) -> Result<Vec<u8>, AbiError>;

    fn decode_call(
        &self,
        descriptor: &AssetDescriptor,
        data: &[u8],
    ) -> Result<DecodedCall, AbiError>;

    /// Decode the single declared return value; `None` for empty output.
    fn decode_output(
        &self,
        function: &FunctionDescriptor,
        data: &[u8],
    ) -> Result<Option<DynSolValue>, AbiError>;

    /// Decode every log the descriptor knows; unknown or malformed entries are skipped.
    fn decode_logs(&self, descriptor: &AssetDescriptor, logs: &[LogEntry]) -> Vec<DecodedEvent>;
}

/// [`AbiCodec`] backed by `alloy::dyn_abi`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorCodec;

impl AbiCodec for DescriptorCodec {
    fn encode_call(
        &self,
        function: &FunctionDescriptor,
        args: &[DynSolValue],
    ) -> Result<Vec<u8>, AbiError> {
        if args.len() != function.inputs.len() {
            return Err(AbiError::ArgumentCount {
                function: function.name.clone(),
                expected: function.inputs.len(),
                actual: args.len(),
            });
        }
        for (index, (kind, value)) in function.inputs.iter().zip(args).enumerate() {
            if !kind.to_sol_type().matches(value) {
                return Err(AbiError::ArgumentType {
                    function: function.name.clone(),
                    index,
                    expected: kind.canonical(),
                });
            }
        }

        let mut data = function.selector().to_vec();
        data.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        Ok(data)
    }

    fn decode_call(
        &self,
        descriptor: &AssetDescriptor,
        data: &[u8],
    ) -> Result<DecodedCall, AbiError> {
        if data.len() < 4 {
            return Err(AbiError::Truncated);
        }
        let (selector, params) = data.split_at(4);
        let function = descriptor
            .function_by_selector(selector)
            .ok_or_else(|| AbiError::UnknownSelector(alloy::hex::encode(selector)))?;

        let types = function.inputs.iter().map(|p| p.to_sol_type()).collect();
        let args = decode_params(types, params)?;

        Ok(DecodedCall {
            function: function.name.clone(),
            args,
        })
    }

    fn decode_output(
        &self,
        function: &FunctionDescriptor,
        data: &[u8],
    ) -> Result<Option<DynSolValue>, AbiError> {
        let Some(output) = function.output else {
            return Ok(None);
        };
        if data.is_empty() {
            return Ok(None);
        }
        let mut values = decode_params(vec![output.to_sol_type()], data)?;
        Ok(values.pop())
    }

    fn decode_logs(&self, descriptor: &AssetDescriptor, logs: &[LogEntry]) -> Vec<DecodedEvent> {
        logs.iter()
            .filter_map(|log| match decode_log(descriptor, log) {
                Ok(event) => event,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping undecodable log entry");
                    None
                }
            })
            .collect()
    }
}

fn decode_params(types: Vec<DynSolType>, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    match DynSolType::Tuple(types).abi_decode_params(data) {
        Ok(DynSolValue::Tuple(values)) => Ok(values),
        Ok(other) => Ok(vec![other]),
        Err(e) => Err(AbiError::Decode(e.to_string())),
    }
}

fn decode_log(
    descriptor: &AssetDescriptor,
    log: &LogEntry,
) -> Result<Option<DecodedEvent>, AbiError> {
    let topics = log
        .topics
        .iter()
        .map(|t| parse_word(t))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(signature) = topics.first() else {
        return Ok(None);
    };
    let Some(event) = descriptor.event_by_topic(signature) else {
        return Ok(None);
    };

    let data = alloy::hex::decode(log.data.trim_start_matches("0x"))
        .map_err(|e| AbiError::Decode(e.to_string()))?;
    let body_types = event
        .inputs
        .iter()
        .filter(|p| !p.indexed)
        .map(|p| p.kind.to_sol_type())
        .collect::<Vec<_>>();
    let mut body = if body_types.is_empty() {
        Vec::new()
    } else {
        decode_params(body_types, &data)?
    }
    .into_iter();

    let mut indexed = topics[1..].iter();
    let mut args = Vec::with_capacity(event.inputs.len());
    for param in &event.inputs {
        let value = if param.indexed {
            let word = indexed
                .next()
                .ok_or_else(|| AbiError::Decode(format!("missing topic for {}", event.name)))?;
            decode_topic(param.kind.to_sol_type(), word)?
        } else {
            body.next()
                .ok_or_else(|| AbiError::Decode(format!("missing data for {}", event.name)))?
        };
        args.push(value);
    }

    Ok(Some(DecodedEvent {
        name: event.name.clone(),
        address: log.address.parse().ok(),
        args,
    }))
}

fn parse_word(raw: &str) -> Result<B256, AbiError> {
    let bytes = alloy::hex::decode(raw.trim_start_matches("0x"))
        .map_err(|e| AbiError::Decode(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(AbiError::Decode(format!("topic length {}", bytes.len())));
    }
    Ok(B256::from_slice(&bytes))
}

/// Indexed dynamic values are stored as their hash; static ones decode as a word.
fn decode_topic(kind: DynSolType, word: &B256) -> Result<DynSolValue, AbiError> {
    match kind {
        DynSolType::String | DynSolType::Bytes => Ok(DynSolValue::FixedBytes(*word, 32)),
        other => decode_params(vec![other], word.as_slice())?
            .pop()
            .ok_or_else(|| AbiError::Decode("empty topic".to_string())),
    }
}

/// ABI value for a TRON address argument.
pub fn address_arg(address: &Address) -> DynSolValue {
    DynSolValue::Address(address.to_evm())
}

/// ABI value for a `uint256` argument.
pub fn uint_arg(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

/// Read an address out of a decoded value.
pub fn as_address(value: &DynSolValue) -> Option<Address> {
    match value {
        DynSolValue::Address(a) => Some(Address::from_evm(*a)),
        _ => None,
    }
}

/// Read an unsigned integer out of a decoded value.
pub fn as_uint(value: &DynSolValue) -> Option<U256> {
    match value {
        DynSolValue::Uint(v, _) => Some(*v),
        _ => None,
    }
}
