// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed contract descriptors.
//!
//! A descriptor is the closed, typed description of a contract's callable
//! functions, emitted events and asset metadata. The TRC-20 and TRC-721
//! standards ship as static data; callers may build custom descriptors for
//! non-standard contracts.

use std::sync::{Arc, LazyLock};

use alloy::dyn_abi::DynSolType;
use alloy::primitives::{keccak256, Selector, B256};

/// ABI parameter types understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Address,
    Bool,
    Bytes,
    /// `bytesN`, 1..=32
    FixedBytes(usize),
    /// `intN`
    Int(usize),
    String,
    /// `uintN`
    Uint(usize),
}

impl ParamType {
    /// Canonical Solidity name used in signatures.
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Bool => "bool".to_string(),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::FixedBytes(n) => format!("bytes{n}"),
            ParamType::Int(bits) => format!("int{bits}"),
            ParamType::String => "string".to_string(),
            ParamType::Uint(bits) => format!("uint{bits}"),
        }
    }

    pub fn to_sol_type(self) -> DynSolType {
        match self {
            ParamType::Address => DynSolType::Address,
            ParamType::Bool => DynSolType::Bool,
            ParamType::Bytes => DynSolType::Bytes,
            ParamType::FixedBytes(n) => DynSolType::FixedBytes(n),
            ParamType::Int(bits) => DynSolType::Int(bits),
            ParamType::String => DynSolType::String,
            ParamType::Uint(bits) => DynSolType::Uint(bits),
        }
    }
}

/// Whether a function changes contract state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    View,
    NonPayable,
    Payable,
}

/// One callable function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub inputs: Vec<ParamType>,
    /// Single declared return value, if any
    pub output: Option<ParamType>,
    pub mutability: Mutability,
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<ParamType>,
        output: Option<ParamType>,
        mutability: Mutability,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            output,
            mutability,
        }
    }

    /// `name(type,type,...)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.inputs.iter().map(ParamType::canonical).collect();
        format!("{}({})", self.name, params.join(","))
    }

    pub fn selector(&self) -> Selector {
        let hash = keccak256(self.signature().as_bytes());
        Selector::from_slice(&hash[..4])
    }

    pub fn is_read_only(&self) -> bool {
        self.mutability == Mutability::View
    }
}

/// One event parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventParam {
    pub kind: ParamType,
    pub indexed: bool,
}

/// One emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub name: String,
    pub inputs: Vec<EventParam>,
}

impl EventDescriptor {
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.inputs.iter().map(|p| p.kind.canonical()).collect();
        format!("{}({})", self.name, params.join(","))
    }

    /// `topics[0]` of every log this event emits.
    pub fn topic(&self) -> B256 {
        keccak256(self.signature().as_bytes())
    }
}

/// How an asset's decimals are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decimals {
    Fixed(u8),
    /// Read from the contract's `decimals()` function
    Dynamic,
}

/// Full description of a contract interface and its asset metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// Static name; `None` reads `name()` from the contract
    pub name: Option<String>,
    /// Static symbol; `None` reads `symbol()` from the contract
    pub symbol: Option<String>,
    pub decimals: Decimals,
    pub functions: Vec<FunctionDescriptor>,
    pub events: Vec<EventDescriptor>,
}

impl AssetDescriptor {
    /// An empty descriptor to be filled with `with_function` / `with_event`.
    pub fn custom() -> Self {
        Self {
            name: None,
            symbol: None,
            decimals: Decimals::Dynamic,
            functions: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_function(mut self, function: FunctionDescriptor) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_event(mut self, event: EventDescriptor) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_metadata(mut self, name: &str, symbol: &str, decimals: Decimals) -> Self {
        self.name = Some(name.to_string());
        self.symbol = Some(symbol.to_string());
        self.decimals = decimals;
        self
    }

    /// First function with this name.
    ///
    /// Overloads (e.g. the two `safeTransferFrom` arities) are resolved by
    /// [`AssetDescriptor::function_with_arity`].
    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn function_with_arity(&self, name: &str, arity: usize) -> Option<&FunctionDescriptor> {
        self.functions
            .iter()
            .find(|f| f.name == name && f.inputs.len() == arity)
    }

    pub fn function_by_selector(&self, selector: &[u8]) -> Option<&FunctionDescriptor> {
        self.functions
            .iter()
            .find(|f| f.selector().as_slice() == selector)
    }

    pub fn event_by_topic(&self, topic: &B256) -> Option<&EventDescriptor> {
        self.events.iter().find(|e| &e.topic() == topic)
    }
}

fn view(name: &str, inputs: Vec<ParamType>, output: ParamType) -> FunctionDescriptor {
    FunctionDescriptor::new(name, inputs, Some(output), Mutability::View)
}

fn write(name: &str, inputs: Vec<ParamType>, output: Option<ParamType>) -> FunctionDescriptor {
    FunctionDescriptor::new(name, inputs, output, Mutability::NonPayable)
}

fn event(name: &str, inputs: &[(ParamType, bool)]) -> EventDescriptor {
    EventDescriptor {
        name: name.to_string(),
        inputs: inputs
            .iter()
            .map(|(kind, indexed)| EventParam {
                kind: *kind,
                indexed: *indexed,
            })
            .collect(),
    }
}

use ParamType::{Address as A, Bool as B, Bytes as Bs, String as S, Uint};

const U256T: ParamType = Uint(256);

/// TRC-20 fungible token standard.
pub static TRC20: LazyLock<Arc<AssetDescriptor>> = LazyLock::new(|| {
    Arc::new(AssetDescriptor {
        name: None,
        symbol: None,
        decimals: Decimals::Dynamic,
        functions: vec![
            view("name", vec![], S),
            view("symbol", vec![], S),
            view("decimals", vec![], Uint(8)),
            view("totalSupply", vec![], U256T),
            view("balanceOf", vec![A], U256T),
            view("allowance", vec![A, A], U256T),
            write("transfer", vec![A, U256T], Some(B)),
            write("approve", vec![A, U256T], Some(B)),
            write("transferFrom", vec![A, A, U256T], Some(B)),
        ],
        events: vec![
            event("Transfer", &[(A, true), (A, true), (U256T, false)]),
            event("Approval", &[(A, true), (A, true), (U256T, false)]),
        ],
    })
});

/// TRC-721 non-fungible token standard (with metadata extension).
pub static TRC721: LazyLock<Arc<AssetDescriptor>> = LazyLock::new(|| {
    Arc::new(AssetDescriptor {
        name: None,
        symbol: None,
        decimals: Decimals::Fixed(0),
        functions: vec![
            view("name", vec![], S),
            view("symbol", vec![], S),
            view("tokenURI", vec![U256T], S),
            view("balanceOf", vec![A], U256T),
            view("ownerOf", vec![U256T], A),
            view("getApproved", vec![U256T], A),
            view("isApprovedForAll", vec![A, A], B),
            write("approve", vec![A, U256T], None),
            write("setApprovalForAll", vec![A, B], None),
            write("transferFrom", vec![A, A, U256T], None),
            write("safeTransferFrom", vec![A, A, U256T], None),
            write("safeTransferFrom", vec![A, A, U256T, Bs], None),
        ],
        events: vec![
            event("Transfer", &[(A, true), (A, true), (U256T, true)]),
            event("Approval", &[(A, true), (A, true), (U256T, true)]),
            event("ApprovalForAll", &[(A, true), (A, true), (B, false)]),
        ],
    })
});
