// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory ledger double for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address as EvmAddress, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::abi::{AbiCodec, DescriptorCodec};
use super::address::Address;
use super::descriptor::FunctionDescriptor;
use super::ledger::{
    BroadcastResult, ContractCall, LedgerClient, LedgerError, LedgerTransaction, TransactionInfo,
    TRANSFER_CONTRACT, TRIGGER_SMART_CONTRACT,
};

type ReadResponse = Result<Option<Vec<u8>>, LedgerError>;

#[derive(Default)]
struct MockState {
    balances: HashMap<Address, U256>,
    /// `(contract, call-data prefix, response)`; the longest matching prefix wins
    reads: Vec<(Address, Vec<u8>, ReadResponse)>,
    transactions: HashMap<String, LedgerTransaction>,
    /// Successive receipt answers per id; the last one repeats
    infos: HashMap<String, VecDeque<Option<TransactionInfo>>>,
    block_number: u64,
    energy: Option<u64>,
    broadcast: Option<BroadcastResult>,
    trigger_error: Option<LedgerError>,
    transport_down: bool,
    triggered: Vec<ContractCall>,
    transfers: Vec<(Address, Address, U256)>,
    broadcasts: Vec<LedgerTransaction>,
    constant_calls: usize,
    info_calls: usize,
}

/// Scriptable [`LedgerClient`].
#[derive(Default)]
pub(crate) struct MockLedger {
    state: Mutex<MockState>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(self, f: impl FnOnce(&mut MockState)) -> Self {
        f(&mut *self.state.lock().unwrap());
        self
    }

    pub fn with_balance(self, owner: Address, sun: u64) -> Self {
        self.with(|s| {
            s.balances.insert(owner, U256::from(sun));
        })
    }

    /// Answer calls to `function` with `args` on `contract` with `output`.
    ///
    /// Passing fewer args than the function declares matches any trailing args.
    pub fn with_read(
        self,
        contract: Address,
        function: &FunctionDescriptor,
        args: &[DynSolValue],
        output: DynSolValue,
    ) -> Self {
        let encoded = DynSolValue::Tuple(vec![output]).abi_encode_params();
        self.with_read_response(contract, function, args, Ok(Some(encoded)))
    }

    /// Make calls to `function` on `contract` fail.
    pub fn with_read_error(self, contract: Address, function: &FunctionDescriptor) -> Self {
        self.with_read_response(
            contract,
            function,
            &[],
            Err(LedgerError::Rejected("REVERT opcode executed".to_string())),
        )
    }

    /// Make calls to `function` on `contract` return nothing.
    pub fn with_empty_read(self, contract: Address, function: &FunctionDescriptor) -> Self {
        self.with_read_response(contract, function, &[], Ok(None))
    }

    fn with_read_response(
        self,
        contract: Address,
        function: &FunctionDescriptor,
        args: &[DynSolValue],
        response: ReadResponse,
    ) -> Self {
        let mut prefix = function.selector().to_vec();
        if !args.is_empty() {
            prefix.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        }
        self.with(|s| s.reads.push((contract, prefix, response)))
    }

    pub fn with_transaction(self, tx: LedgerTransaction) -> Self {
        self.with(|s| {
            s.transactions.insert(tx.tx_id.clone(), tx);
        })
    }

    pub fn with_info(self, info: TransactionInfo) -> Self {
        let id = info.id.clone();
        self.with_info_sequence(&id, vec![Some(info)])
    }

    /// Receipt answers returned one per query, the last one repeating.
    pub fn with_info_sequence(self, id: &str, infos: Vec<Option<TransactionInfo>>) -> Self {
        self.with(|s| {
            s.infos.insert(id.to_string(), infos.into());
        })
    }

    pub fn with_block_number(self, height: u64) -> Self {
        self.with(|s| s.block_number = height)
    }

    pub fn with_energy(self, energy: u64) -> Self {
        self.with(|s| s.energy = Some(energy))
    }

    pub fn with_broadcast(self, result: BroadcastResult) -> Self {
        self.with(|s| s.broadcast = Some(result))
    }

    pub fn with_trigger_error(self, error: LedgerError) -> Self {
        self.with(|s| s.trigger_error = Some(error))
    }

    /// Fail every transaction and receipt lookup with a transport error.
    pub fn with_transport_down(self) -> Self {
        self.with(|s| s.transport_down = true)
    }

    pub fn triggered(&self) -> Vec<ContractCall> {
        self.state.lock().unwrap().triggered.clone()
    }

    pub fn transfers(&self) -> Vec<(Address, Address, U256)> {
        self.state.lock().unwrap().transfers.clone()
    }

    pub fn broadcasts(&self) -> Vec<LedgerTransaction> {
        self.state.lock().unwrap().broadcasts.clone()
    }

    pub fn constant_calls(&self) -> usize {
        self.state.lock().unwrap().constant_calls
    }

    pub fn info_calls(&self) -> usize {
        self.state.lock().unwrap().info_calls
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_balance(&self, owner: &Address) -> Result<U256, LedgerError> {
        let state = self.state.lock().unwrap();
        Ok(state.balances.get(owner).copied().unwrap_or(U256::ZERO))
    }

    async fn get_block_number(&self) -> Result<u64, LedgerError> {
        Ok(self.state.lock().unwrap().block_number)
    }

    async fn get_transaction(&self, id: &str) -> Result<Option<LedgerTransaction>, LedgerError> {
        let state = self.state.lock().unwrap();
        if state.transport_down {
            return Err(LedgerError::Transport("connection refused".to_string()));
        }
        Ok(state.transactions.get(id).cloned())
    }

    async fn get_transaction_info(
        &self,
        id: &str,
    ) -> Result<Option<TransactionInfo>, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.transport_down {
            return Err(LedgerError::Transport("connection refused".to_string()));
        }
        state.info_calls += 1;
        let Some(queue) = state.infos.get_mut(id) else {
            return Ok(None);
        };
        if queue.len() > 1 {
            Ok(queue.pop_front().flatten())
        } else {
            Ok(queue.front().cloned().flatten())
        }
    }

    async fn trigger_contract(&self, call: &ContractCall) -> Result<LedgerTransaction, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = &state.trigger_error {
            return Err(error.clone());
        }
        state.triggered.push(call.clone());
        Ok(trigger_transaction(&call.owner, &call.contract, &call.data))
    }

    async fn call_constant(&self, call: &ContractCall) -> Result<Option<Vec<u8>>, LedgerError> {
        let mut state = self.state.lock().unwrap();
        state.constant_calls += 1;
        state
            .reads
            .iter()
            .filter(|(contract, prefix, _)| {
                *contract == call.contract && call.data.starts_with(prefix)
            })
            .max_by_key(|(_, prefix, _)| prefix.len())
            .map(|(_, _, response)| response.clone())
            .unwrap_or_else(|| Err(LedgerError::Rejected("no contract code".to_string())))
    }

    async fn create_transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<LedgerTransaction, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = &state.trigger_error {
            return Err(error.clone());
        }
        state.transfers.push((*from, *to, amount));
        let sun = u64::try_from(amount)
            .map_err(|_| LedgerError::Rejected("amount exceeds int64".to_string()))?;
        Ok(transfer_transaction(from, to, sun))
    }

    async fn estimate_energy(&self, _call: &ContractCall) -> Result<u64, LedgerError> {
        self.state
            .lock()
            .unwrap()
            .energy
            .ok_or_else(|| LedgerError::Rejected("estimateenergy disabled".to_string()))
    }

    async fn broadcast(&self, tx: &LedgerTransaction) -> Result<BroadcastResult, LedgerError> {
        let mut state = self.state.lock().unwrap();
        state.broadcasts.push(tx.clone());
        Ok(state.broadcast.clone().unwrap_or_else(|| BroadcastResult {
            result: true,
            txid: Some(tx.tx_id.clone()),
            ..Default::default()
        }))
    }
}

/// Test account whose 20-byte hash repeats `byte`.
pub(crate) fn account(byte: u8) -> Address {
    Address::from_evm(EvmAddress::repeat_byte(byte))
}

/// A transaction whose id is consistent with its (JSON-serialized) raw data.
pub(crate) fn build_transaction(raw_data: Value) -> LedgerTransaction {
    let raw = serde_json::to_vec(&raw_data).unwrap();
    LedgerTransaction {
        tx_id: alloy::hex::encode(Sha256::digest(&raw)),
        raw_data,
        raw_data_hex: alloy::hex::encode(&raw),
        signature: Vec::new(),
        ret: Vec::new(),
        visible: true,
    }
}

pub(crate) fn transfer_transaction(from: &Address, to: &Address, sun: u64) -> LedgerTransaction {
    build_transaction(json!({
        "contract": [{
            "type": TRANSFER_CONTRACT,
            "parameter": {
                "type_url": "type.googleapis.com/protocol.TransferContract",
                "value": {
                    "owner_address": from.to_base58(),
                    "to_address": to.to_base58(),
                    "amount": sun,
                }
            }
        }],
        "expiration": 1_714_619_205_000u64,
    }))
}

pub(crate) fn trigger_transaction(owner: &Address, contract: &Address, data: &[u8]) -> LedgerTransaction {
    build_transaction(json!({
        "contract": [{
            "type": TRIGGER_SMART_CONTRACT,
            "parameter": {
                "type_url": "type.googleapis.com/protocol.TriggerSmartContract",
                "value": {
                    "owner_address": owner.to_base58(),
                    "contract_address": contract.to_base58(),
                    "data": alloy::hex::encode(data),
                }
            }
        }],
        "fee_limit": 100_000_000u64,
    }))
}

/// Encode a call for a known function, for building fixtures.
pub(crate) fn call_data(function: &FunctionDescriptor, args: &[DynSolValue]) -> Vec<u8> {
    DescriptorCodec.encode_call(function, args).unwrap()
}

/// A successful receipt in `block`.
pub(crate) fn confirmed_info(id: &str, block: u64) -> TransactionInfo {
    TransactionInfo {
        id: id.to_string(),
        fee: 1_100_000,
        block_number: block,
        block_timestamp: 1_714_619_148_000,
        ..Default::default()
    }
}

/// A reverted receipt in `block`.
pub(crate) fn reverted_info(id: &str, block: u64) -> TransactionInfo {
    let mut info = confirmed_info(id, block);
    info.result = Some("FAILED".to_string());
    info.receipt.result = Some("REVERT".to_string());
    info
}
