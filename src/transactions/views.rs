// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-asset views over a [`TransactionRecord`].
//!
//! Each view wraps a record and derives sender, receiver and amount from it.
//! Fields of a transaction the ledger does not know yet, or whose call data
//! does not decode, fall back to `None` and zero.

use std::sync::Arc;

use alloy::primitives::U256;
use rust_decimal::Decimal;
use tokio::sync::OnceCell;

use super::derived::{call_fields, coin_fields, verify, TransferFields};
use super::record::TransactionRecord;
use crate::assets::coin::COIN_DECIMALS;
use crate::assets::{Asset, Token};
use crate::blockchain::abi::DecodedCall;
use crate::blockchain::address::Address;
use crate::blockchain::amount::Amount;
use crate::blockchain::contract::ContractInvoker;
use crate::blockchain::descriptor::{AssetDescriptor, Decimals};
use crate::blockchain::ledger::TRIGGER_SMART_CONTRACT;
use crate::blockchain::types::{AssetDirection, TransactionStatus};
use crate::error::Result;

/// Native TRX transfer.
#[derive(Debug)]
pub struct CoinTransaction {
    record: TransactionRecord,
}

impl CoinTransaction {
    pub fn new(record: TransactionRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &TransactionRecord {
        &self.record
    }

    async fn fields(&self) -> Result<TransferFields> {
        let Some(data) = self.record.get_data().await? else {
            return Ok(TransferFields::default());
        };
        let signer = self.record.signer().await?;
        Ok(coin_fields(&data.body, signer))
    }

    pub async fn sender(&self) -> Result<Option<Address>> {
        Ok(self.fields().await?.sender)
    }

    pub async fn receiver(&self) -> Result<Option<Address>> {
        Ok(self.fields().await?.receiver)
    }

    /// Amount moved, in TRX.
    pub async fn amount(&self) -> Result<Amount> {
        Ok(Amount::new(self.fields().await?.amount, COIN_DECIMALS))
    }

    pub async fn verify_transfer(
        &self,
        direction: AssetDirection,
        counterparty: &str,
        expected: Decimal,
    ) -> Result<TransactionStatus> {
        let status = self.record.get_status().await?;
        if status == TransactionStatus::Pending {
            return Ok(status);
        }
        let fields = self.fields().await?;
        let amount_matches = matches_amount(fields.amount, COIN_DECIMALS, expected);
        Ok(verify(status, &fields, direction, counterparty, amount_matches))
    }
}

/// Contract trigger decoded against a descriptor.
#[derive(Debug)]
pub struct ContractTransaction {
    record: TransactionRecord,
    descriptor: Arc<AssetDescriptor>,
}

impl ContractTransaction {
    pub fn new(record: TransactionRecord, descriptor: Arc<AssetDescriptor>) -> Self {
        Self { record, descriptor }
    }

    pub fn record(&self) -> &TransactionRecord {
        &self.record
    }

    pub fn descriptor(&self) -> &Arc<AssetDescriptor> {
        &self.descriptor
    }

    /// Contract the transaction targets.
    pub async fn address(&self) -> Result<Option<Address>> {
        let Some(data) = self.record.get_data().await? else {
            return Ok(None);
        };
        Ok(data
            .body
            .contract()
            .filter(|c| c.kind == TRIGGER_SMART_CONTRACT)
            .and_then(|c| c.parameter.value.contract_address)
            .and_then(|a| a.parse().ok()))
    }

    /// Function and arguments of the call; `None` when the data does not
    /// match any function of the descriptor.
    pub async fn decoded_call(&self) -> Result<Option<DecodedCall>> {
        let Some(data) = self.record.get_data().await? else {
            return Ok(None);
        };
        let Some(hex) = data
            .body
            .contract()
            .and_then(|c| c.parameter.value.data)
        else {
            return Ok(None);
        };
        let Ok(bytes) = alloy::hex::decode(hex.trim_start_matches("0x")) else {
            return Ok(None);
        };

        match self.record.codec().decode_call(&self.descriptor, &bytes) {
            Ok(call) => Ok(Some(call)),
            Err(e) => {
                tracing::debug!(tx_id = %self.record.id(), error = %e, "Call data did not decode");
                Ok(None)
            }
        }
    }

    pub(crate) async fn transfer_fields(&self) -> Result<TransferFields> {
        let Some(call) = self.decoded_call().await? else {
            return Ok(TransferFields::default());
        };
        let signer = self.record.signer().await?;
        Ok(call_fields(&call, signer))
    }
}

/// TRC-20 transfer.
#[derive(Debug)]
pub struct TokenTransaction {
    contract: ContractTransaction,
    decimals: OnceCell<u8>,
}

impl TokenTransaction {
    pub fn new(record: TransactionRecord, descriptor: Arc<AssetDescriptor>) -> Self {
        Self {
            contract: ContractTransaction::new(record, descriptor),
            decimals: OnceCell::new(),
        }
    }

    pub fn record(&self) -> &TransactionRecord {
        self.contract.record()
    }

    pub fn contract(&self) -> &ContractTransaction {
        &self.contract
    }

    pub async fn sender(&self) -> Result<Option<Address>> {
        Ok(self.contract.transfer_fields().await?.sender)
    }

    pub async fn receiver(&self) -> Result<Option<Address>> {
        Ok(self.contract.transfer_fields().await?.receiver)
    }

    /// Amount moved, at the token's decimals.
    pub async fn amount(&self) -> Result<Amount> {
        let raw = self.contract.transfer_fields().await?.amount;
        Ok(Amount::new(raw, self.decimals().await?))
    }

    pub async fn verify_transfer(
        &self,
        direction: AssetDirection,
        counterparty: &str,
        expected: Decimal,
    ) -> Result<TransactionStatus> {
        let status = self.record().get_status().await?;
        if status == TransactionStatus::Pending {
            return Ok(status);
        }
        let fields = self.contract.transfer_fields().await?;
        let decimals = self.decimals().await?;
        let amount_matches = matches_amount(fields.amount, decimals, expected);
        Ok(verify(status, &fields, direction, counterparty, amount_matches))
    }

    /// Declared decimals, or the target contract's `decimals()`; read once.
    async fn decimals(&self) -> Result<u8> {
        let descriptor = self.contract.descriptor();
        if let Decimals::Fixed(decimals) = descriptor.decimals {
            return Ok(decimals);
        }
        self.decimals
            .get_or_try_init(|| self.read_decimals(descriptor))
            .await
            .copied()
    }

    async fn read_decimals(&self, descriptor: &Arc<AssetDescriptor>) -> Result<u8> {
        let Some(address) = self.contract.address().await? else {
            return Ok(0);
        };
        let record = self.record();
        let token = Token::new(ContractInvoker::new(
            address,
            descriptor.clone(),
            record.ledger().clone(),
            record.codec().clone(),
        ));
        token.decimals().await
    }
}

/// TRC-721 transfer.
#[derive(Debug)]
pub struct NftTransaction {
    contract: ContractTransaction,
}

impl NftTransaction {
    pub fn new(record: TransactionRecord, descriptor: Arc<AssetDescriptor>) -> Self {
        Self {
            contract: ContractTransaction::new(record, descriptor),
        }
    }

    pub fn record(&self) -> &TransactionRecord {
        self.contract.record()
    }

    pub fn contract(&self) -> &ContractTransaction {
        &self.contract
    }

    pub async fn sender(&self) -> Result<Option<Address>> {
        Ok(self.contract.transfer_fields().await?.sender)
    }

    pub async fn receiver(&self) -> Result<Option<Address>> {
        Ok(self.contract.transfer_fields().await?.receiver)
    }

    /// Id of the token moved; zero when unknown.
    pub async fn nft_id(&self) -> Result<U256> {
        Ok(self.contract.transfer_fields().await?.amount)
    }

    pub async fn verify_transfer(
        &self,
        direction: AssetDirection,
        counterparty: &str,
        nft_id: U256,
    ) -> Result<TransactionStatus> {
        let status = self.record().get_status().await?;
        if status == TransactionStatus::Pending {
            return Ok(status);
        }
        let fields = self.contract.transfer_fields().await?;
        let id_matches = fields.amount == nft_id;
        Ok(verify(status, &fields, direction, counterparty, id_matches))
    }
}

/// Numeric comparison at `decimals`; an expectation finer than the asset
/// supports can never match.
fn matches_amount(raw: U256, decimals: u8, expected: Decimal) -> bool {
    Amount::from_decimal(expected, decimals)
        .map(|expected| expected == Amount::new(raw, decimals))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::abi::{address_arg, uint_arg, AbiCodec, DescriptorCodec};
    use crate::blockchain::descriptor::{TRC20, TRC721};
    use crate::blockchain::ledger::LedgerTransaction;
    use crate::blockchain::mock::{
        account, call_data, confirmed_info, reverted_info, transfer_transaction, trigger_transaction,
        MockLedger,
    };
    use crate::blockchain::types::NetworkConfig;
    use alloy::dyn_abi::DynSolValue;
    use rust_decimal_macros::dec;

    const TOKEN: u8 = 0xaa;

    fn record_of(ledger: MockLedger, tx: &LedgerTransaction) -> (Arc<MockLedger>, TransactionRecord) {
        let ledger = Arc::new(ledger);
        let codec: Arc<dyn AbiCodec> = Arc::new(DescriptorCodec);
        let record = TransactionRecord::new(
            tx.tx_id.clone(),
            Arc::new(NetworkConfig::nile()),
            ledger.clone(),
            codec,
        );
        (ledger, record)
    }

    fn executed(tx: &LedgerTransaction) -> MockLedger {
        MockLedger::new()
            .with_transaction(tx.clone())
            .with_info(confirmed_info(&tx.tx_id, 10))
    }

    fn token_transfer(to: u8, raw: u64) -> LedgerTransaction {
        let data = call_data(
            TRC20.function("transfer").unwrap(),
            &[address_arg(&account(to)), uint_arg(U256::from(raw))],
        );
        trigger_transaction(&account(1), &account(TOKEN), &data)
    }

    fn with_six_decimals(ledger: MockLedger) -> MockLedger {
        ledger.with_read(
            account(TOKEN),
            TRC20.function("decimals").unwrap(),
            &[],
            DynSolValue::Uint(U256::from(6u64), 8),
        )
    }

    #[tokio::test]
    async fn coin_fields_and_verification() {
        let tx = transfer_transaction(&account(1), &account(2), 2_500_000);
        let (_, record) = record_of(executed(&tx), &tx);
        let coin = CoinTransaction::new(record);

        assert_eq!(coin.sender().await.unwrap(), Some(account(1)));
        assert_eq!(coin.receiver().await.unwrap(), Some(account(2)));
        assert_eq!(coin.amount().await.unwrap().to_string(), "2.5");

        let receiver = account(2).to_base58();
        let sender = account(1).to_base58();
        let check = |direction: AssetDirection, who: &str, amount: Decimal| {
            let who = who.to_string();
            let coin = &coin;
            async move { coin.verify_transfer(direction, &who, amount).await.unwrap() }
        };
        assert_eq!(check(AssetDirection::Incoming, &receiver, dec!(2.5)).await, TransactionStatus::Confirmed);
        assert_eq!(check(AssetDirection::Incoming, &receiver, dec!(2.500)).await, TransactionStatus::Confirmed);
        assert_eq!(check(AssetDirection::Outgoing, &sender, dec!(2.5)).await, TransactionStatus::Confirmed);
        assert_eq!(check(AssetDirection::Incoming, &sender, dec!(2.5)).await, TransactionStatus::Failed);
        assert_eq!(check(AssetDirection::Incoming, &receiver, dec!(2.4)).await, TransactionStatus::Failed);
        assert_eq!(
            check(AssetDirection::Incoming, &receiver, dec!(2.5000001)).await,
            TransactionStatus::Failed
        );
    }

    #[tokio::test]
    async fn pending_short_circuits_before_comparison() {
        let tx = transfer_transaction(&account(1), &account(2), 1);
        let (_, record) = record_of(MockLedger::new().with_transaction(tx.clone()), &tx);
        let coin = CoinTransaction::new(record);
        assert_eq!(
            coin.verify_transfer(AssetDirection::Incoming, "anyone", dec!(999))
                .await
                .unwrap(),
            TransactionStatus::Pending
        );
    }

    #[tokio::test]
    async fn reverted_transfer_does_not_verify() {
        let tx = transfer_transaction(&account(1), &account(2), 1_000_000);
        let ledger = MockLedger::new()
            .with_transaction(tx.clone())
            .with_info(reverted_info(&tx.tx_id, 10));
        let (_, record) = record_of(ledger, &tx);
        let coin = CoinTransaction::new(record);
        assert_eq!(
            coin.verify_transfer(AssetDirection::Incoming, &account(2).to_base58(), dec!(1))
                .await
                .unwrap(),
            TransactionStatus::Failed
        );
    }

    #[tokio::test]
    async fn token_transfer_reads_decimals_once() {
        let tx = token_transfer(2, 2_500_000);
        let (ledger, record) = record_of(with_six_decimals(executed(&tx)), &tx);
        let token = TokenTransaction::new(record, TRC20.clone());

        assert_eq!(token.contract().address().await.unwrap(), Some(account(TOKEN)));
        assert_eq!(token.sender().await.unwrap(), Some(account(1)));
        assert_eq!(token.receiver().await.unwrap(), Some(account(2)));
        assert_eq!(token.amount().await.unwrap().to_string(), "2.5");
        assert_eq!(
            token
                .verify_transfer(AssetDirection::Incoming, &account(2).to_hex(), dec!(2.50))
                .await
                .unwrap(),
            TransactionStatus::Confirmed
        );
        assert_eq!(
            token
                .verify_transfer(AssetDirection::Incoming, &account(2).to_base58(), dec!(25))
                .await
                .unwrap(),
            TransactionStatus::Failed
        );
        assert_eq!(ledger.constant_calls(), 1);
    }

    #[tokio::test]
    async fn token_transfer_from_takes_sender_from_args() {
        let data = call_data(
            TRC20.function("transferFrom").unwrap(),
            &[
                address_arg(&account(3)),
                address_arg(&account(4)),
                uint_arg(U256::from(10u64)),
            ],
        );
        let tx = trigger_transaction(&account(1), &account(TOKEN), &data);
        let (_, record) = record_of(executed(&tx), &tx);
        let token = TokenTransaction::new(
            record,
            Arc::new(
                (**TRC20)
                    .clone()
                    .with_metadata("Tether USD", "USDT", Decimals::Fixed(6)),
            ),
        );

        assert_eq!(token.sender().await.unwrap(), Some(account(3)));
        assert_eq!(token.receiver().await.unwrap(), Some(account(4)));
        assert_eq!(token.amount().await.unwrap().to_string(), "0.00001");
        assert_eq!(
            token
                .verify_transfer(AssetDirection::Outgoing, &account(3).to_base58(), dec!(0.00001))
                .await
                .unwrap(),
            TransactionStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn undecodable_call_falls_back_to_defaults() {
        let tx = trigger_transaction(&account(1), &account(TOKEN), &[0xde, 0xad, 0xbe, 0xef]);
        let (_, record) = record_of(with_six_decimals(executed(&tx)), &tx);
        let token = TokenTransaction::new(record, TRC20.clone());

        assert_eq!(token.contract().decoded_call().await.unwrap(), None);
        assert_eq!(token.sender().await.unwrap(), None);
        assert_eq!(token.receiver().await.unwrap(), None);
        assert!(token.amount().await.unwrap().is_zero());
        assert_eq!(
            token
                .verify_transfer(AssetDirection::Incoming, &account(2).to_base58(), dec!(0))
                .await
                .unwrap(),
            TransactionStatus::Failed
        );
    }

    #[tokio::test]
    async fn nft_transfer_compares_token_id() {
        let data = call_data(
            TRC721.function_with_arity("safeTransferFrom", 3).unwrap(),
            &[
                address_arg(&account(3)),
                address_arg(&account(4)),
                uint_arg(U256::from(77u64)),
            ],
        );
        let tx = trigger_transaction(&account(3), &account(0xcc), &data);
        let (_, record) = record_of(executed(&tx), &tx);
        let nft = NftTransaction::new(record, TRC721.clone());

        assert_eq!(nft.nft_id().await.unwrap(), U256::from(77u64));
        assert_eq!(nft.sender().await.unwrap(), Some(account(3)));
        assert_eq!(nft.receiver().await.unwrap(), Some(account(4)));
        let receiver = account(4).to_base58();
        assert_eq!(
            nft.verify_transfer(AssetDirection::Incoming, &receiver, U256::from(77u64))
                .await
                .unwrap(),
            TransactionStatus::Confirmed
        );
        assert_eq!(
            nft.verify_transfer(AssetDirection::Incoming, &receiver, U256::from(78u64))
                .await
                .unwrap(),
            TransactionStatus::Failed
        );
    }

    #[tokio::test]
    async fn unknown_transaction_has_default_fields() {
        let tx = transfer_transaction(&account(1), &account(2), 1);
        let (_, record) = record_of(MockLedger::new(), &tx);
        let nft = NftTransaction::new(record, TRC721.clone());
        assert_eq!(nft.contract().address().await.unwrap(), None);
        assert_eq!(nft.nft_id().await.unwrap(), U256::ZERO);
        assert_eq!(nft.sender().await.unwrap(), None);
    }
}
