// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native TRX.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::validation::{ensure_distinct, ensure_sufficient_balance, parse_address, to_amount};
use super::Asset;
use crate::blockchain::amount::Amount;
use crate::blockchain::ledger::LedgerClient;
use crate::blockchain::signer::TransactionSigner;
use crate::error::{Result, TronError};

/// Native coin name.
pub const COIN_NAME: &str = "Tron";

/// Native coin symbol.
pub const COIN_SYMBOL: &str = "TRX";

/// 1 TRX = 1,000,000 sun.
pub const COIN_DECIMALS: u8 = 6;

/// The ledger's native coin.
///
/// Balances are read straight from the account; transfers are native
/// `TransferContract` transactions and never touch a contract.
pub struct Coin {
    ledger: Arc<dyn LedgerClient>,
}

impl Coin {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Build a native transfer of `amount` TRX.
    pub async fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        amount: Decimal,
    ) -> Result<TransactionSigner> {
        let value = to_amount(amount, COIN_DECIMALS)?;
        let balance = self.balance(sender).await?;
        ensure_sufficient_balance(&value, &balance)?;
        ensure_distinct(sender, receiver)?;

        let from = parse_address(sender)?;
        let to = parse_address(receiver)?;

        let raw = self
            .ledger
            .create_transfer(&from, &to, value.raw())
            .await
            .map_err(|e| TronError::TransactionCreationFailed(e.to_string()))?;

        tracing::debug!(tx_id = %raw.tx_id, from = %from, to = %to, amount = %value, "Built TRX transfer");
        Ok(TransactionSigner::new(raw, self.ledger.clone()))
    }
}

#[async_trait]
impl Asset for Coin {
    async fn name(&self) -> Result<String> {
        Ok(COIN_NAME.to_string())
    }

    async fn symbol(&self) -> Result<String> {
        Ok(COIN_SYMBOL.to_string())
    }

    async fn decimals(&self) -> Result<u8> {
        Ok(COIN_DECIMALS)
    }

    async fn balance(&self, owner: &str) -> Result<Amount> {
        let owner = parse_address(owner)?;
        let sun = self
            .ledger
            .get_balance(&owner)
            .await
            .map_err(|e| TronError::RpcRequestError(e.to_string()))?;
        Ok(Amount::new(sun, COIN_DECIMALS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::ledger::LedgerError;
    use crate::blockchain::mock::{account, MockLedger};
    use alloy::primitives::U256;
    use rust_decimal_macros::dec;

    fn coin(ledger: MockLedger) -> (Arc<MockLedger>, Coin) {
        let ledger = Arc::new(ledger);
        (ledger.clone(), Coin::new(ledger))
    }

    #[tokio::test]
    async fn identity_is_fixed() {
        let (_, coin) = coin(MockLedger::new());
        assert_eq!(coin.name().await.unwrap(), "Tron");
        assert_eq!(coin.symbol().await.unwrap(), "TRX");
        assert_eq!(coin.decimals().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn balance_is_in_trx() {
        let a = account(0x11);
        let (_, coin) = coin(MockLedger::new().with_balance(a, 2_500_000));
        let balance = coin.balance(&a.to_base58()).await.unwrap();
        assert_eq!(balance.to_string(), "2.5");
        assert_eq!(balance.decimals(), 6);
    }

    #[tokio::test]
    async fn transfer_builds_native_payload() {
        let a = account(0x11);
        let b = account(0x22);
        let (ledger, coin) = coin(MockLedger::new().with_balance(a, 10_000_000));

        let signer = coin
            .transfer(&a.to_base58(), &b.to_base58(), dec!(1.25))
            .await
            .unwrap();
        assert!(!signer.raw_data().is_signed());
        assert_eq!(ledger.transfers(), vec![(a, b, U256::from(1_250_000u64))]);
    }

    #[tokio::test]
    async fn transfer_over_balance_is_insufficient() {
        let a = account(0x11);
        let (ledger, coin) = coin(MockLedger::new().with_balance(a, 10_000_000));

        let result = coin
            .transfer(&a.to_base58(), &account(0x22).to_base58(), dec!(15))
            .await;
        assert_eq!(result.unwrap_err(), TronError::InsufficientBalance);
        assert!(ledger.transfers().is_empty());
    }

    #[tokio::test]
    async fn transfer_to_self_is_invalid_address() {
        let a = account(0x11);
        let (_, coin) = coin(MockLedger::new().with_balance(a, 10_000_000));

        let sender = a.to_base58();
        let result = coin
            .transfer(&sender, &sender.to_lowercase(), dec!(5))
            .await;
        assert!(matches!(result, Err(TronError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn negative_amount_is_invalid() {
        let a = account(0x11);
        let (_, coin) = coin(MockLedger::new().with_balance(a, 10_000_000));
        let result = coin
            .transfer(&a.to_base58(), &account(0x22).to_base58(), dec!(-1))
            .await;
        assert_eq!(result.unwrap_err(), TronError::InvalidAmount);
    }

    #[tokio::test]
    async fn node_failure_is_creation_failure() {
        let a = account(0x11);
        let (_, coin) = coin(
            MockLedger::new()
                .with_balance(a, 10_000_000)
                .with_trigger_error(LedgerError::Rejected("account not activated".into())),
        );
        let result = coin
            .transfer(&a.to_base58(), &account(0x22).to_base58(), dec!(1))
            .await;
        assert!(matches!(
            result,
            Err(TronError::TransactionCreationFailed(msg)) if msg.contains("not activated")
        ));
    }
}
