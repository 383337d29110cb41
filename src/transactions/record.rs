// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction records.
//!
//! A [`TransactionRecord`] is a lazy view of one transaction id. The body and
//! execution receipt are fetched on first use and memoized once the receipt is
//! attached; from then on the record never goes back to the ledger for them,
//! so a resolved status cannot change.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::classify::{classify_payload, PayloadKind};
use crate::blockchain::abi::{uint_arg, AbiCodec, DecodedEvent};
use crate::blockchain::address::Address;
use crate::blockchain::amount::Amount;
use crate::blockchain::contract::ContractInvoker;
use crate::blockchain::descriptor::{AssetDescriptor, TRC721};
use crate::blockchain::ledger::{LedgerClient, LedgerTransaction, TransactionInfo};
use crate::blockchain::signing;
use crate::blockchain::types::{NetworkConfig, TransactionStatus, TransactionType};
use crate::error::{Result, TronError};

/// Default delay between polls in [`TransactionRecord::wait`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4000);

/// Fees are charged in sun.
const FEE_DECIMALS: u8 = 6;

/// Transaction body plus its receipt, when one is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionData {
    pub body: LedgerTransaction,
    pub info: Option<TransactionInfo>,
}

impl TransactionData {
    pub fn is_executed(&self) -> bool {
        self.info.is_some()
    }
}

/// Options for [`TransactionRecord::wait_with`].
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub interval: Duration,
    /// Give up (returning `Pending`) after this long
    pub timeout: Option<Duration>,
    /// Give up (returning `Pending`) once cancelled
    pub cancel: Option<CancellationToken>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
            cancel: None,
        }
    }
}

impl WaitOptions {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Lazily fetched view of one transaction.
pub struct TransactionRecord {
    id: String,
    network: Arc<NetworkConfig>,
    ledger: Arc<dyn LedgerClient>,
    codec: Arc<dyn AbiCodec>,
    data: OnceLock<Arc<TransactionData>>,
}

impl fmt::Debug for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionRecord")
            .field("id", &self.id)
            .field("memoized", &self.data.get().is_some())
            .finish_non_exhaustive()
    }
}

impl TransactionRecord {
    pub fn new(
        id: impl Into<String>,
        network: Arc<NetworkConfig>,
        ledger: Arc<dyn LedgerClient>,
        codec: Arc<dyn AbiCodec>,
    ) -> Self {
        Self {
            id: id.into(),
            network,
            ledger,
            codec,
            data: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    pub fn codec(&self) -> &Arc<dyn AbiCodec> {
        &self.codec
    }

    /// Body and receipt of the transaction; `None` while the ledger does not
    /// know the id.
    pub async fn get_data(&self) -> Result<Option<Arc<TransactionData>>> {
        if let Some(data) = self.data.get() {
            return Ok(Some(data.clone()));
        }

        let body = self
            .ledger
            .get_transaction(&self.id)
            .await
            .map_err(|e| TronError::RpcRequestError(e.to_string()))?;
        let Some(body) = body else {
            return Ok(None);
        };

        let info = self
            .ledger
            .get_transaction_info(&self.id)
            .await
            .map_err(|e| TronError::RpcRequestError(e.to_string()))?;

        let data = Arc::new(TransactionData { body, info });
        if !data.is_executed() {
            return Ok(Some(data));
        }
        Ok(Some(self.data.get_or_init(|| data).clone()))
    }

    /// Execution status; `Confirmed` and `Failed` are final.
    pub async fn get_status(&self) -> Result<TransactionStatus> {
        let Some(data) = self.get_data().await? else {
            return Ok(TransactionStatus::Pending);
        };
        let Some(info) = &data.info else {
            return Ok(TransactionStatus::Pending);
        };

        let body_failed = data
            .body
            .ret
            .first()
            .and_then(|r| r.contract_ret.as_deref())
            .is_some_and(|r| !r.eq_ignore_ascii_case("SUCCESS"));

        if info.is_failure() || body_failed {
            Ok(TransactionStatus::Failed)
        } else {
            Ok(TransactionStatus::Confirmed)
        }
    }

    /// Poll every 4 seconds until the status resolves.
    pub async fn wait(&self) -> TransactionStatus {
        self.wait_with(WaitOptions::default()).await
    }

    /// Poll until the status resolves, the timeout elapses or `cancel` fires.
    ///
    /// Never fails: a lookup error resolves to `Failed`, and giving up early
    /// returns `Pending`.
    pub async fn wait_with(&self, options: WaitOptions) -> TransactionStatus {
        let deadline = options.timeout.map(|t| Instant::now() + t);

        loop {
            match self.get_status().await {
                Ok(TransactionStatus::Pending) => {}
                Ok(status) => return status,
                Err(e) => {
                    tracing::warn!(tx_id = %self.id, error = %e, "Transaction lookup failed while waiting");
                    return TransactionStatus::Failed;
                }
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return TransactionStatus::Pending;
                    }
                    options.interval.min(deadline - now)
                }
                None => options.interval,
            };

            match &options.cancel {
                Some(token) => {
                    tokio::select! {
                        _ = tokio::time::sleep(pause) => {},
                        _ = token.cancelled() => return TransactionStatus::Pending,
                    }
                }
                None => tokio::time::sleep(pause).await,
            }
        }
    }

    /// Kind of operation the transaction performs.
    ///
    /// A standard token selector is told apart from an NFT one by probing the
    /// target with `ownerOf(1)`: only a returned value means NFT.
    pub async fn get_type(&self) -> Result<TransactionType> {
        let Some(data) = self.get_data().await? else {
            return Ok(TransactionType::General);
        };

        Ok(match classify_payload(&data.body) {
            PayloadKind::CoinTransfer => TransactionType::Coin,
            PayloadKind::ContractCall => TransactionType::Contract,
            PayloadKind::Other => TransactionType::General,
            PayloadKind::StandardCall { contract: None } => TransactionType::Token,
            PayloadKind::StandardCall {
                contract: Some(contract),
            } => {
                if self.probe_nft(contract).await {
                    TransactionType::Nft
                } else {
                    TransactionType::Token
                }
            }
        })
    }

    async fn probe_nft(&self, contract: Address) -> bool {
        let invoker = ContractInvoker::new(
            contract,
            TRC721.clone(),
            self.ledger.clone(),
            self.codec.clone(),
        );
        match invoker
            .call_read("ownerOf", &[uint_arg(U256::from(1u64))])
            .await
        {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                tracing::debug!(contract = %contract, error = %e, "ownerOf probe failed");
                false
            }
        }
    }

    /// Account that signed the transaction.
    pub async fn signer(&self) -> Result<Option<Address>> {
        let Some(data) = self.get_data().await? else {
            return Ok(None);
        };
        let owner = data
            .body
            .contract()
            .and_then(|c| c.parameter.value.owner_address)
            .and_then(|a| a.parse().ok());
        if owner.is_some() {
            return Ok(owner);
        }
        Ok(signing::recover_signer(&data.body).ok())
    }

    /// Total fee paid, in TRX; zero until executed.
    pub async fn fee(&self) -> Result<Amount> {
        let fee = self.info_field(|info| info.fee).await?;
        Ok(Amount::new(U256::from(fee), FEE_DECIMALS))
    }

    /// Block that included the transaction; `0` until executed.
    pub async fn block_number(&self) -> Result<u64> {
        self.info_field(|info| info.block_number).await
    }

    /// Block time in seconds; `0` until executed.
    pub async fn block_timestamp(&self) -> Result<u64> {
        self.info_field(|info| info.block_timestamp / 1000).await
    }

    /// Block time as a UTC instant; `None` until executed.
    pub async fn block_time(&self) -> Result<Option<DateTime<Utc>>> {
        let millis = self.info_field(|info| info.block_timestamp).await?;
        if millis == 0 {
            return Ok(None);
        }
        Ok(i64::try_from(millis)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis))
    }

    /// Blocks produced since inclusion; `0` until executed.
    pub async fn confirmations(&self) -> Result<u64> {
        let block = self.block_number().await?;
        if block == 0 {
            return Ok(0);
        }
        let height = self
            .ledger
            .get_block_number()
            .await
            .map_err(|e| TronError::RpcRequestError(e.to_string()))?;
        Ok(height.saturating_sub(block))
    }

    /// Explorer link for this transaction.
    pub fn url(&self) -> String {
        self.network.transaction_url(&self.id)
    }

    /// Receipt logs the descriptor knows how to decode.
    pub async fn events(&self, descriptor: &AssetDescriptor) -> Result<Vec<DecodedEvent>> {
        let Some(data) = self.get_data().await? else {
            return Ok(Vec::new());
        };
        Ok(match &data.info {
            Some(info) => self.codec.decode_logs(descriptor, &info.log),
            None => Vec::new(),
        })
    }

    async fn info_field(&self, field: impl Fn(&TransactionInfo) -> u64) -> Result<u64> {
        Ok(self
            .get_data()
            .await?
            .and_then(|data| data.info.as_ref().map(&field))
            .unwrap_or(0))
    }
}
