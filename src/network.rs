// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Composition root.
//!
//! [`TronNetwork`] owns the configuration, the ledger client and the ABI codec
//! and hands them to every asset and transaction it creates.

use std::sync::Arc;

use crate::assets::validation::parse_address;
use crate::assets::{Coin, Contract, Nft, Token};
use crate::blockchain::abi::{AbiCodec, DescriptorCodec};
use crate::blockchain::client::TronClient;
use crate::blockchain::contract::ContractInvoker;
use crate::blockchain::descriptor::{AssetDescriptor, TRC20, TRC721};
use crate::blockchain::ledger::{LedgerClient, LedgerTransaction};
use crate::blockchain::signer::TransactionSigner;
use crate::blockchain::types::NetworkConfig;
use crate::config::network_config_from_env;
use crate::error::{Result, TronError};
use crate::transactions::{
    CoinTransaction, ContractTransaction, NftTransaction, TokenTransaction, TransactionRecord,
};

/// Entry point tying a network configuration to its collaborators.
#[derive(Clone)]
pub struct TronNetwork {
    config: Arc<NetworkConfig>,
    ledger: Arc<dyn LedgerClient>,
    codec: Arc<dyn AbiCodec>,
}

impl std::fmt::Debug for TronNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TronNetwork")
            .field("network", &self.config.name)
            .field("rpc_url", &self.config.rpc_url)
            .finish_non_exhaustive()
    }
}

impl TronNetwork {
    /// Connect to TronGrid with `config`.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        url::Url::parse(&config.explorer_url)
            .map_err(|e| TronError::Configuration(format!("explorer URL: {e}")))?;
        let client =
            TronClient::new(config.clone()).map_err(|e| TronError::Configuration(e.to_string()))?;
        tracing::info!(network = %config.name, rpc_url = %config.rpc_url, "TRON network configured");
        Ok(Self::with_ledger(config, Arc::new(client)))
    }

    /// Configure from the environment; see [`crate::config`].
    pub fn from_env() -> Result<Self> {
        Self::new(network_config_from_env()?)
    }

    /// Use an existing ledger client.
    pub fn with_ledger(config: NetworkConfig, ledger: Arc<dyn LedgerClient>) -> Self {
        Self {
            config: Arc::new(config),
            ledger,
            codec: Arc::new(DescriptorCodec),
        }
    }

    /// Replace the ABI codec.
    pub fn with_codec(mut self, codec: Arc<dyn AbiCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    pub fn codec(&self) -> &Arc<dyn AbiCodec> {
        &self.codec
    }

    // =========================================================================
    // Assets
    // =========================================================================

    pub fn coin(&self) -> Coin {
        Coin::new(self.ledger.clone())
    }

    /// TRC-20 token at `address`.
    pub fn token(&self, address: &str) -> Result<Token> {
        self.token_with(address, TRC20.clone())
    }

    pub fn token_with(&self, address: &str, descriptor: Arc<AssetDescriptor>) -> Result<Token> {
        Ok(Token::new(self.invoker(address, descriptor)?))
    }

    /// TRC-721 collection at `address`.
    pub fn nft(&self, address: &str) -> Result<Nft> {
        self.nft_with(address, TRC721.clone())
    }

    pub fn nft_with(&self, address: &str, descriptor: Arc<AssetDescriptor>) -> Result<Nft> {
        Ok(Nft::new(self.invoker(address, descriptor)?))
    }

    /// Any contract, described by `descriptor`.
    pub fn contract(&self, address: &str, descriptor: Arc<AssetDescriptor>) -> Result<Contract> {
        Ok(Contract::new(self.invoker(address, descriptor)?))
    }

    fn invoker(&self, address: &str, descriptor: Arc<AssetDescriptor>) -> Result<ContractInvoker> {
        Ok(ContractInvoker::new(
            parse_address(address)?,
            descriptor,
            self.ledger.clone(),
            self.codec.clone(),
        ))
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    pub fn transaction(&self, id: &str) -> TransactionRecord {
        TransactionRecord::new(
            id,
            self.config.clone(),
            self.ledger.clone(),
            self.codec.clone(),
        )
    }

    pub fn coin_transaction(&self, id: &str) -> CoinTransaction {
        CoinTransaction::new(self.transaction(id))
    }

    pub fn token_transaction(&self, id: &str) -> TokenTransaction {
        TokenTransaction::new(self.transaction(id), TRC20.clone())
    }

    pub fn nft_transaction(&self, id: &str) -> NftTransaction {
        NftTransaction::new(self.transaction(id), TRC721.clone())
    }

    pub fn contract_transaction(
        &self,
        id: &str,
        descriptor: Arc<AssetDescriptor>,
    ) -> ContractTransaction {
        ContractTransaction::new(self.transaction(id), descriptor)
    }

    /// Wrap an unsigned transaction built elsewhere for signing.
    pub fn signer(&self, raw: LedgerTransaction) -> TransactionSigner {
        TransactionSigner::new(raw, self.ledger.clone())
    }
}
