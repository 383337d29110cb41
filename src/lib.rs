// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Tron - Asset & Transaction Adapter for the TRON network
//!
//! A uniform model over native TRX, TRC-20 tokens, TRC-721 collections and
//! arbitrary contracts, backed by TronGrid.
//!
//! ## Modules
//!
//! - `assets` - Coin, Token, NFT and generic Contract variants
//! - `blockchain` - Addresses, ABI, ledger client, signing
//! - `config` - Environment configuration and logging setup
//! - `network` - Composition root ([`TronNetwork`])
//! - `transactions` - Transaction records, classification and views
//!
//! ## Flow
//!
//! ```text
//! TronNetwork ──► Token::transfer(..) ──► TransactionSigner
//!                                          │ sign(key)
//!                                          ▼
//!                                        send() ──► tx id
//!                                                     │
//! TronNetwork::transaction(id) ◄──────────────────────┘
//!   └─ wait() / get_status() / get_type()
//! ```

pub mod assets;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod network;
pub mod transactions;

pub use error::{Result, TronError};
pub use network::TronNetwork;
