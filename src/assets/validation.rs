// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer validation shared by every asset variant.
//!
//! Each check runs right before a payload is built. Nothing is held between
//! the check and the broadcast, so a balance or approval can still change in
//! between.

use alloy::primitives::U256;
use rust_decimal::Decimal;

use crate::blockchain::address::{same_address, Address};
use crate::blockchain::amount::Amount;
use crate::error::{Result, TronError};

/// Parse a caller-supplied address.
pub fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse()
        .map_err(|e| TronError::InvalidAddress(format!("{raw}: {e}")))
}

/// Convert a human amount to base units; negative or over-precise is invalid.
pub fn to_amount(amount: Decimal, decimals: u8) -> Result<Amount> {
    Amount::from_decimal(amount, decimals)
}

pub fn ensure_sufficient_balance(amount: &Amount, balance: &Amount) -> Result<()> {
    if amount > balance {
        return Err(TronError::InsufficientBalance);
    }
    Ok(())
}

/// A native transfer to oneself is rejected.
pub fn ensure_distinct(sender: &str, receiver: &str) -> Result<()> {
    if same_address(sender, receiver) {
        return Err(TronError::InvalidAddress(
            "sender and receiver are the same".to_string(),
        ));
    }
    Ok(())
}

/// Delegated fungible transfer against the owner's allowance for the spender.
pub fn ensure_within_allowance(amount: &Amount, allowance: &Amount) -> Result<()> {
    if allowance.is_zero() {
        return Err(TronError::UnauthorizedAddress);
    }
    if amount > allowance {
        return Err(TronError::InvalidAmount);
    }
    Ok(())
}

/// Non-fungible operations need the owner to hold at least one unit.
pub fn ensure_holds_units(units: U256) -> Result<()> {
    if units.is_zero() {
        return Err(TronError::InsufficientBalance);
    }
    Ok(())
}

/// The claimed owner must be the token's current owner.
pub fn ensure_owner(claimed: &Address, actual: Option<&Address>) -> Result<()> {
    match actual {
        Some(actual) if actual == claimed => Ok(()),
        _ => Err(TronError::UnauthorizedAddress),
    }
}

/// The spender must be the owner or the approved party.
pub fn ensure_spender(spender: &Address, owner: &Address, approved: Option<&Address>) -> Result<()> {
    if spender == owner || approved == Some(spender) {
        return Ok(());
    }
    Err(TronError::UnauthorizedAddress)
}
