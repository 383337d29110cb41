// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-point asset amounts.
//!
//! An [`Amount`] is an integer count of base units (sun for TRX, the token's
//! smallest unit for TRC-20) together with the decimal exponent that turns it
//! into a human-readable value. Comparisons rescale both sides to a common
//! exponent first, so `1.5 @ 6` equals `1.50 @ 18`.

use std::cmp::Ordering;
use std::fmt;

use alloy::primitives::U256;
use rust_decimal::Decimal;

use crate::error::{Result, TronError};

/// A non-negative amount with an explicit number of decimals.
#[derive(Debug, Clone, Copy)]
pub struct Amount {
    raw: U256,
    decimals: u8,
}

impl Amount {
    pub const fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub const fn zero(decimals: u8) -> Self {
        Self {
            raw: U256::ZERO,
            decimals,
        }
    }

    /// Convert a human-readable decimal into base units.
    ///
    /// Negative values and values with more fractional digits than the asset
    /// supports are rejected with `InvalidAmount`.
    pub fn from_decimal(value: Decimal, decimals: u8) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(TronError::InvalidAmount);
        }
        let value = value.normalize();
        let scale = value.scale();
        if scale > u32::from(decimals) {
            return Err(TronError::InvalidAmount);
        }
        let mantissa = u128::try_from(value.mantissa()).map_err(|_| TronError::InvalidAmount)?;
        let factor = pow10(u32::from(decimals) - scale).ok_or(TronError::InvalidAmount)?;
        let raw = U256::from(mantissa)
            .checked_mul(factor)
            .ok_or(TronError::InvalidAmount)?;
        Ok(Self { raw, decimals })
    }

    /// Parse a human-readable amount (e.g. `"1.5"`) into base units.
    pub fn parse(amount: &str, decimals: u8) -> Result<Self> {
        let amount = amount.trim();
        if amount.starts_with('-') {
            return Err(TronError::InvalidAmount);
        }

        let parts: Vec<&str> = amount.split('.').collect();
        if parts.len() > 2 || parts.iter().all(|part| part.is_empty()) {
            return Err(TronError::InvalidAmount);
        }

        let whole = if parts[0].is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(parts[0], 10).map_err(|_| TronError::InvalidAmount)?
        };

        let fraction = if parts.len() == 2 {
            let dec_str = parts[1].trim_end_matches('0');
            if dec_str.len() > decimals as usize {
                return Err(TronError::InvalidAmount);
            }
            // Pad with zeros to match decimals
            let padded = format!("{:0<width$}", dec_str, width = decimals as usize);
            if padded.is_empty() {
                U256::ZERO
            } else {
                U256::from_str_radix(&padded, 10).map_err(|_| TronError::InvalidAmount)?
            }
        } else {
            U256::ZERO
        };

        let multiplier = pow10(u32::from(decimals)).ok_or(TronError::InvalidAmount)?;
        let raw = whole
            .checked_mul(multiplier)
            .and_then(|w| w.checked_add(fraction))
            .ok_or(TronError::InvalidAmount)?;

        Ok(Self { raw, decimals })
    }

    /// Integer count of base units.
    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// `0x`-prefixed hex of the base-unit count, as contract calls expect.
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.raw)
    }

    /// Base units rescaled up to `decimals`, or `None` on overflow.
    fn scaled_to(&self, decimals: u8) -> Option<U256> {
        let exp = u32::from(decimals.saturating_sub(self.decimals));
        self.raw.checked_mul(pow10(exp)?)
    }
}

fn pow10(exp: u32) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exp))
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.decimals.max(other.decimals);
        match (self.scaled_to(scale), other.scaled_to(scale)) {
            (Some(a), Some(b)) => a.cmp(&b),
            // Whichever side overflowed is the larger one.
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.raw, self.decimals))
    }
}

/// Format base units as a human-readable amount without trailing zeros.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }
    let Some(divisor) = pow10(u32::from(decimals)) else {
        return amount.to_string();
    };
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(
            Amount::parse("1", 6).unwrap().raw(),
            U256::from(1_000_000u64)
        );
        assert_eq!(
            Amount::parse("1.5", 18).unwrap().raw(),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(
            Amount::parse("0.001", 6).unwrap().raw(),
            U256::from(1_000u64)
        );
        assert_eq!(Amount::parse("1.50", 1).unwrap().raw(), U256::from(15u64));
    }

    #[test]
    fn parse_rejects_negative_and_overprecise() {
        assert_eq!(Amount::parse("-1", 6), Err(TronError::InvalidAmount));
        assert_eq!(Amount::parse("0.0000001", 6), Err(TronError::InvalidAmount));
        assert_eq!(Amount::parse("1.2.3", 6), Err(TronError::InvalidAmount));
        assert_eq!(Amount::parse("abc", 6), Err(TronError::InvalidAmount));
    }

    #[test]
    fn parse_needs_at_least_one_digit() {
        assert_eq!(Amount::parse(".", 6), Err(TronError::InvalidAmount));
        assert_eq!(Amount::parse("", 6), Err(TronError::InvalidAmount));
        assert_eq!(Amount::parse("  ", 6), Err(TronError::InvalidAmount));
        assert_eq!(Amount::parse(".5", 6).unwrap().raw(), U256::from(500_000u64));
        assert_eq!(Amount::parse("5.", 6).unwrap().raw(), U256::from(5_000_000u64));
    }

    #[test]
    fn from_decimal_scales_to_asset_precision() {
        let amount = Amount::from_decimal(dec!(2.5), 6).unwrap();
        assert_eq!(amount.raw(), U256::from(2_500_000u64));
        assert_eq!(amount.to_hex(), "0x2625a0");

        let trailing = Amount::from_decimal(dec!(2.500000000), 6).unwrap();
        assert_eq!(trailing.raw(), U256::from(2_500_000u64));

        assert_eq!(
            Amount::from_decimal(dec!(-0.1), 6),
            Err(TronError::InvalidAmount)
        );
        assert_eq!(
            Amount::from_decimal(dec!(0.0000001), 6),
            Err(TronError::InvalidAmount)
        );
    }

    #[test]
    fn comparison_is_numeric_across_scales() {
        let six = Amount::parse("1.5", 6).unwrap();
        let eighteen = Amount::parse("1.50", 18).unwrap();
        assert_eq!(six, eighteen);

        let ten = Amount::parse("10", 6).unwrap();
        let fifteen = Amount::parse("15", 18).unwrap();
        assert!(fifteen > ten);
        assert!(Amount::zero(0) < Amount::parse("0.000001", 6).unwrap());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Amount::parse("1.100", 6).unwrap().to_string(), "1.1");
        assert_eq!(Amount::new(U256::from(1_000_000u64), 6).to_string(), "1");
        assert_eq!(Amount::zero(18).to_string(), "0");
        assert_eq!(format_amount(U256::from(7u64), 0), "7");
    }
}
