// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TRON address codec.
//!
//! A TRON address is 21 bytes: the `0x41` network prefix followed by the same
//! 20-byte account hash an EVM chain would use. It has two textual forms:
//!
//! - display form: base58check (`T…`, 34 characters)
//! - canonical hex form: `41` + 40 hex characters
//!
//! Contract ABI encoding uses only the trailing 20 bytes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use alloy::primitives::{keccak256, Address as EvmAddress};
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Network prefix byte of every mainnet/testnet account address.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Length of the checksum appended before base58 encoding.
const CHECKSUM_LEN: usize = 4;

/// A parsed TRON address.
#[derive(Clone, Copy, Eq)]
pub struct Address([u8; 21]);

impl Address {
    /// Wrap a 20-byte account hash with the TRON prefix.
    pub fn from_evm(address: EvmAddress) -> Self {
        let mut bytes = [0u8; 21];
        bytes[0] = ADDRESS_PREFIX;
        bytes[1..].copy_from_slice(address.as_slice());
        Self(bytes)
    }

    /// Derive the account address controlled by a secp256k1 public key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        Self::from_evm(EvmAddress::from_slice(&hash[12..]))
    }

    /// Canonical 21-byte form.
    pub fn as_bytes(&self) -> &[u8; 21] {
        &self.0
    }

    /// The 20-byte account hash used in ABI encoding.
    pub fn to_evm(&self) -> EvmAddress {
        EvmAddress::from_slice(&self.0[1..])
    }

    /// `41`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        alloy::hex::encode(self.0)
    }

    /// Base58check display form.
    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(21 + CHECKSUM_LEN);
        payload.extend_from_slice(&self.0);
        payload.extend_from_slice(&checksum(&self.0));
        bs58::encode(payload).into_string()
    }

    /// Whether every account-hash byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0[1..].iter().all(|b| *b == 0)
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&second[..CHECKSUM_LEN]);
    out
}

/// Errors produced while parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("checksum mismatch")]
    Checksum,

    #[error("unexpected length {0}")]
    Length(usize),

    #[error("unexpected network prefix 0x{0:02x}")]
    Prefix(u8),
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts base58check, `41…` hex, or a bare/`0x` 20-byte hex hash.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();

        if raw.starts_with('T') && raw.len() == 34 {
            let decoded = bs58::decode(raw)
                .into_vec()
                .map_err(|e| AddressError::Base58(e.to_string()))?;
            if decoded.len() != 21 + CHECKSUM_LEN {
                return Err(AddressError::Length(decoded.len()));
            }
            let (payload, sum) = decoded.split_at(21);
            if checksum(payload) != sum {
                return Err(AddressError::Checksum);
            }
            return from_prefixed(payload);
        }

        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        let bytes = alloy::hex::decode(hex).map_err(|e| AddressError::Hex(e.to_string()))?;
        match bytes.len() {
            20 => Ok(Self::from_evm(EvmAddress::from_slice(&bytes))),
            21 => from_prefixed(&bytes),
            len => Err(AddressError::Length(len)),
        }
    }
}

fn from_prefixed(bytes: &[u8]) -> Result<Address, AddressError> {
    if bytes[0] != ADDRESS_PREFIX {
        return Err(AddressError::Prefix(bytes[0]));
    }
    let mut out = [0u8; 21];
    out.copy_from_slice(bytes);
    Ok(Address(out))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

// Equality is case-insensitive on the display form.
impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.to_base58().eq_ignore_ascii_case(&other.to_base58())
    }
}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_base58().to_ascii_lowercase().hash(state);
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Compare two textual addresses the way all business logic does.
///
/// Both sides are normalised to the display form when they parse, so a hex
/// and a base58 spelling of the same account compare equal; otherwise the raw
/// strings are compared case-insensitively.
pub fn same_address(a: &str, b: &str) -> bool {
    match (a.parse::<Address>(), b.parse::<Address>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

/// Whether a contract-returned address means "nobody".
///
/// Covers the empty string, a bare `0x`, and the all-zero account in any
/// representation.
pub fn is_empty_address(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("0x") {
        return true;
    }
    raw.parse::<Address>().map(|a| a.is_zero()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known TRON addresses: the USDT contract and the all-zero account.
    const USDT_BASE58: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
    const USDT_HEX: &str = "41a614f803b6fd780986a42c78ec9c7f77e6ded13c";
    const ZERO_BASE58: &str = "T9yD14Nj9j7xAB4dbGeiX9h8unkKHxuWwb";

    #[test]
    fn base58_and_hex_forms_round_trip() {
        let from_b58: Address = USDT_BASE58.parse().unwrap();
        assert_eq!(from_b58.to_hex(), USDT_HEX);

        let from_hex: Address = USDT_HEX.parse().unwrap();
        assert_eq!(from_hex.to_base58(), USDT_BASE58);

        let from_evm: Address = "0xa614f803b6fd780986a42c78ec9c7f77e6ded13c".parse().unwrap();
        assert_eq!(from_evm, from_b58);
    }

    #[test]
    fn rejects_bad_checksum_and_prefix() {
        // Last character altered.
        assert_eq!(
            "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6u".parse::<Address>(),
            Err(AddressError::Checksum)
        );
        assert!(matches!(
            "42a614f803b6fd780986a42c78ec9c7f77e6ded13c".parse::<Address>(),
            Err(AddressError::Prefix(0x42))
        ));
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(AddressError::Length(2))
        ));
    }

    #[test]
    fn same_address_is_case_insensitive_across_forms() {
        assert!(same_address(USDT_BASE58, USDT_HEX));
        assert!(same_address(USDT_HEX, &USDT_HEX.to_uppercase()));
        assert!(same_address("not-an-address", "NOT-AN-ADDRESS"));
        assert!(!same_address(USDT_BASE58, ZERO_BASE58));
    }

    #[test]
    fn empty_address_sentinels() {
        assert!(is_empty_address(""));
        assert!(is_empty_address("0x"));
        assert!(is_empty_address("0x0000000000000000000000000000000000000000"));
        assert!(is_empty_address(ZERO_BASE58));
        assert!(!is_empty_address(USDT_BASE58));
    }

    #[test]
    fn serde_uses_display_form() {
        let address: Address = USDT_HEX.parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{USDT_BASE58}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
