//! Account addresses
//!
//! Voter accounts and wallets are identified by 32-byte public keys, shown and
//! parsed in base58 the way every ledger explorer renders them.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Errors produced when parsing a base58 address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("'{input}' is not valid base58")]
    InvalidBase58 { input: String },

    #[error("'{input}' decodes to {len} bytes, expected 32")]
    InvalidLength { input: String, len: usize },
}

/// A 32-byte account key
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 32]);

impl Address {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build an address from exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Shortened form for console tables (`AbCd…WxYz`)
    pub fn short(&self) -> String {
        let full = self.to_string();
        if full.len() <= 12 {
            return full;
        }
        format!("{}…{}", &full[..4], &full[full.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bytes = bs58::decode(trimmed)
            .into_vec()
            .map_err(|_| AddressParseError::InvalidBase58 {
                input: trimmed.to_string(),
            })?;
        Address::from_slice(&bytes).ok_or_else(|| AddressParseError::InvalidLength {
            input: trimmed.to_string(),
            len: bytes.len(),
        })
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
