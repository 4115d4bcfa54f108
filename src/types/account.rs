//! Snapshot types
//!
//! An `AccountSnapshot` is a caller-owned, read-only, point-in-time copy of the
//! voter accounts pulled from the ledger. Every computation borrows it; a refresh
//! means building a new snapshot value, never mutating one in flight.

use super::Address;
use std::sync::Arc;

/// One account as captured by the snapshot loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub address: Address,
    pub data: Vec<u8>,
}

impl RawAccount {
    pub fn new(address: Address, data: Vec<u8>) -> Self {
        Self { address, data }
    }
}

/// Immutable set of raw accounts plus the time at which it was captured
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    captured_at: i64,
    accounts: Arc<[RawAccount]>,
}

impl AccountSnapshot {
    /// Create a snapshot; `captured_at` is the unix time used as "now" for multipliers
    pub fn new(captured_at: i64, accounts: Vec<RawAccount>) -> Self {
        Self {
            captured_at,
            accounts: accounts.into(),
        }
    }

    pub fn captured_at(&self) -> i64 {
        self.captured_at
    }

    pub fn accounts(&self) -> &[RawAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, address: &Address) -> Option<&RawAccount> {
        self.accounts.iter().find(|a| &a.address == address)
    }

    /// Same accounts evaluated at a different time; the account buffer is shared
    pub fn with_evaluation_time(&self, now: i64) -> Self {
        Self {
            captured_at: now,
            accounts: Arc::clone(&self.accounts),
        }
    }
}
