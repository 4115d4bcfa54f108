//! Classification outcomes and per-wallet power results

use super::{Address, LockupKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a voter account relates to a target wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Wallet (or one of its aliases) owns the account
    Native,
    /// Wallet (or one of its aliases) holds a distinct voter authority grant
    Delegated,
    None,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Native => f.pad("native"),
            Classification::Delegated => f.pad("delegated"),
            Classification::None => f.pad("none"),
        }
    }
}

/// A scored deposit counted towards a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingDeposit {
    pub account: Address,
    pub slot_index: usize,
    pub classification: Classification,
    pub lockup_kind: LockupKind,
    pub amount_native: u64,
    pub amount_tokens: f64,
    pub multiplier: f64,
    pub power: f64,
    pub lockup_end_ts: i64,
}

/// Native and delegated voting power of one wallet
///
/// Created fresh per computation; `total_power` always equals
/// `native_power + delegated_power`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletPowerResult {
    pub wallet: Address,
    pub native_power: f64,
    pub delegated_power: f64,
    pub total_power: f64,
    pub contributing_deposits: Vec<ContributingDeposit>,
}

impl WalletPowerResult {
    /// Result for a wallet with no matching accounts
    pub fn empty(wallet: Address) -> Self {
        Self {
            wallet,
            native_power: 0.0,
            delegated_power: 0.0,
            total_power: 0.0,
            contributing_deposits: Vec::new(),
        }
    }

    /// Build a result from deposits already ordered by (account, slot)
    pub fn from_contributions(wallet: Address, contributing_deposits: Vec<ContributingDeposit>) -> Self {
        let mut native_power = 0.0;
        let mut delegated_power = 0.0;
        for deposit in &contributing_deposits {
            match deposit.classification {
                Classification::Native => native_power += deposit.power,
                Classification::Delegated => delegated_power += deposit.power,
                Classification::None => {}
            }
        }

        Self {
            wallet,
            native_power,
            delegated_power,
            total_power: native_power + delegated_power,
            contributing_deposits,
        }
    }

    pub fn has_power(&self) -> bool {
        self.total_power > 0.0
    }

    /// Distinct accounts that contributed, in ledger order
    pub fn contributing_accounts(&self) -> Vec<Address> {
        let mut accounts: Vec<Address> =
            self.contributing_deposits.iter().map(|d| d.account).collect();
        accounts.dedup();
        accounts
    }
}
