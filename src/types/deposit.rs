//! Deposit entry types
//!
//! Deposit slots hold one locked-or-unlocked token position each. The lockup kind
//! decides how the slot's vote multiplier decays over time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lockup schedule of a deposit
///
/// Tags follow the voter-stake-registry `LockupKind` enum:
/// 0 None, 1 Daily, 2 Monthly, 3 Cliff, 4 Constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LockupKind {
    #[default]
    None,
    VestingDaily,
    VestingMonthly,
    Cliff,
    Constant,
}

impl LockupKind {
    /// Map an on-chain tag to a kind; `None` for tags outside the known set
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(LockupKind::None),
            1 => Some(LockupKind::VestingDaily),
            2 => Some(LockupKind::VestingMonthly),
            3 => Some(LockupKind::Cliff),
            4 => Some(LockupKind::Constant),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            LockupKind::None => 0,
            LockupKind::VestingDaily => 1,
            LockupKind::VestingMonthly => 2,
            LockupKind::Cliff => 3,
            LockupKind::Constant => 4,
        }
    }

    /// Kinds whose lockup window is bounded by start and end timestamps
    pub fn is_time_bound(&self) -> bool {
        !matches!(self, LockupKind::None)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LockupKind::None => "None",
            LockupKind::VestingDaily => "Vesting (daily)",
            LockupKind::VestingMonthly => "Vesting (monthly)",
            LockupKind::Cliff => "Cliff",
            LockupKind::Constant => "Constant",
        }
    }
}

impl fmt::Display for LockupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_name())
    }
}

/// One decoded deposit slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEntry {
    pub slot_index: usize,
    pub is_used: bool,
    /// Currently deposited amount in native (integer) units
    pub amount_native: u64,
    pub amount_initially_locked_native: u64,
    pub lockup_kind: LockupKind,
    pub lockup_start_ts: i64,
    pub lockup_end_ts: i64,
    /// Raw tag when the on-chain kind was outside the known set (decoded as `None`)
    pub unknown_lockup_tag: Option<u8>,
}

impl DepositEntry {
    /// Whether this slot can carry voting power at all
    pub fn contributes(&self) -> bool {
        self.is_used && self.amount_native > 0
    }

    /// Amount in whole tokens after applying the registrar's decimal shift
    pub fn amount_tokens(&self, token_decimal_shift: u8) -> f64 {
        crate::utils::currency::native_to_tokens(self.amount_native, token_decimal_shift)
    }
}
