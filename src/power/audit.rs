//! Data-quality findings collected during a computation pass

use super::alias::AliasConflict;
use crate::decoder::DecodeError;
use crate::types::Address;
use serde::Serialize;

/// What went wrong with an account, slot or alias entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditKind {
    /// Account skipped entirely
    MalformedAccount { reason: String },
    /// One slot discarded
    SlotDecodeFailure { reason: String },
    /// Lockup tag outside the known set, scored as `None`
    UnknownLockupKind { tag: u8 },
    /// Alias claimed by two wallets, first declaration kept
    AliasConflict {
        kept_wallet: Address,
        rejected_wallet: Address,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditIssue {
    /// Account address, or the alias address for alias conflicts
    pub address: Address,
    pub slot: Option<usize>,
    #[serde(flatten)]
    pub kind: AuditKind,
}

/// Ordered list of findings
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditLog {
    issues: Vec<AuditIssue>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn malformed_account(&mut self, address: Address, error: &DecodeError) {
        self.issues.push(AuditIssue {
            address,
            slot: None,
            kind: AuditKind::MalformedAccount {
                reason: error.to_string(),
            },
        });
    }

    pub fn slot_failure(&mut self, address: Address, error: &DecodeError) {
        self.issues.push(AuditIssue {
            address,
            slot: error.slot(),
            kind: AuditKind::SlotDecodeFailure {
                reason: error.to_string(),
            },
        });
    }

    pub fn unknown_lockup_kind(&mut self, address: Address, slot: usize, tag: u8) {
        self.issues.push(AuditIssue {
            address,
            slot: Some(slot),
            kind: AuditKind::UnknownLockupKind { tag },
        });
    }

    pub fn alias_conflict(&mut self, conflict: &AliasConflict) {
        self.issues.push(AuditIssue {
            address: conflict.alias,
            slot: None,
            kind: AuditKind::AliasConflict {
                kept_wallet: conflict.kept_wallet,
                rejected_wallet: conflict.rejected_wallet,
            },
        });
    }

    pub fn extend(&mut self, other: AuditLog) {
        self.issues.extend(other.issues);
    }

    pub fn issues(&self) -> &[AuditIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of accounts skipped as malformed
    pub fn malformed_accounts(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i.kind, AuditKind::MalformedAccount { .. }))
            .count()
    }
}
