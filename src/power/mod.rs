//! Governance power computation
//!
//! - `multiplier`: lockup multiplier as a pure function of time and registrar constants
//! - `alias`: externally supplied wallet aliases
//! - `classifier`: native / delegated / none per account and wallet
//! - `aggregator`: single-wallet and batch aggregation
//! - `audit`: data-quality findings collected along the way

pub mod aggregator;
pub mod alias;
pub mod audit;
pub mod classifier;
pub mod multiplier;

pub use aggregator::{
    compute_all_wallet_powers, compute_wallet_power, BatchReport, DelegationIndex, PowerEngine,
    WalletReport,
};
pub use alias::{AliasConflict, AliasDeclaration, AliasMap};
pub use audit::{AuditIssue, AuditKind, AuditLog};
pub use classifier::OwnershipClassifier;
pub use multiplier::lockup_multiplier;
