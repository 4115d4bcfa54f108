//! Governance Power Engine
//!
//! Decodes voter-stake-registry voter accounts from a point-in-time snapshot and
//! computes lockup-weighted native and delegated voting power per wallet.

pub mod cli;
pub mod config;
pub mod decoder;
pub mod errors;
pub mod power;
pub mod report;
pub mod snapshot;
pub mod types;
pub mod utils;

pub use power::{compute_all_wallet_powers, compute_wallet_power};
