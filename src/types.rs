//! Governance Power Engine - Type System
//!
//! - `address`: 32-byte account keys with base58 text form
//! - `account`: raw snapshot accounts and the immutable `AccountSnapshot`
//! - `deposit`: decoded deposit entries and lockup kinds
//! - `registrar`: realm-specific registrar constants
//! - `power`: classification outcomes and per-wallet results
//! - `statistics`: run statistics with the common collector trait

mod account;
mod address;
mod deposit;
mod power;
mod registrar;
pub mod statistics;

pub use account::*;
pub use address::*;
pub use deposit::*;
pub use power::*;
pub use registrar::*;

pub use statistics::PowerRunStats;
