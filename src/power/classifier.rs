//! Ownership classification
//!
//! Decides whether a voter account grants a wallet native power (the wallet owns
//! it) or delegated power (the wallet holds a distinct voter authority grant).

use super::alias::AliasMap;
use crate::types::{Address, Classification};

/// Classifies voter accounts against target wallets
#[derive(Debug, Clone, Copy)]
pub struct OwnershipClassifier<'a> {
    aliases: &'a AliasMap,
}

impl<'a> OwnershipClassifier<'a> {
    pub fn new(aliases: &'a AliasMap) -> Self {
        Self { aliases }
    }

    /// Native is checked first, so a self-voted account owned by the wallet is
    /// never also reported as delegated.
    pub fn classify(
        &self,
        authority: &Address,
        voter_authority: &Address,
        wallet: &Address,
    ) -> Classification {
        if self.aliases.controls(wallet, authority) {
            return Classification::Native;
        }
        if authority != voter_authority && self.aliases.controls(wallet, voter_authority) {
            return Classification::Delegated;
        }
        Classification::None
    }
}
