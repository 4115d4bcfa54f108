//! Wallet alias resolution
//!
//! Some citizens control several authority addresses. The alias map is supplied
//! by the caller and is only ever looked up, never inferred from account data.
//! Each alias address can belong to a single wallet; when two wallets claim the
//! same address the first declaration is kept and the conflict is recorded.

use crate::errors::AppResult;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// An alias address claimed by more than one wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasConflict {
    pub alias: Address,
    /// Wallet that keeps the alias (declared first)
    pub kept_wallet: Address,
    pub rejected_wallet: Address,
}

/// wallet -> additional authority addresses it controls
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    aliases: HashMap<Address, BTreeSet<Address>>,
    owners: HashMap<Address, Address>,
    conflicts: Vec<AliasConflict>,
}

/// One `[[wallet]]` table in an alias file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasDeclaration {
    pub wallet: Address,
    #[serde(default)]
    pub aliases: Vec<Address>,
}

#[derive(Debug, Deserialize)]
struct AliasFile {
    #[serde(default)]
    wallet: Vec<AliasDeclaration>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from declarations in order; later conflicting claims are rejected
    pub fn from_declarations<I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = AliasDeclaration>,
    {
        let mut map = Self::new();
        for declaration in declarations {
            for alias in declaration.aliases {
                map.declare(declaration.wallet, alias);
            }
        }
        map
    }

    /// Parse an alias file:
    ///
    /// ```toml
    /// [[wallet]]
    /// wallet = "<base58>"
    /// aliases = ["<base58>", "<base58>"]
    /// ```
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let file: AliasFile = toml::from_str(contents)?;
        Ok(Self::from_declarations(file.wallet))
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let map = Self::from_toml_str(&contents)?;
        debug!(
            "Loaded {} aliases for {} wallets from {}",
            map.owners.len(),
            map.aliases.len(),
            path.display()
        );
        Ok(map)
    }

    /// Record that `wallet` controls `alias`
    ///
    /// Returns false when the alias already belongs to another wallet; the
    /// existing claim is kept.
    pub fn declare(&mut self, wallet: Address, alias: Address) -> bool {
        if alias == wallet {
            return true;
        }

        match self.owners.get(&alias) {
            Some(owner) if *owner == wallet => true,
            Some(owner) => {
                let conflict = AliasConflict {
                    alias,
                    kept_wallet: *owner,
                    rejected_wallet: wallet,
                };
                warn!(
                    "Alias conflict: {} claimed by {} and {}; keeping first declaration ({})",
                    alias, conflict.kept_wallet, wallet, conflict.kept_wallet
                );
                self.conflicts.push(conflict);
                false
            }
            None => {
                self.owners.insert(alias, wallet);
                self.aliases.entry(wallet).or_default().insert(alias);
                true
            }
        }
    }

    /// Wallet that controls `address` through an alias
    pub fn owner_of(&self, address: &Address) -> Option<&Address> {
        self.owners.get(address)
    }

    /// True when `address` is one of `wallet`'s aliases
    pub fn is_alias_of(&self, wallet: &Address, address: &Address) -> bool {
        self.owners.get(address) == Some(wallet)
    }

    /// `address` is the wallet itself or one of its aliases
    pub fn controls(&self, wallet: &Address, address: &Address) -> bool {
        wallet == address || self.is_alias_of(wallet, address)
    }

    pub fn aliases_of(&self, wallet: &Address) -> impl Iterator<Item = &Address> {
        self.aliases.get(wallet).into_iter().flatten()
    }

    pub fn conflicts(&self) -> &[AliasConflict] {
        &self.conflicts
    }

    /// Number of alias addresses
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
