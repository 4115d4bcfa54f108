//! Account snapshot sources
//!
//! Fetching accounts from the ledger is someone else's job. This module is the
//! seam where a loader hands over a point-in-time copy, plus a reader for the
//! local JSON dumps that loader produces.
//!
//! Two record shapes are accepted in the `accounts` array:
//!
//! ```json
//! { "captured_at": 1750000000,
//!   "accounts": [
//!     { "address": "<base58>", "data": "<base64>" },
//!     { "pubkey": "<base58>", "account": { "data": ["<base64>", "base64"] } }
//!   ] }
//! ```
//!
//! The second is what `getProgramAccounts` returns with `encoding: base64`.

use crate::errors::{AppError, AppResult};
use crate::types::{AccountSnapshot, Address, RawAccount};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Anything that can hand over an immutable account snapshot
pub trait SnapshotSource {
    fn load_snapshot(&self) -> AppResult<AccountSnapshot>;
}

impl SnapshotSource for AccountSnapshot {
    fn load_snapshot(&self) -> AppResult<AccountSnapshot> {
        Ok(self.clone())
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    captured_at: Option<i64>,
    accounts: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccountRecord {
    Flat {
        address: Address,
        data: String,
    },
    Rpc {
        pubkey: Address,
        account: RpcAccountData,
    },
}

#[derive(Debug, Deserialize)]
struct RpcAccountData {
    /// `[payload, encoding]`
    data: (String, String),
}

impl AccountRecord {
    fn into_raw(self) -> AppResult<RawAccount> {
        let (address, payload) = match self {
            AccountRecord::Flat { address, data } => (address, data),
            AccountRecord::Rpc { pubkey, account } => {
                let (payload, encoding) = account.data;
                if encoding != "base64" {
                    return Err(AppError::Snapshot(format!(
                        "Account {} uses unsupported encoding '{}'",
                        pubkey, encoding
                    )));
                }
                (pubkey, payload)
            }
        };

        let data = general_purpose::STANDARD.decode(payload.trim())?;
        Ok(RawAccount::new(address, data))
    }
}

/// Snapshot dump on local disk
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
    captured_at: Option<i64>,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            captured_at: None,
        }
    }

    /// Evaluation time to use instead of the dump's `captured_at`
    pub fn with_captured_at(mut self, captured_at: Option<i64>) -> Self {
        self.captured_at = captured_at;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonSnapshotFile {
    fn load_snapshot(&self) -> AppResult<AccountSnapshot> {
        if !self.path.exists() {
            return Err(AppError::Snapshot(format!(
                "Snapshot file not found: {}",
                self.path.display()
            )));
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let document: SnapshotDocument = serde_json::from_reader(reader)?;

        let captured_at = self.captured_at.or(document.captured_at).ok_or_else(|| {
            AppError::Snapshot(format!(
                "{} has no captured_at; pass an evaluation time explicitly",
                self.path.display()
            ))
        })?;

        let accounts = document
            .accounts
            .into_iter()
            .map(AccountRecord::into_raw)
            .collect::<AppResult<Vec<_>>>()?;

        info!(
            "Loaded {} accounts from {} (captured_at {})",
            accounts.len(),
            self.path.display(),
            captured_at
        );
        Ok(AccountSnapshot::new(captured_at, accounts))
    }
}

#[derive(Serialize)]
struct FlatRecord<'a> {
    address: &'a Address,
    data: String,
}

#[derive(Serialize)]
struct FlatDocument<'a> {
    captured_at: i64,
    accounts: Vec<FlatRecord<'a>>,
}

/// Write a snapshot in the flat dump format
pub fn write_json_snapshot(snapshot: &AccountSnapshot, path: &Path) -> AppResult<()> {
    let document = FlatDocument {
        captured_at: snapshot.captured_at(),
        accounts: snapshot
            .accounts()
            .iter()
            .map(|account| FlatRecord {
                address: &account.address,
                data: general_purpose::STANDARD.encode(&account.data),
            })
            .collect(),
    };

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &document)?;
    debug!("Wrote {} accounts to {}", snapshot.len(), path.display());
    Ok(())
}
