//! Power aggregation
//!
//! Decodes voter accounts from a snapshot, classifies them against target
//! wallets, scores each used deposit with its lockup multiplier and sums the
//! results into native and delegated power.
//!
//! Contributions are collected in a ledger keyed by `(account, slot_index)`.
//! A key is counted once, and sums are taken in key order, so a result does not
//! depend on the order in which the snapshot lists its accounts.

use super::alias::AliasMap;
use super::audit::AuditLog;
use super::classifier::OwnershipClassifier;
use super::multiplier::lockup_multiplier;
use crate::decoder::{VoterAccount, VoterDecoder};
use crate::errors::{AppError, AppResult};
use crate::types::{
    AccountSnapshot, Address, Classification, ContributingDeposit, LockupKind, PowerRunStats,
    RawAccount, RegistrarConfig, WalletPowerResult,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

type Ledger = BTreeMap<(Address, usize), ContributingDeposit>;

/// Single-wallet computation with its data-quality findings
#[derive(Debug, Clone)]
pub struct WalletReport {
    pub result: WalletPowerResult,
    pub audit: AuditLog,
    pub stats: PowerRunStats,
}

/// Results of a batch run, in first-occurrence order of the requested wallets
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub evaluated_at: i64,
    pub results: Vec<WalletPowerResult>,
    pub audit: AuditLog,
    pub stats: PowerRunStats,
}

impl BatchReport {
    pub fn result_for(&self, wallet: &Address) -> Option<&WalletPowerResult> {
        self.results.iter().find(|r| &r.wallet == wallet)
    }

    /// Results sorted by total power, highest first
    pub fn leaderboard(&self) -> Vec<&WalletPowerResult> {
        let mut ranked: Vec<&WalletPowerResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| {
            b.total_power
                .total_cmp(&a.total_power)
                .then_with(|| a.wallet.cmp(&b.wallet))
        });
        ranked
    }

    pub fn total_power(&self) -> f64 {
        self.results.iter().map(|r| r.total_power).sum()
    }
}

/// A deposit scored independently of any wallet
#[derive(Debug, Clone)]
struct ScoredDeposit {
    slot_index: usize,
    lockup_kind: LockupKind,
    amount_native: u64,
    amount_tokens: f64,
    multiplier: f64,
    power: f64,
    lockup_end_ts: i64,
}

impl ScoredDeposit {
    fn attribute(&self, account: Address, classification: Classification) -> ContributingDeposit {
        ContributingDeposit {
            account,
            slot_index: self.slot_index,
            classification,
            lockup_kind: self.lockup_kind,
            amount_native: self.amount_native,
            amount_tokens: self.amount_tokens,
            multiplier: self.multiplier,
            power: self.power,
            lockup_end_ts: self.lockup_end_ts,
        }
    }
}

/// A decoded account with every contributing deposit scored
#[derive(Debug, Clone)]
struct ScoredAccount {
    address: Address,
    authority: Address,
    voter_authority: Address,
    deposits: Vec<ScoredDeposit>,
}

impl ScoredAccount {
    fn is_self_voted(&self) -> bool {
        self.authority == self.voter_authority
    }
}

/// Outcome of scanning one raw account
struct AccountScan {
    scored: Option<ScoredAccount>,
    audit: AuditLog,
    stats: PowerRunStats,
}

/// Every decodable account of a snapshot, scored once and indexed by
/// authority and voter authority
#[derive(Debug, Default)]
pub struct DelegationIndex {
    accounts: Vec<ScoredAccount>,
    by_authority: HashMap<Address, Vec<usize>>,
    by_voter_authority: HashMap<Address, Vec<usize>>,
}

impl DelegationIndex {
    fn from_accounts(accounts: Vec<ScoredAccount>) -> Self {
        let mut by_authority: HashMap<Address, Vec<usize>> = HashMap::new();
        let mut by_voter_authority: HashMap<Address, Vec<usize>> = HashMap::new();

        for (idx, account) in accounts.iter().enumerate() {
            by_authority.entry(account.authority).or_default().push(idx);
            if !account.is_self_voted() {
                by_voter_authority
                    .entry(account.voter_authority)
                    .or_default()
                    .push(idx);
            }
        }

        Self {
            accounts,
            by_authority,
            by_voter_authority,
        }
    }

    /// Number of decoded accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts owned by `authority`
    pub fn owned_by(&self, authority: &Address) -> usize {
        self.by_authority.get(authority).map_or(0, Vec::len)
    }

    /// Accounts delegated to `voter_authority` (self-voted accounts excluded)
    pub fn delegated_to(&self, voter_authority: &Address) -> usize {
        self.by_voter_authority.get(voter_authority).map_or(0, Vec::len)
    }

    /// Indices of accounts that may relate to `wallet` directly or via an alias
    fn candidates(&self, wallet: &Address, aliases: &AliasMap) -> BTreeSet<usize> {
        let mut keys = vec![*wallet];
        keys.extend(aliases.aliases_of(wallet).copied());

        let mut candidates = BTreeSet::new();
        for key in &keys {
            for map in [&self.by_authority, &self.by_voter_authority] {
                if let Some(indices) = map.get(key) {
                    candidates.extend(indices.iter().copied());
                }
            }
        }
        candidates
    }
}

/// Wallet that claims `account` within one batch, if any
///
/// Priority: direct authority, alias owner of the authority, direct voter
/// authority, alias owner of the voter authority. Delegation is only
/// considered for accounts that are not self-voted.
fn claimant(
    account: &ScoredAccount,
    requested: &HashSet<Address>,
    aliases: &AliasMap,
) -> Option<(Address, Classification)> {
    let requested_owner = |address: &Address| -> Option<Address> {
        if requested.contains(address) {
            return Some(*address);
        }
        aliases
            .owner_of(address)
            .filter(|owner| requested.contains(*owner))
            .copied()
    };

    if let Some(wallet) = requested_owner(&account.authority) {
        return Some((wallet, Classification::Native));
    }
    if account.is_self_voted() {
        return None;
    }
    requested_owner(&account.voter_authority).map(|wallet| (wallet, Classification::Delegated))
}

/// Computes wallet power over account snapshots
#[derive(Debug, Clone)]
pub struct PowerEngine<'a> {
    config: RegistrarConfig,
    aliases: &'a AliasMap,
    decoder: VoterDecoder,
    parallel: bool,
}

impl<'a> PowerEngine<'a> {
    /// Engine with the standard voter layout; rejects unusable registrar constants
    pub fn new(config: RegistrarConfig, aliases: &'a AliasMap) -> AppResult<Self> {
        config
            .validate()
            .map_err(|reason| AppError::InvalidRegistrarConfig {
                realm: "<direct>".to_string(),
                reason,
            })?;

        Ok(Self {
            config,
            aliases,
            decoder: VoterDecoder::standard(),
            parallel: true,
        })
    }

    pub fn with_decoder(mut self, decoder: VoterDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Toggle rayon for the batch index build
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    pub fn decoder(&self) -> &VoterDecoder {
        &self.decoder
    }

    /// Power of one wallet at the snapshot's evaluation time
    pub fn wallet_power(&self, wallet: &Address, snapshot: &AccountSnapshot) -> WalletPowerResult {
        self.evaluate_wallet(wallet, snapshot).result
    }

    /// Single-wallet scan with audit and statistics
    pub fn evaluate_wallet(&self, wallet: &Address, snapshot: &AccountSnapshot) -> WalletReport {
        let started = Instant::now();
        let now = snapshot.captured_at();
        let classifier = OwnershipClassifier::new(self.aliases);
        let mut audit = self.alias_audit();
        let mut stats = PowerRunStats::new();
        let mut ledger = Ledger::new();

        for account in snapshot.accounts() {
            stats.accounts_scanned += 1;

            let voter = match self.decoder.decode(account) {
                Ok(voter) => voter,
                Err(e) => {
                    warn!("Skipping malformed account {}: {}", account.address, e);
                    audit.malformed_account(account.address, &e);
                    stats.accounts_skipped += 1;
                    continue;
                }
            };
            if !self.belongs_to_realm(&voter) {
                stats.foreign_accounts += 1;
                continue;
            }

            let classification =
                classifier.classify(&voter.authority, &voter.voter_authority, wallet);
            if classification == Classification::None {
                continue;
            }

            for deposit in self.score_deposits(&voter, now, &mut audit, &mut stats) {
                record(
                    &mut ledger,
                    deposit.attribute(voter.address, classification),
                    &mut stats,
                );
            }
        }

        stats.wallets_resolved = 1;
        stats.finish(started);
        debug!("Wallet {}: {}", wallet, stats.summary());

        WalletReport {
            result: WalletPowerResult::from_contributions(*wallet, ledger.into_values().collect()),
            audit,
            stats,
        }
    }

    /// Score every account once, then resolve each wallet by index lookups
    pub fn batch(&self, wallets: &[Address], snapshot: &AccountSnapshot) -> BatchReport {
        let started = Instant::now();
        let now = snapshot.captured_at();
        let mut audit = self.alias_audit();

        let (index, scan_audit, mut stats) = self.build_index(snapshot);
        audit.extend(scan_audit);

        let mut unique = Vec::with_capacity(wallets.len());
        let mut requested = HashSet::with_capacity(wallets.len());
        for wallet in wallets {
            if requested.insert(*wallet) {
                unique.push(*wallet);
            }
        }

        let mut results = Vec::with_capacity(unique.len());
        for wallet in &unique {
            let mut ledger = Ledger::new();
            for idx in index.candidates(wallet, self.aliases) {
                let account = &index.accounts[idx];
                let classification = match claimant(account, &requested, self.aliases) {
                    Some((claimed_by, classification)) if claimed_by == *wallet => classification,
                    _ => continue,
                };
                for deposit in &account.deposits {
                    record(
                        &mut ledger,
                        deposit.attribute(account.address, classification),
                        &mut stats,
                    );
                }
            }
            results.push(WalletPowerResult::from_contributions(
                *wallet,
                ledger.into_values().collect(),
            ));
            stats.wallets_resolved += 1;
        }

        stats.finish(started);
        info!("Batch of {} wallets: {}", unique.len(), stats.summary());

        BatchReport {
            evaluated_at: now,
            results,
            audit,
            stats,
        }
    }

    /// Decode and score every account of the snapshot
    ///
    /// Partial scans are collected in snapshot order before being folded, so
    /// the index is the same with or without the thread pool.
    pub fn build_index(&self, snapshot: &AccountSnapshot) -> (DelegationIndex, AuditLog, PowerRunStats) {
        let now = snapshot.captured_at();
        let scans: Vec<AccountScan> = if self.parallel {
            snapshot
                .accounts()
                .par_iter()
                .map(|account| self.scan_account(account, now))
                .collect()
        } else {
            snapshot
                .accounts()
                .iter()
                .map(|account| self.scan_account(account, now))
                .collect()
        };

        let mut audit = AuditLog::new();
        let mut stats = PowerRunStats::new();
        let mut accounts = Vec::with_capacity(scans.len());
        for scan in scans {
            audit.extend(scan.audit);
            stats.merge(&scan.stats);
            accounts.extend(scan.scored);
        }

        debug!(
            "Delegation index: {} of {} accounts decoded",
            accounts.len(),
            snapshot.len()
        );
        (DelegationIndex::from_accounts(accounts), audit, stats)
    }

    /// Alias conflicts reported with every run
    fn alias_audit(&self) -> AuditLog {
        let mut audit = AuditLog::new();
        for conflict in self.aliases.conflicts() {
            audit.alias_conflict(conflict);
        }
        audit
    }

    fn belongs_to_realm(&self, voter: &VoterAccount<'_>) -> bool {
        let accepted = self.config.accepts_registrar(voter.registrar.as_ref());
        if !accepted {
            debug!("Ignoring account {} of another registrar", voter.address);
        }
        accepted
    }

    fn scan_account(&self, account: &RawAccount, now: i64) -> AccountScan {
        let mut audit = AuditLog::new();
        let mut stats = PowerRunStats::new();
        stats.accounts_scanned = 1;

        let scored = match self.decoder.decode(account) {
            Ok(voter) if !self.belongs_to_realm(&voter) => {
                stats.foreign_accounts = 1;
                None
            }
            Ok(voter) => {
                let deposits = self.score_deposits(&voter, now, &mut audit, &mut stats);
                Some(ScoredAccount {
                    address: voter.address,
                    authority: voter.authority,
                    voter_authority: voter.voter_authority,
                    deposits,
                })
            }
            Err(e) => {
                warn!("Skipping malformed account {}: {}", account.address, e);
                audit.malformed_account(account.address, &e);
                stats.accounts_skipped = 1;
                None
            }
        };

        AccountScan {
            scored,
            audit,
            stats,
        }
    }

    /// Score the used, non-empty deposits of one account
    ///
    /// Slot failures discard only that slot. Unknown lockup tags are scored as
    /// `None` and audited.
    fn score_deposits(
        &self,
        voter: &VoterAccount<'_>,
        now: i64,
        audit: &mut AuditLog,
        stats: &mut PowerRunStats,
    ) -> Vec<ScoredDeposit> {
        let mut scored = Vec::new();

        for result in voter.deposit_entries(self.decoder.limits()) {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Discarding slot of account {}: {}", voter.address, e);
                    audit.slot_failure(voter.address, &e);
                    stats.slot_failures += 1;
                    continue;
                }
            };
            stats.slots_decoded += 1;

            if !entry.contributes() {
                continue;
            }

            if let Some(tag) = entry.unknown_lockup_tag {
                warn!(
                    "Account {} slot {}: unknown lockup kind {}, scoring as none",
                    voter.address, entry.slot_index, tag
                );
                audit.unknown_lockup_kind(voter.address, entry.slot_index, tag);
                stats.unknown_lockup_kinds += 1;
            }

            let multiplier = lockup_multiplier(
                entry.lockup_kind,
                entry.lockup_start_ts,
                entry.lockup_end_ts,
                now,
                &self.config,
            );
            let amount_tokens = entry.amount_tokens(self.config.token_decimal_shift);
            let power = amount_tokens * multiplier;

            debug!(
                "Account {} slot {}: {} tokens x {:.6} ({}) = {}",
                voter.address, entry.slot_index, amount_tokens, multiplier, entry.lockup_kind, power
            );
            stats.contributions_scored += 1;

            scored.push(ScoredDeposit {
                slot_index: entry.slot_index,
                lockup_kind: entry.lockup_kind,
                amount_native: entry.amount_native,
                amount_tokens,
                multiplier,
                power,
                lockup_end_ts: entry.lockup_end_ts,
            });
        }

        scored
    }
}

fn record(ledger: &mut Ledger, deposit: ContributingDeposit, stats: &mut PowerRunStats) {
    let key = (deposit.account, deposit.slot_index);
    if ledger.contains_key(&key) {
        debug!(
            "Ignoring repeated contribution for account {} slot {}",
            key.0, key.1
        );
        stats.duplicate_contributions += 1;
        return;
    }
    ledger.insert(key, deposit);
}

/// Native and delegated power of `wallet` at `snapshot.captured_at()`
pub fn compute_wallet_power(
    wallet: &Address,
    snapshot: &AccountSnapshot,
    config: &RegistrarConfig,
    aliases: &AliasMap,
) -> AppResult<WalletPowerResult> {
    let engine = PowerEngine::new(*config, aliases)?;
    Ok(engine.wallet_power(wallet, snapshot))
}

/// Power of many wallets in one pass over the snapshot
///
/// Each account is claimed by at most one requested wallet. Duplicate wallets
/// are resolved once and results follow first-occurrence order.
pub fn compute_all_wallet_powers(
    wallets: &[Address],
    snapshot: &AccountSnapshot,
    config: &RegistrarConfig,
    aliases: &AliasMap,
) -> AppResult<Vec<WalletPowerResult>> {
    let engine = PowerEngine::new(*config, aliases)?;
    Ok(engine.batch(wallets, snapshot).results)
}
