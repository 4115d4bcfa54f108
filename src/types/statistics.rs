//! Run statistics for power computations
//!
//! Every decode/aggregation pass fills a `PowerRunStats`; its summary line is
//! logged when the pass finishes.

use crate::utils::math::safe_percentage_u64;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Counters for one power computation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct PowerRunStats {
    pub accounts_scanned: u64,
    pub accounts_skipped: u64,
    /// Decodable accounts of a registrar other than the configured one
    pub foreign_accounts: u64,
    pub slots_decoded: u64,
    pub slot_failures: u64,
    pub unknown_lockup_kinds: u64,
    pub contributions_scored: u64,
    pub duplicate_contributions: u64,
    pub wallets_resolved: u64,
    #[serde(skip)]
    pub duration: Duration,
}

impl PowerRunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_rate(&self) -> f64 {
        safe_percentage_u64(self.accounts_skipped, self.accounts_scanned)
    }

    pub fn slot_failure_rate(&self) -> f64 {
        safe_percentage_u64(self.slot_failures, self.slots_decoded + self.slot_failures)
    }

    /// Accounts per second over the recorded duration
    pub fn processing_rate(&self) -> f64 {
        let elapsed = self.duration.as_secs_f64();
        if elapsed > 0.0 {
            self.accounts_scanned as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Fold counters from another (partial) pass into this one
    pub fn merge(&mut self, other: &PowerRunStats) {
        self.accounts_scanned += other.accounts_scanned;
        self.accounts_skipped += other.accounts_skipped;
        self.foreign_accounts += other.foreign_accounts;
        self.slots_decoded += other.slots_decoded;
        self.slot_failures += other.slot_failures;
        self.unknown_lockup_kinds += other.unknown_lockup_kinds;
        self.contributions_scored += other.contributions_scored;
        self.duplicate_contributions += other.duplicate_contributions;
        self.wallets_resolved += other.wallets_resolved;
    }

    /// Record the time spent since `started`
    pub fn finish(&mut self, started: Instant) {
        self.duration = started.elapsed();
    }

    pub fn summary(&self) -> String {
        format!(
            "{} accounts scanned, {} skipped ({:.1}%), {} of other registrars, {} slots decoded, {} slot failures ({:.1}%), {} unknown lockup kinds, {} wallets resolved, {:.1} accounts/sec",
            self.accounts_scanned,
            self.accounts_skipped,
            self.skip_rate(),
            self.foreign_accounts,
            self.slots_decoded,
            self.slot_failures,
            self.slot_failure_rate(),
            self.unknown_lockup_kinds,
            self.wallets_resolved,
            self.processing_rate()
        )
    }
}
