//! Report formatting and output generation
//!
//! Renders power results as console tables for operators, JSON for programmatic
//! use, or CSV rows for the persistence collaborator that ingests batch runs.

mod decoded;

pub use decoded::{DecodedAccountView, DecodedSlot};

use crate::errors::{AppError, AppResult};
use crate::power::{AuditKind, AuditLog, BatchReport, WalletReport};
use crate::types::{PowerRunStats, WalletPowerResult};
use crate::utils::currency::{format_native_as_tokens, format_tokens};
use crate::utils::math::safe_share;
use crate::utils::time::{format_remaining, timestamp_to_iso};
use serde::Serialize;
use std::path::Path;

/// Audit issues printed in console output before truncating
const CONSOLE_AUDIT_LIMIT: usize = 20;

/// Output format options for power reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable console tables
    #[default]
    Console,
    /// JSON format for programmatic use
    Json,
    /// One row per wallet (batch) or per deposit (single wallet)
    Csv,
}

impl OutputFormat {
    /// Lenient parse, falling back to console output
    pub fn parse(format_str: &str) -> Self {
        match format_str.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Console,
        }
    }
}

#[derive(Serialize)]
struct WalletJson<'a> {
    evaluated_at: i64,
    #[serde(flatten)]
    result: &'a WalletPowerResult,
    audit: &'a AuditLog,
    stats: &'a PowerRunStats,
}

#[derive(Serialize)]
struct BatchJson<'a> {
    evaluated_at: i64,
    total_power: f64,
    results: &'a [WalletPowerResult],
    audit: &'a AuditLog,
    stats: &'a PowerRunStats,
}

#[derive(Serialize)]
struct WalletCsvRow {
    wallet: String,
    native_power: f64,
    delegated_power: f64,
    total_power: f64,
    contributing_accounts: usize,
    contributing_deposits: usize,
    evaluated_at: i64,
}

#[derive(Serialize)]
struct DepositCsvRow {
    wallet: String,
    account: String,
    slot_index: usize,
    classification: String,
    lockup_kind: String,
    amount_native: u64,
    amount_tokens: f64,
    multiplier: f64,
    power: f64,
    lockup_end_ts: i64,
}

/// Report formatter for power results
pub struct ReportFormatter;

impl ReportFormatter {
    /// Format number with thousand separators for console output
    ///
    /// # Examples
    ///
    /// ```
    /// # use governance_power::report::ReportFormatter;
    /// assert_eq!(ReportFormatter::format_number(1234), "1,234");
    /// assert_eq!(ReportFormatter::format_number(1234567), "1,234,567");
    /// assert_eq!(ReportFormatter::format_number(12), "12");
    /// ```
    pub fn format_number(n: usize) -> String {
        format_tokens(n as f64, 0)
    }

    /// One wallet with its deposit breakdown
    pub fn format_wallet(
        report: &WalletReport,
        evaluated_at: i64,
        format: OutputFormat,
    ) -> AppResult<String> {
        let result = &report.result;
        match format {
            OutputFormat::Console => {
                let mut output = String::new();
                output.push_str(&format!("Wallet:          {}\n", result.wallet));
                output.push_str(&format!(
                    "Evaluated at:    {} ({})\n",
                    timestamp_to_iso(evaluated_at),
                    evaluated_at
                ));
                output.push_str(&format!(
                    "Native power:    {}\n",
                    format_tokens(result.native_power, 6)
                ));
                output.push_str(&format!(
                    "Delegated power: {}\n",
                    format_tokens(result.delegated_power, 6)
                ));
                output.push_str(&format!(
                    "Total power:     {}\n",
                    format_tokens(result.total_power, 6)
                ));

                if result.contributing_deposits.is_empty() {
                    output.push_str("\nNo contributing deposits\n");
                } else {
                    output.push_str(&format!(
                        "\n{:<12} {:>4} {:<10} {:<16} {:>20} {:>8} {:>20} {:<10} {:>9}\n",
                        "Account", "Slot", "Class", "Lockup", "Tokens", "Mult", "Power", "Unlocks",
                        "Remaining"
                    ));
                    for d in &result.contributing_deposits {
                        output.push_str(&format!(
                            "{:<12} {:>4} {:<10} {:<16} {:>20} {:>8.4} {:>20} {:<10} {:>9}\n",
                            d.account.short(),
                            d.slot_index,
                            d.classification,
                            d.lockup_kind,
                            format_tokens(d.amount_tokens, 6),
                            d.multiplier,
                            format_tokens(d.power, 6),
                            timestamp_to_iso(d.lockup_end_ts),
                            format_remaining(d.lockup_end_ts, evaluated_at)
                        ));
                    }
                }

                output.push_str(&Self::format_audit_summary(&report.audit));
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(&WalletJson {
                evaluated_at,
                result,
                audit: &report.audit,
                stats: &report.stats,
            }),
            OutputFormat::Csv => {
                let rows = result.contributing_deposits.iter().map(|d| DepositCsvRow {
                    wallet: result.wallet.to_string(),
                    account: d.account.to_string(),
                    slot_index: d.slot_index,
                    classification: d.classification.to_string(),
                    lockup_kind: d.lockup_kind.to_string(),
                    amount_native: d.amount_native,
                    amount_tokens: d.amount_tokens,
                    multiplier: d.multiplier,
                    power: d.power,
                    lockup_end_ts: d.lockup_end_ts,
                });
                Self::export_csv(rows)
            }
        }
    }

    /// Leaderboard of a batch run
    pub fn format_batch(report: &BatchReport, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Console => {
                let mut output = String::new();
                output.push_str(&format!(
                    "Governance power at {} ({}), {} wallets\n\n",
                    timestamp_to_iso(report.evaluated_at),
                    report.evaluated_at,
                    Self::format_number(report.results.len())
                ));
                output.push_str(&format!(
                    "{:>4}  {:<44} {:>20} {:>20} {:>20} {:>7} {:>8}\n",
                    "Rank", "Wallet", "Native", "Delegated", "Total", "Share", "Accounts"
                ));
                let total = report.total_power();
                for (rank, result) in report.leaderboard().iter().enumerate() {
                    output.push_str(&format!(
                        "{:>4}  {:<44} {:>20} {:>20} {:>20} {:>6.2}% {:>8}\n",
                        rank + 1,
                        result.wallet.to_string(),
                        format_tokens(result.native_power, 6),
                        format_tokens(result.delegated_power, 6),
                        format_tokens(result.total_power, 6),
                        safe_share(result.total_power, total),
                        result.contributing_accounts().len()
                    ));
                }
                output.push_str(&format!("\nTotal power: {}\n", format_tokens(total, 6)));
                output.push_str(&format!(
                    "Accounts: {} scanned, {} skipped; slots: {} decoded, {} failed\n",
                    Self::format_number(report.stats.accounts_scanned as usize),
                    Self::format_number(report.stats.accounts_skipped as usize),
                    Self::format_number(report.stats.slots_decoded as usize),
                    Self::format_number(report.stats.slot_failures as usize)
                ));
                output.push_str(&Self::format_audit_summary(&report.audit));
                Ok(output)
            }
            OutputFormat::Json => Self::export_json(&BatchJson {
                evaluated_at: report.evaluated_at,
                total_power: report.total_power(),
                results: &report.results,
                audit: &report.audit,
                stats: &report.stats,
            }),
            OutputFormat::Csv => {
                let rows = report.results.iter().map(|r| WalletCsvRow {
                    wallet: r.wallet.to_string(),
                    native_power: r.native_power,
                    delegated_power: r.delegated_power,
                    total_power: r.total_power,
                    contributing_accounts: r.contributing_accounts().len(),
                    contributing_deposits: r.contributing_deposits.len(),
                    evaluated_at: report.evaluated_at,
                });
                Self::export_csv(rows)
            }
        }
    }

    /// Header and slots of one decoded account
    pub fn format_decoded_account(
        view: &DecodedAccountView,
        token_decimal_shift: u8,
        format: OutputFormat,
    ) -> AppResult<String> {
        match format {
            OutputFormat::Console => {
                let mut output = String::new();
                output.push_str(&format!("Account:         {}\n", view.address));
                output.push_str(&format!("Layout:          {}\n", view.layout));
                output.push_str(&format!("Authority:       {}\n", view.authority));
                output.push_str(&format!(
                    "Voter authority: {}{}\n",
                    view.voter_authority,
                    if view.self_voted { " (self)" } else { "" }
                ));
                if let Some(registrar) = &view.registrar {
                    output.push_str(&format!("Registrar:       {}\n", registrar));
                }
                output.push_str(&format!(
                    "Slots:           {} used, {} failed\n\n",
                    view.used_slots(),
                    view.failed_slots()
                ));

                for slot in &view.slots {
                    match (&slot.entry, &slot.error) {
                        (Some(entry), _) => {
                            output.push_str(&format!(
                                "[{:>2}] {} {} {} -> {}",
                                slot.slot_index,
                                if entry.is_used { "used  " } else { "unused" },
                                entry.lockup_kind,
                                format_native_as_tokens(entry.amount_native, token_decimal_shift),
                                timestamp_to_iso(entry.lockup_end_ts)
                            ));
                            if let Some(tag) = entry.unknown_lockup_tag {
                                output.push_str(&format!(" [unknown kind {}]", tag));
                            }
                            if let Some(multiplier) = slot.multiplier {
                                output.push_str(&format!(" x{:.4}", multiplier));
                            }
                            output.push('\n');
                        }
                        (None, Some(error)) => {
                            output.push_str(&format!("[{:>2}] error: {}\n", slot.slot_index, error));
                        }
                        (None, None) => {}
                    }
                }
                Ok(output)
            }
            OutputFormat::Json | OutputFormat::Csv => Self::export_json(view),
        }
    }

    fn format_audit_summary(audit: &AuditLog) -> String {
        if audit.is_empty() {
            return String::new();
        }

        let mut output = format!("\nAudit: {} issues\n", Self::format_number(audit.len()));
        for issue in audit.issues().iter().take(CONSOLE_AUDIT_LIMIT) {
            let location = match issue.slot {
                Some(slot) => format!("{} slot {}", issue.address.short(), slot),
                None => issue.address.short(),
            };
            let detail = match &issue.kind {
                AuditKind::MalformedAccount { reason } => format!("malformed account: {}", reason),
                AuditKind::SlotDecodeFailure { reason } => format!("slot discarded: {}", reason),
                AuditKind::UnknownLockupKind { tag } => {
                    format!("unknown lockup kind {} scored as none", tag)
                }
                AuditKind::AliasConflict {
                    kept_wallet,
                    rejected_wallet,
                } => format!(
                    "alias kept for {}, rejected for {}",
                    kept_wallet.short(),
                    rejected_wallet.short()
                ),
            };
            output.push_str(&format!("  {}: {}\n", location, detail));
        }
        if audit.len() > CONSOLE_AUDIT_LIMIT {
            output.push_str(&format!(
                "  ... {} more (use --format json for the full list)\n",
                audit.len() - CONSOLE_AUDIT_LIMIT
            ));
        }
        output
    }

    /// Export data as pretty-printed JSON
    pub fn export_json<T: Serialize>(data: &T) -> AppResult<String> {
        serde_json::to_string_pretty(data)
            .map_err(|e| AppError::InvalidData(format!("JSON export failed: {}", e)))
    }

    fn export_csv<T, I>(rows: I) -> AppResult<String>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::InvalidData(format!("CSV export failed: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::InvalidData(format!("CSV export failed: {}", e)))
    }
}

/// Write output to file with safe directory creation
pub fn write_output_to_file(path: &Path, content: &str, description: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    println!("{} written to: {}", description, path.display());
    Ok(())
}
