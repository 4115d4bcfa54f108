use super::{emit, SourceArgs};
use crate::errors::{AppError, AppResult};
use crate::power::PowerEngine;
use crate::report::{OutputFormat, ReportFormatter};
use crate::types::Address;
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

/// Compute power for many wallets in one pass (leaderboard run)
#[derive(Args)]
pub struct BatchCommand {
    /// Wallet address (repeatable)
    #[arg(long = "wallet")]
    pub wallets: Vec<String>,

    /// File with one wallet address per line; '#' starts a comment
    #[arg(long)]
    pub wallets_file: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Build the delegation index on a single thread (overrides processing.parallel)
    #[arg(long)]
    pub sequential: bool,

    /// Output format: console, json, csv
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Write output to file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl BatchCommand {
    pub fn run(&self) -> AppResult<()> {
        let wallets = self.collect_wallets()?;
        if wallets.is_empty() {
            return Err(AppError::Config(
                "No wallets given. Use --wallet or --wallets-file".to_string(),
            ));
        }

        let ctx = self.source.context()?;
        let parallel = ctx.app_config.processing.parallel && !self.sequential;

        let engine = PowerEngine::new(ctx.registrar, &ctx.aliases)?
            .with_decoder(ctx.decoder)
            .with_parallelism(parallel);
        let report = engine.batch(&wallets, &ctx.snapshot);
        info!(
            "Realm {}: {} wallets resolved, {} audit issues",
            ctx.realm,
            report.results.len(),
            report.audit.len()
        );

        let output = ReportFormatter::format_batch(&report, OutputFormat::parse(&self.format))?;
        emit(&output, self.output.as_deref(), "Batch report")
    }

    fn collect_wallets(&self) -> AppResult<Vec<Address>> {
        let mut wallets = self
            .wallets
            .iter()
            .map(|w| w.parse::<Address>().map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        if let Some(path) = &self.wallets_file {
            wallets.extend(read_wallets_file(path)?);
        }
        Ok(wallets)
    }
}

/// Parse a wallet list: one base58 address per line, blank lines and `#` comments ignored
pub fn read_wallets_file(path: &Path) -> AppResult<Vec<Address>> {
    let contents = std::fs::read_to_string(path)?;
    contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.parse::<Address>().map_err(AppError::from))
        .collect()
}
