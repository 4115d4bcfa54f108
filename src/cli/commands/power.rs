use super::{emit, SourceArgs};
use crate::errors::AppResult;
use crate::power::PowerEngine;
use crate::report::{OutputFormat, ReportFormatter};
use crate::types::Address;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Compute the native and delegated power of one wallet
#[derive(Args)]
pub struct PowerCommand {
    /// Wallet address (base58)
    #[arg(long)]
    pub wallet: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format: console, json, csv
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Write output to file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl PowerCommand {
    pub fn run(&self) -> AppResult<()> {
        let wallet: Address = self.wallet.parse()?;
        let ctx = self.source.context()?;

        let engine = PowerEngine::new(ctx.registrar, &ctx.aliases)?.with_decoder(ctx.decoder);
        let report = engine.evaluate_wallet(&wallet, &ctx.snapshot);
        info!(
            "Wallet {}: native {}, delegated {}, total {}",
            wallet, report.result.native_power, report.result.delegated_power, report.result.total_power
        );

        let output = ReportFormatter::format_wallet(
            &report,
            ctx.snapshot.captured_at(),
            OutputFormat::parse(&self.format),
        )?;
        emit(&output, self.output.as_deref(), "Wallet report")
    }
}
