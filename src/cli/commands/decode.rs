use super::{emit, SourceArgs};
use crate::errors::{AppError, AppResult};
use crate::report::{DecodedAccountView, OutputFormat, ReportFormatter};
use crate::types::Address;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Dump one voter account's decoded header and deposit slots
#[derive(Args)]
pub struct DecodeCommand {
    /// Voter account address (base58)
    #[arg(long)]
    pub account: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Also list unused slots
    #[arg(long)]
    pub all_slots: bool,

    /// Output format: console, json
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Write output to file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl DecodeCommand {
    pub fn run(&self) -> AppResult<()> {
        let address: Address = self.account.parse()?;
        let app_config = self.source.load_config()?;
        let snapshot = self.source.load_snapshot(&app_config)?;
        let decoder = app_config.decoder()?;

        // Multipliers are shown only when a realm can be resolved
        let registrar = match app_config.realm_or_default(self.source.realm.as_deref()) {
            Ok(realm) => Some(app_config.resolve_registrar_config(&realm)?),
            Err(_) => {
                info!("No realm configured; multipliers will not be shown");
                None
            }
        };

        let account = snapshot.get(&address).ok_or_else(|| {
            AppError::Snapshot(format!("Account {} not found in snapshot", address))
        })?;
        let (voter, entries) = decoder.decode_with_entries(account)?;

        let view = DecodedAccountView::new(
            &voter,
            entries,
            snapshot.captured_at(),
            registrar.as_ref(),
            self.all_slots,
        );
        let shift = registrar.map_or(0, |r| r.token_decimal_shift);
        let output =
            ReportFormatter::format_decoded_account(&view, shift, OutputFormat::parse(&self.format))?;
        emit(&output, self.output.as_deref(), "Decoded account")
    }
}
