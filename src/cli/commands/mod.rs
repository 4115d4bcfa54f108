pub mod batch;
pub mod decode;
pub mod power;

use crate::config::AppConfig;
use crate::decoder::VoterDecoder;
use crate::errors::{AppError, AppResult};
use crate::power::AliasMap;
use crate::report::write_output_to_file;
use crate::snapshot::{JsonSnapshotFile, SnapshotSource};
use crate::types::{AccountSnapshot, RegistrarConfig};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ===== Shared Arguments =====

/// Inputs shared by every command
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Snapshot JSON dump (overrides paths.snapshot)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Realm whose registrar constants apply (overrides processing.default_realm)
    #[arg(long)]
    pub realm: Option<String>,

    /// Alias file (overrides paths.aliases)
    #[arg(long)]
    pub aliases: Option<PathBuf>,

    /// Evaluation time in unix seconds (defaults to the snapshot's captured_at)
    #[arg(long)]
    pub now: Option<i64>,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Everything a power computation needs, resolved from CLI, file and environment
pub struct RunContext {
    pub app_config: AppConfig,
    pub realm: String,
    pub registrar: RegistrarConfig,
    pub aliases: AliasMap,
    pub decoder: VoterDecoder,
    pub snapshot: AccountSnapshot,
}

impl SourceArgs {
    pub fn load_config(&self) -> AppResult<AppConfig> {
        match &self.config {
            Some(path) => AppConfig::load_from(path),
            None => AppConfig::load(),
        }
    }

    pub fn load_snapshot(&self, app_config: &AppConfig) -> AppResult<AccountSnapshot> {
        let path = self
            .snapshot
            .clone()
            .or_else(|| app_config.paths.snapshot.clone())
            .ok_or_else(|| {
                AppError::Config(
                    "No snapshot provided. Use --snapshot or configure paths.snapshot in config.toml"
                        .to_string(),
                )
            })?;

        JsonSnapshotFile::new(path)
            .with_captured_at(self.now)
            .load_snapshot()
    }

    pub fn load_aliases(&self, app_config: &AppConfig) -> AppResult<AliasMap> {
        match self.aliases.as_ref().or(app_config.paths.aliases.as_ref()) {
            Some(path) => {
                let aliases = AliasMap::load(path)?;
                if !aliases.conflicts().is_empty() {
                    warn!(
                        "{} alias conflicts in {}; first declarations kept",
                        aliases.conflicts().len(),
                        path.display()
                    );
                }
                Ok(aliases)
            }
            None => Ok(AliasMap::new()),
        }
    }

    /// Resolve config, registrar constants, aliases and snapshot
    ///
    /// A missing registrar config is fatal here, before any account is read.
    pub fn context(&self) -> AppResult<RunContext> {
        let app_config = self.load_config()?;
        let realm = app_config.realm_or_default(self.realm.as_deref())?;
        let registrar = app_config.resolve_registrar_config(&realm)?;
        let decoder = app_config.decoder()?;
        let aliases = self.load_aliases(&app_config)?;
        let snapshot = self.load_snapshot(&app_config)?;

        info!(
            "Realm {}: {} accounts, {} aliases, evaluated at {}",
            realm,
            snapshot.len(),
            aliases.len(),
            snapshot.captured_at()
        );

        Ok(RunContext {
            app_config,
            realm,
            registrar,
            aliases,
            decoder,
            snapshot,
        })
    }
}

// ===== Helper Functions =====

/// Print to stdout or write to `output` when given
fn emit(content: &str, output: Option<&Path>, description: &str) -> AppResult<()> {
    match output {
        Some(path) => write_output_to_file(path, content, description),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
