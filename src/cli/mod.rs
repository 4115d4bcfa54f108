use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Governance voting power from voter-stake-registry snapshots
#[derive(Parser)]
#[command(name = "governance-power")]
#[command(about = "Governance voting power from voter-stake-registry snapshots")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Native and delegated power of one wallet, with deposit breakdown
    Power(commands::power::PowerCommand),
    /// Power of many wallets in one pass (leaderboard)
    Batch(commands::batch::BatchCommand),
    /// Decode one voter account from the snapshot
    Decode(commands::decode::DecodeCommand),
}

pub fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "warn" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Power(command) => command.run(),
        Commands::Batch(command) => command.run(),
        Commands::Decode(command) => command.run(),
    }
}
