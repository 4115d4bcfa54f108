//! File-based pipeline: config, snapshot dump and alias file on disk

use crate::common::{account, wallet, DepositSpec, VoterAccountBuilder, NOW, YEAR};
use governance_power::cli::commands::SourceArgs;
use governance_power::errors::AppError;
use governance_power::power::PowerEngine;
use governance_power::report::{OutputFormat, ReportFormatter};
use governance_power::snapshot::write_json_snapshot;
use governance_power::types::{AccountSnapshot, LockupKind};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const CONFIG: &str = r#"
[processing]
default_realm = "islanddao"
parallel = true

[realms.islanddao]
baseline_scale = 1000000000
max_extra_scale = 1000000000
saturation_secs = 31536000
token_decimal_shift = 6

[[layouts]]
name = "delegated-voter"
anchor_account = "DelegatedVoter"
authority_offset = 8
voter_authority_offset = 40
deposits_offset = 72
slot_count = 32
slot_size = 80
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        std::fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
        std::fs::write(
            dir.path().join("aliases.toml"),
            format!(
                "[[wallet]]\nwallet = \"{}\"\naliases = [\"{}\"]\n",
                wallet(1),
                wallet(60)
            ),
        )
        .unwrap();

        let snapshot = AccountSnapshot::new(
            NOW,
            vec![
                VoterAccountBuilder::new(account(1), wallet(1))
                    .deposit(DepositSpec::unlocked(0, 1_000_000))
                    .build(),
                VoterAccountBuilder::new(account(2), wallet(60))
                    .deposit(DepositSpec::locked(
                        0,
                        LockupKind::Constant,
                        2_000_000,
                        NOW,
                        NOW + YEAR,
                    ))
                    .build(),
                VoterAccountBuilder::new(account(3), wallet(5))
                    .voter_authority(wallet(2))
                    .deposit(DepositSpec::unlocked(3, 3_000_000))
                    .build(),
            ],
        );
        write_json_snapshot(&snapshot, &dir.path().join("snapshot.json")).unwrap();

        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn source(&self) -> SourceArgs {
        SourceArgs {
            snapshot: Some(self.path("snapshot.json")),
            realm: None,
            aliases: Some(self.path("aliases.toml")),
            now: None,
            config: Some(self.path("config.toml")),
        }
    }
}

#[test]
fn test_context_resolves_all_inputs() {
    let fixture = Fixture::new();
    let ctx = fixture.source().context().unwrap();

    assert_eq!(ctx.realm, "islanddao");
    assert_eq!(ctx.snapshot.len(), 3);
    assert_eq!(ctx.snapshot.captured_at(), NOW);
    assert_eq!(ctx.aliases.owner_of(&wallet(60)), Some(&wallet(1)));
    assert!(ctx.decoder.registry().get("delegated-voter").is_some());
}

#[test]
fn test_batch_from_files() {
    let fixture = Fixture::new();
    let ctx = fixture.source().context().unwrap();

    let engine = PowerEngine::new(ctx.registrar, &ctx.aliases)
        .unwrap()
        .with_decoder(ctx.decoder);
    let report = engine.batch(&[wallet(1), wallet(2)], &ctx.snapshot);

    // 1 unlocked token + 2 tokens at 2x through the alias
    assert_eq!(report.results[0].native_power, 5.0);
    assert_eq!(report.results[1].delegated_power, 3.0);

    let csv = ReportFormatter::format_batch(&report, OutputFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 3);
    let json = ReportFormatter::format_batch(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_power"], 8.0);
}

#[test]
fn test_missing_realm_is_fatal() {
    let fixture = Fixture::new();
    let mut source = fixture.source();
    source.realm = Some("otherdao".to_string());

    match source.context() {
        Err(AppError::MissingRegistrarConfig { realm }) => assert_eq!(realm, "otherdao"),
        Err(other) => panic!("expected MissingRegistrarConfig, got {}", other),
        Ok(_) => panic!("expected MissingRegistrarConfig"),
    }
}

#[test]
fn test_now_override_applies_to_snapshot() {
    let fixture = Fixture::new();
    let mut source = fixture.source();
    source.now = Some(NOW + 2 * YEAR);

    let ctx = source.context().unwrap();
    assert_eq!(ctx.snapshot.captured_at(), NOW + 2 * YEAR);

    let engine = PowerEngine::new(ctx.registrar, &ctx.aliases)
        .unwrap()
        .with_decoder(ctx.decoder);
    // every lockup has expired: 1 + 2 tokens at 1x
    assert_eq!(engine.wallet_power(&wallet(1), &ctx.snapshot).native_power, 3.0);
}

fn run_cli(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_governance-power"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_cli_batch_writes_csv() {
    let fixture = Fixture::new();
    let wallet_1 = wallet(1).to_string();
    let wallet_2 = wallet(2).to_string();

    let output = run_cli(
        fixture.dir.path(),
        &[
            "batch",
            "--snapshot",
            "snapshot.json",
            "--aliases",
            "aliases.toml",
            "--wallet",
            &wallet_1,
            "--wallet",
            &wallet_2,
            "--format",
            "csv",
            "--output",
            "out/leaderboard.csv",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let csv = std::fs::read_to_string(fixture.path("out/leaderboard.csv")).unwrap();
    assert!(csv.starts_with("wallet,native_power,delegated_power,total_power"));
    assert!(csv.contains(&wallet_1));
}

#[test]
fn test_cli_power_json_and_decode() {
    let fixture = Fixture::new();
    let wallet_1 = wallet(1).to_string();

    let output = run_cli(
        fixture.dir.path(),
        &["power", "--wallet", &wallet_1, "--format", "json", "--snapshot", "snapshot.json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["native_power"], 1.0);

    let account_2 = account(2).to_string();
    let output = run_cli(
        fixture.dir.path(),
        &["decode", "--account", &account_2, "--snapshot", "snapshot.json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Constant"));
    assert!(stdout.contains("x2.0000"));
}

#[test]
fn test_cli_missing_realm_exits_with_error() {
    let fixture = Fixture::new();
    let wallet_1 = wallet(1).to_string();
    let output = run_cli(
        fixture.dir.path(),
        &["power", "--wallet", &wallet_1, "--snapshot", "snapshot.json", "--realm", "nope"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing registrar config"));
}
