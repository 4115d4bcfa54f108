//! Reference scenarios for single-wallet and batch computation

use crate::common::{
    account, engine, registrar, registrar_key, wallet, DepositSpec, VoterAccountBuilder, NOW,
};
use governance_power::power::{AliasMap, AuditKind, PowerEngine};
use governance_power::types::{AccountSnapshot, Classification, LockupKind, RawAccount};
use governance_power::{compute_all_wallet_powers, compute_wallet_power};

#[test]
fn scenario_a_unlocked_native_deposit() {
    let w = wallet(1);
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![VoterAccountBuilder::new(account(1), w)
            .deposit(DepositSpec::unlocked(0, 1_000_000))
            .build()],
    );

    let result = compute_wallet_power(&w, &snapshot, &registrar(), &AliasMap::new()).unwrap();
    assert_eq!(result.native_power, 1.0);
    assert_eq!(result.delegated_power, 0.0);
    assert_eq!(result.total_power, 1.0);
    assert_eq!(result.contributing_deposits[0].multiplier, 1.0);
}

#[test]
fn scenario_b_saturated_constant_lockup_delegated() {
    let owner = wallet(1);
    let delegate = wallet(2);
    let saturation = registrar().saturation_secs as i64;
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![VoterAccountBuilder::new(account(1), owner)
            .voter_authority(delegate)
            .deposit(DepositSpec::locked(
                0,
                LockupKind::Constant,
                500_000_000,
                NOW,
                NOW + saturation,
            ))
            .build()],
    );

    let aliases = AliasMap::new();
    let engine = engine(&aliases);
    let result = engine.wallet_power(&delegate, &snapshot);
    assert_eq!(result.contributing_deposits[0].multiplier, 2.0);
    assert_eq!(result.delegated_power, 1000.0);
    assert_eq!(result.native_power, 0.0);

    let owner_result = engine.wallet_power(&owner, &snapshot);
    assert_eq!(owner_result.native_power, 1000.0);
    assert_eq!(owner_result.delegated_power, 0.0);
}

#[test]
fn scenario_c_unused_slot_ignored() {
    let w = wallet(1);
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![VoterAccountBuilder::new(account(1), w)
            .deposit(DepositSpec::unlocked(0, 2_000_000))
            .deposit(DepositSpec::unlocked(1, 2_000_000).unused())
            .build()],
    );

    let result = compute_wallet_power(&w, &snapshot, &registrar(), &AliasMap::new()).unwrap();
    assert_eq!(result.total_power, 2.0);
    assert_eq!(result.contributing_deposits.len(), 1);
    assert_eq!(result.contributing_deposits[0].slot_index, 0);
}

#[test]
fn scenario_d_malformed_account_skipped_in_batch() {
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![
            VoterAccountBuilder::new(account(1), wallet(1))
                .deposit(DepositSpec::unlocked(0, 3_000_000))
                .build(),
            RawAccount::new(account(2), vec![0u8; 10]),
            VoterAccountBuilder::new(account(3), wallet(2))
                .deposit(DepositSpec::unlocked(0, 4_000_000))
                .build(),
        ],
    );

    let aliases = AliasMap::new();
    let engine = PowerEngine::new(registrar(), &aliases).unwrap();
    let report = engine.batch(&[wallet(1), wallet(2)], &snapshot);

    assert_eq!(report.results[0].total_power, 3.0);
    assert_eq!(report.results[1].total_power, 4.0);
    assert_eq!(report.audit.malformed_accounts(), 1);
    assert_eq!(report.audit.issues()[0].address, account(2));
    assert_eq!(report.stats.accounts_skipped, 1);
}

#[test]
fn self_voted_account_is_native_only() {
    let w = wallet(1);
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![VoterAccountBuilder::new(account(1), w)
            .deposit(DepositSpec::unlocked(0, 1_000_000))
            .build()],
    );

    let result = compute_wallet_power(&w, &snapshot, &registrar(), &AliasMap::new()).unwrap();
    assert_eq!(result.native_power, 1.0);
    assert_eq!(result.delegated_power, 0.0);
    assert!(result
        .contributing_deposits
        .iter()
        .all(|d| d.classification == Classification::Native));
}

#[test]
fn alias_authority_counts_as_native() {
    let citizen = wallet(1);
    let cold_wallet = wallet(50);
    let mut aliases = AliasMap::new();
    aliases.declare(citizen, cold_wallet);

    let snapshot = AccountSnapshot::new(
        NOW,
        vec![
            VoterAccountBuilder::new(account(1), citizen)
                .deposit(DepositSpec::unlocked(0, 1_000_000))
                .build(),
            VoterAccountBuilder::new(account(2), cold_wallet)
                .deposit(DepositSpec::unlocked(0, 9_000_000))
                .build(),
        ],
    );

    let result = compute_wallet_power(&citizen, &snapshot, &registrar(), &aliases).unwrap();
    assert_eq!(result.native_power, 10.0);
    assert_eq!(result.contributing_accounts(), vec![account(1), account(2)]);
}

#[test]
fn batch_matches_single_wallet_for_disjoint_wallets() {
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![
            VoterAccountBuilder::new(account(1), wallet(1))
                .deposit(DepositSpec::locked(0, LockupKind::Cliff, 5_000_000, NOW - 10, NOW + 1_000_000))
                .build(),
            VoterAccountBuilder::new(account(2), wallet(3))
                .voter_authority(wallet(2))
                .deposit(DepositSpec::unlocked(2, 7_000_000))
                .build(),
        ],
    );
    let aliases = AliasMap::new();
    let engine = engine(&aliases);
    let wallets = [wallet(1), wallet(2), wallet(4)];

    let batch = engine.batch(&wallets, &snapshot).results;
    for (w, batch_result) in wallets.iter().zip(&batch) {
        assert_eq!(&engine.wallet_power(w, &snapshot), batch_result);
    }
    assert_eq!(batch[1].delegated_power, 7.0);
    assert_eq!(batch[2].total_power, 0.0);
}

#[test]
fn vsr_registrar_key_is_not_a_delegate() {
    let snapshot = AccountSnapshot::new(
        NOW,
        (1u8..=3)
            .map(|n| {
                VoterAccountBuilder::new(account(n), wallet(n))
                    .deposit(DepositSpec::unlocked(0, n as u64 * 1_000_000))
                    .build()
            })
            .collect(),
    );
    let aliases = AliasMap::new();

    let registrar_power =
        compute_wallet_power(&registrar_key(), &snapshot, &registrar(), &aliases).unwrap();
    assert_eq!(registrar_power.total_power, 0.0);

    let batch = compute_all_wallet_powers(
        &[registrar_key(), wallet(1)],
        &snapshot,
        &registrar(),
        &aliases,
    )
    .unwrap();
    assert_eq!(batch[0].total_power, 0.0);
    assert_eq!(batch[1].native_power, 1.0);
    assert_eq!(batch[1].delegated_power, 0.0);
}

#[test]
fn conflicting_alias_counts_for_first_declared_wallet_only() {
    let first = wallet(1);
    let second = wallet(2);
    let shared = wallet(50);
    let mut aliases = AliasMap::new();
    assert!(aliases.declare(first, shared));
    assert!(!aliases.declare(second, shared));

    let snapshot = AccountSnapshot::new(
        NOW,
        vec![VoterAccountBuilder::new(account(1), shared)
            .deposit(DepositSpec::unlocked(0, 4_000_000))
            .build()],
    );
    let engine = PowerEngine::new(registrar(), &aliases).unwrap();
    let is_conflict = |kind: &AuditKind| matches!(kind, AuditKind::AliasConflict { .. });

    let kept = engine.evaluate_wallet(&first, &snapshot);
    assert_eq!(kept.result.native_power, 4.0);
    let rejected = engine.evaluate_wallet(&second, &snapshot);
    assert_eq!(rejected.result.total_power, 0.0);
    assert!(rejected.audit.issues().iter().any(|issue| is_conflict(&issue.kind)));

    let batch = engine.batch(&[second, first], &snapshot);
    assert_eq!(batch.results[0].total_power, 0.0);
    assert_eq!(batch.results[1].native_power, 4.0);
    assert!(batch.audit.issues().iter().any(|issue| is_conflict(&issue.kind)));
}

#[test]
fn unknown_lockup_kind_is_scored_as_unlocked() {
    let w = wallet(1);
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![VoterAccountBuilder::new(account(1), w)
            .deposit(DepositSpec::locked(0, LockupKind::Cliff, 2_000_000, NOW, NOW + 1_000).with_raw_kind(7))
            .build()],
    );

    let aliases = AliasMap::new();
    let engine = PowerEngine::new(registrar(), &aliases).unwrap();
    let report = engine.evaluate_wallet(&w, &snapshot);
    assert_eq!(report.result.total_power, 2.0);
    assert_eq!(report.stats.unknown_lockup_kinds, 1);
}

#[test]
fn evaluation_time_override_changes_multiplier() {
    let w = wallet(1);
    let snapshot = AccountSnapshot::new(
        NOW,
        vec![VoterAccountBuilder::new(account(1), w)
            .deposit(DepositSpec::locked(0, LockupKind::Cliff, 1_000_000, NOW - 100, NOW + 100))
            .build()],
    );
    let aliases = AliasMap::new();

    let before = compute_wallet_power(&w, &snapshot, &registrar(), &aliases).unwrap();
    let after = compute_wallet_power(
        &w,
        &snapshot.with_evaluation_time(NOW + 100),
        &registrar(),
        &aliases,
    )
    .unwrap();
    assert!(before.total_power > 1.0);
    assert_eq!(after.total_power, 1.0);
}
