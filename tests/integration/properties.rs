//! Property tests for the multiplier and aggregation invariants

use crate::common::{
    account, engine, registrar, wallet, DepositSpec, VoterAccountBuilder, NOW, YEAR,
};
use governance_power::power::{lockup_multiplier, AliasMap};
use governance_power::types::{
    AccountSnapshot, Classification, LockupKind, RawAccount, RegistrarConfig,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn any_kind() -> impl Strategy<Value = LockupKind> {
    (0u8..5).prop_map(|tag| LockupKind::from_tag(tag).unwrap())
}

fn any_config() -> impl Strategy<Value = RegistrarConfig> {
    (1u64..1_000_000_000_000, 0u64..1_000_000_000_000, 1u64..1_000_000_000).prop_map(
        |(baseline_scale, max_extra_scale, saturation_secs)| RegistrarConfig {
            baseline_scale,
            max_extra_scale,
            saturation_secs,
            token_decimal_shift: 6,
            registrar: None,
        },
    )
}

/// (authority, voter authority, deposits as (kind tag, amount, start offset, length))
type AccountSpec = (u8, u8, Vec<(u8, u64, i64, i64)>);

fn any_accounts() -> impl Strategy<Value = Vec<AccountSpec>> {
    prop::collection::vec(
        (
            1u8..6,
            1u8..6,
            prop::collection::vec(
                (0u8..5, 0u64..10_000_000_000, -YEAR..YEAR, 0i64..4 * YEAR),
                0..6,
            ),
        ),
        0..12,
    )
}

fn build_accounts(specs: &[AccountSpec]) -> Vec<RawAccount> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (authority, voter_authority, deposits))| {
            let mut builder = VoterAccountBuilder::new(account(i as u8), wallet(*authority))
                .voter_authority(wallet(*voter_authority));
            for (slot, &(tag, amount, offset, length)) in deposits.iter().enumerate() {
                let kind = LockupKind::from_tag(tag).unwrap();
                let start = NOW + offset;
                builder = builder.deposit(DepositSpec::locked(slot, kind, amount, start, start + length));
            }
            builder.build()
        })
        .collect()
}

proptest! {
    /// Deposits without lockup always score 1.0
    #[test]
    fn none_kind_is_exactly_one(start in any::<i64>(), end in any::<i64>(), now in any::<i64>(), config in any_config()) {
        prop_assert_eq!(lockup_multiplier(LockupKind::None, start, end, now, &config), 1.0);
    }

    /// Expired lockups score 1.0 whatever their kind
    #[test]
    fn expired_is_exactly_one(kind in any_kind(), start in any::<i64>(), end in any::<i64>(), past in 0i64..i64::MAX, config in any_config()) {
        let now = end.saturating_add(past);
        prop_assert_eq!(lockup_multiplier(kind, start, end, now, &config), 1.0);
    }

    /// The multiplier stays within [1, 1 + extra / baseline]
    #[test]
    fn multiplier_within_bounds(kind in any_kind(), start in any::<i64>(), end in any::<i64>(), now in any::<i64>(), config in any_config()) {
        let m = lockup_multiplier(kind, start, end, now, &config);
        prop_assert!(m >= 1.0);
        prop_assert!(m <= config.max_multiplier());
    }

    /// Cliff and monthly vesting never gain weight as time passes
    #[test]
    fn cliff_non_increasing_in_time(
        monthly in any::<bool>(),
        start in 0i64..4_000_000_000,
        length in 0i64..10 * YEAR,
        t1 in 0i64..4_000_000_000,
        dt in 0i64..10 * YEAR,
    ) {
        let kind = if monthly { LockupKind::VestingMonthly } else { LockupKind::Cliff };
        let config = registrar();
        let earlier = lockup_multiplier(kind, start, start + length, t1, &config);
        let later = lockup_multiplier(kind, start, start + length, t1 + dt, &config);
        prop_assert!(later <= earlier);
    }

    /// Two runs over the same snapshot give bit-identical results
    #[test]
    fn computation_is_idempotent(specs in any_accounts(), target in 1u8..6) {
        let snapshot = AccountSnapshot::new(NOW, build_accounts(&specs));
        let aliases = AliasMap::new();
        let engine = engine(&aliases);
        let first = engine.wallet_power(&wallet(target), &snapshot);
        let second = engine.wallet_power(&wallet(target), &snapshot);
        prop_assert_eq!(first.total_power.to_bits(), second.total_power.to_bits());
        prop_assert_eq!(first, second);
    }

    /// No account feeds both the native and the delegated power of one wallet
    #[test]
    fn native_and_delegated_are_disjoint(specs in any_accounts(), target in 1u8..6) {
        let snapshot = AccountSnapshot::new(NOW, build_accounts(&specs));
        let aliases = AliasMap::new();
        let result = engine(&aliases).wallet_power(&wallet(target), &snapshot);

        let native: HashSet<_> = result.contributing_deposits.iter()
            .filter(|d| d.classification == Classification::Native)
            .map(|d| d.account)
            .collect();
        let delegated: HashSet<_> = result.contributing_deposits.iter()
            .filter(|d| d.classification == Classification::Delegated)
            .map(|d| d.account)
            .collect();
        prop_assert!(native.is_disjoint(&delegated));
        prop_assert_eq!(result.total_power, result.native_power + result.delegated_power);
    }

    /// Batch totals do not depend on the order of accounts in the snapshot
    #[test]
    fn batch_is_order_independent(specs in any_accounts(), rotation in 0usize..12) {
        let accounts = build_accounts(&specs);
        let mut reordered = accounts.clone();
        reordered.reverse();
        if !reordered.is_empty() {
            let by = rotation % reordered.len();
            reordered.rotate_left(by);
        }

        let wallets: Vec<_> = (1u8..6).map(wallet).collect();
        let aliases = AliasMap::new();
        let engine = engine(&aliases);
        let original = engine.batch(&wallets, &AccountSnapshot::new(NOW, accounts)).results;
        let shuffled = engine.batch(&wallets, &AccountSnapshot::new(NOW, reordered)).results;
        prop_assert_eq!(original, shuffled);
    }

    /// Within one batch every (account, slot) is counted at most once
    #[test]
    fn batch_counts_each_slot_once(specs in any_accounts()) {
        let snapshot = AccountSnapshot::new(NOW, build_accounts(&specs));
        let wallets: Vec<_> = (1u8..6).map(wallet).collect();
        let aliases = AliasMap::new();
        let report = engine(&aliases).batch(&wallets, &snapshot);

        let mut seen = HashSet::new();
        for result in &report.results {
            for deposit in &result.contributing_deposits {
                prop_assert!(seen.insert((deposit.account, deposit.slot_index)));
            }
        }
    }
}
