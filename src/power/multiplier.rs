//! Lockup multiplier calculation
//!
//! Pure function of the lockup kind, its window, the evaluation time and the
//! registrar constants. The result is always within
//! `[1.0, 1 + max_extra_scale / baseline_scale]`.

use crate::types::{LockupKind, RegistrarConfig};

/// Vote weight multiplier of a deposit at time `now`
///
/// - `None` kind or an expired lockup (`end_ts <= now`): exactly 1.0
/// - `Cliff` / `VestingMonthly`: bonus scales with the remaining lockup time
/// - `Constant` / `VestingDaily`: bonus scales with the still-locked fraction
///   of the full lockup duration
///
/// A registrar with a zero baseline or saturation admits no bonus, so every
/// deposit scores 1.0 under it.
pub fn lockup_multiplier(
    kind: LockupKind,
    start_ts: i64,
    end_ts: i64,
    now: i64,
    config: &RegistrarConfig,
) -> f64 {
    if matches!(kind, LockupKind::None) || end_ts <= now {
        return 1.0;
    }
    if config.baseline_scale == 0 || config.saturation_secs == 0 {
        return 1.0;
    }

    let saturation = config.saturation_secs as f64;
    let ratio = match kind {
        LockupKind::Cliff | LockupKind::VestingMonthly => {
            let remaining = end_ts.saturating_sub(now).max(0) as f64;
            (remaining / saturation).min(1.0)
        }
        LockupKind::Constant | LockupKind::VestingDaily => {
            let duration = end_ts.saturating_sub(start_ts).max(1) as f64;
            let elapsed = now.saturating_sub(start_ts) as f64;
            let unlocked_fraction = (elapsed / duration).clamp(0.0, 1.0);
            let locked_fraction = 1.0 - unlocked_fraction;
            (locked_fraction * duration / saturation).min(1.0)
        }
        LockupKind::None => 0.0,
    };

    let baseline = config.baseline_scale as f64;
    let multiplier = (baseline + config.max_extra_scale as f64 * ratio) / baseline;
    multiplier.clamp(1.0, config.max_multiplier())
}
