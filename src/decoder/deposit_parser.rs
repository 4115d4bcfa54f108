//! Deposit slot parser
//!
//! Reads the fixed-size deposit slots of one voter account. Each slot is decoded
//! independently: a malformed slot yields an error for that slot only, and a
//! buffer that ends before a slot means that slot and every later one do not
//! exist.

use super::layout::VoterLayout;
use super::{DecodeError, DecodeResult};
use crate::types::{DepositEntry, LockupKind};
use byteorder::{LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

/// Plausible value ranges for used deposit slots
///
/// Anything outside these bounds is a decode failure for the slot, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    pub max_amount_native: u64,
    pub min_timestamp: i64,
    pub max_timestamp: i64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_amount_native: 1_000_000_000_000_000_000,
            min_timestamp: 0,
            // 2100-01-01T00:00:00Z
            max_timestamp: 4_102_444_800,
        }
    }
}

/// Decode every slot present in `data`, in slot order
pub fn parse_deposit_entries(
    data: &[u8],
    layout: &VoterLayout,
    limits: &DecodeLimits,
) -> Vec<DecodeResult<DepositEntry>> {
    let present = layout.slots_present(data.len());
    if present < layout.slot_count {
        debug!(
            "Layout {} declares {} slots, buffer of {} bytes holds {}",
            layout.name,
            layout.slot_count,
            data.len(),
            present
        );
    }

    (0..present)
        .filter_map(|index| {
            let range = layout.slot_range(index)?;
            Some(parse_slot(index, &data[range], layout, limits))
        })
        .collect()
}

/// Decode one slot from its `slot_size` bytes
///
/// A shorter buffer is a `SlotTooShort` failure for that slot.
pub fn parse_slot(
    slot_index: usize,
    slot: &[u8],
    layout: &VoterLayout,
    limits: &DecodeLimits,
) -> DecodeResult<DepositEntry> {
    if slot.len() < layout.slot_size {
        return Err(DecodeError::SlotTooShort {
            slot: slot_index,
            len: slot.len(),
            required: layout.slot_size,
        });
    }
    let fields = &layout.fields;

    let is_used = read_bool(slot, fields.is_used, slot_index, "is_used")?;
    let amount_native = read_u64(slot, fields.amount_native);
    let amount_initially_locked_native = read_u64(slot, fields.amount_initially_locked_native);
    let lockup_start_ts = read_i64(slot, fields.lockup_start_ts);
    let lockup_end_ts = read_i64(slot, fields.lockup_end_ts);
    let kind_tag = slot[fields.lockup_kind];

    let (lockup_kind, unknown_lockup_tag) = match LockupKind::from_tag(kind_tag) {
        Some(kind) => (kind, None),
        None => (LockupKind::None, Some(kind_tag)),
    };

    let entry = DepositEntry {
        slot_index,
        is_used,
        amount_native,
        amount_initially_locked_native,
        lockup_kind,
        lockup_start_ts,
        lockup_end_ts,
        unknown_lockup_tag,
    };

    // Unused slots carry stale bytes; they are returned for audit without range checks
    if entry.is_used {
        check_limits(&entry, limits)?;
    }

    Ok(entry)
}

fn check_limits(entry: &DepositEntry, limits: &DecodeLimits) -> DecodeResult<()> {
    let slot = entry.slot_index;

    for (amount, max) in [
        (entry.amount_native, limits.max_amount_native),
        (entry.amount_initially_locked_native, limits.max_amount_native),
    ] {
        if amount > max {
            return Err(DecodeError::AmountOutOfRange { slot, amount, max });
        }
    }

    if entry.lockup_kind.is_time_bound() {
        for (field, value) in [
            ("lockup_start_ts", entry.lockup_start_ts),
            ("lockup_end_ts", entry.lockup_end_ts),
        ] {
            if value < limits.min_timestamp || value > limits.max_timestamp {
                return Err(DecodeError::TimestampOutOfRange {
                    slot,
                    field,
                    value,
                    min: limits.min_timestamp,
                    max: limits.max_timestamp,
                });
            }
        }
        if entry.lockup_end_ts < entry.lockup_start_ts {
            return Err(DecodeError::InvalidLockupWindow {
                slot,
                start_ts: entry.lockup_start_ts,
                end_ts: entry.lockup_end_ts,
            });
        }
    }

    Ok(())
}

// Offsets are validated against the slot size when the layout is registered,
// and `parse_slot` rejects buffers shorter than a slot.
fn read_u64(slot: &[u8], offset: usize) -> u64 {
    let mut cursor = Cursor::new(&slot[offset..offset + 8]);
    cursor.read_u64::<LittleEndian>().unwrap_or_default()
}

fn read_i64(slot: &[u8], offset: usize) -> i64 {
    let mut cursor = Cursor::new(&slot[offset..offset + 8]);
    cursor.read_i64::<LittleEndian>().unwrap_or_default()
}

fn read_bool(slot: &[u8], offset: usize, slot_index: usize, field: &'static str) -> DecodeResult<bool> {
    match slot[offset] {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(DecodeError::InvalidBool {
            slot: slot_index,
            field,
            value,
        }),
    }
}
