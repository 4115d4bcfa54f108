//! Decoder-specific error types

/// Result type for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decoder-specific error types
///
/// Account-level variants cause the whole account to be skipped; slot-level
/// variants only discard the offending slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Account too short: {len} bytes, at least {required} required")]
    AccountTooShort { len: usize, required: usize },

    #[error("No voter layout registered for discriminator {discriminator}")]
    UnknownDiscriminator { discriminator: String },

    #[error("Slot {slot}: {len} bytes, layout slot size is {required}")]
    SlotTooShort {
        slot: usize,
        len: usize,
        required: usize,
    },

    #[error("Slot {slot}: field '{field}' holds {value}, expected 0 or 1")]
    InvalidBool {
        slot: usize,
        field: &'static str,
        value: u8,
    },

    #[error("Slot {slot}: amount {amount} exceeds plausible maximum {max}")]
    AmountOutOfRange { slot: usize, amount: u64, max: u64 },

    #[error("Slot {slot}: {field} {value} outside plausible range [{min}, {max}]")]
    TimestampOutOfRange {
        slot: usize,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Slot {slot}: lockup ends at {end_ts} before it starts at {start_ts}")]
    InvalidLockupWindow {
        slot: usize,
        start_ts: i64,
        end_ts: i64,
    },

    #[error("Invalid layout '{name}': {reason}")]
    InvalidLayout { name: String, reason: String },
}

impl DecodeError {
    /// Slot index for slot-level failures
    pub fn slot(&self) -> Option<usize> {
        match self {
            DecodeError::SlotTooShort { slot, .. }
            | DecodeError::InvalidBool { slot, .. }
            | DecodeError::AmountOutOfRange { slot, .. }
            | DecodeError::TimestampOutOfRange { slot, .. }
            | DecodeError::InvalidLockupWindow { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}
