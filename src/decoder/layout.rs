//! Voter account byte layouts
//!
//! A layout pins down where the owner, optional delegate and registrar keys
//! and the fixed-size deposit slots sit inside a voter account. Layouts are
//! versioned and selected by the 8-byte account discriminator, so a new
//! on-chain schema is a new layout entry rather than another round of offset
//! probing.
//!
//! The built-in `vsr-voter-v1` layout follows the voter-stake-registry Anchor
//! `Voter` account:
//!
//! ```text
//! [discriminator:8][voter_authority:32][registrar:32][deposits: 32 x 80][bumps + reserved: 96]
//!
//! deposit entry (80 bytes):
//!   0  lockup.start_ts                 i64
//!   8  lockup.end_ts                   i64
//!  16  lockup.kind                     u8   (+15 reserved)
//!  32  amount_deposited_native         u64
//!  40  amount_initially_locked_native  u64
//!  48  is_used                         bool
//!  49  allow_clawback                  bool
//!  50  voting_mint_config_idx          u8   (+29 reserved)
//! ```
//!
//! VSR's `voter_authority` is the wallet that owns and votes with the account;
//! it is read as the layout's `authority`. The account records no separate
//! delegate, so `vsr-voter-v1` declares no `voter_authority_offset` and every
//! VSR account is self-voted. Layouts of programs that store a delegate key
//! declare where it lives.

use super::{DecodeError, DecodeResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::Range;

/// Length of an Anchor account discriminator
pub const DISCRIMINATOR_LEN: usize = 8;

/// Length of a public key field
pub const PUBKEY_LEN: usize = 32;

/// Total size of a voter-stake-registry `Voter` account
pub const VSR_VOTER_ACCOUNT_LEN: usize = 2728;

/// Anchor account discriminator: first 8 bytes of sha256("account:<Name>")
pub fn anchor_account_discriminator(account_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let hash = Sha256::digest(format!("account:{}", account_name).as_bytes());
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    discriminator
}

/// Field offsets inside one deposit slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositFieldOffsets {
    pub lockup_start_ts: usize,
    pub lockup_end_ts: usize,
    pub lockup_kind: usize,
    pub amount_native: usize,
    pub amount_initially_locked_native: usize,
    pub is_used: usize,
}

impl DepositFieldOffsets {
    /// voter-stake-registry `DepositEntry`
    pub const VSR: Self = Self {
        lockup_start_ts: 0,
        lockup_end_ts: 8,
        lockup_kind: 16,
        amount_native: 32,
        amount_initially_locked_native: 40,
        is_used: 48,
    };

    /// (name, offset, width) of every decoded field
    fn spans(&self) -> [(&'static str, usize, usize); 6] {
        [
            ("lockup_start_ts", self.lockup_start_ts, 8),
            ("lockup_end_ts", self.lockup_end_ts, 8),
            ("lockup_kind", self.lockup_kind, 1),
            ("amount_native", self.amount_native, 8),
            (
                "amount_initially_locked_native",
                self.amount_initially_locked_native,
                8,
            ),
            ("is_used", self.is_used, 1),
        ]
    }
}

impl Default for DepositFieldOffsets {
    fn default() -> Self {
        Self::VSR
    }
}

/// One versioned voter account layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterLayout {
    pub name: String,
    /// Leading bytes that identify this layout; `None` makes it a fallback
    pub discriminator: Option<[u8; DISCRIMINATOR_LEN]>,
    /// Owner of the deposits
    pub authority_offset: usize,
    /// Delegate key; without one the owner votes
    pub voter_authority_offset: Option<usize>,
    /// Registrar the account belongs to
    pub registrar_offset: Option<usize>,
    pub deposits_offset: usize,
    pub slot_count: usize,
    pub slot_size: usize,
    pub fields: DepositFieldOffsets,
}

impl VoterLayout {
    /// voter-stake-registry `Voter` account
    pub fn vsr_voter() -> Self {
        Self {
            name: "vsr-voter-v1".to_string(),
            discriminator: Some(anchor_account_discriminator("Voter")),
            authority_offset: 8,
            voter_authority_offset: None,
            registrar_offset: Some(40),
            deposits_offset: 72,
            slot_count: 32,
            slot_size: 80,
            fields: DepositFieldOffsets::VSR,
        }
    }

    /// Offsets of every public key field in the header
    fn key_offsets(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.authority_offset)
            .chain(self.voter_authority_offset)
            .chain(self.registrar_offset)
    }

    /// Bytes needed before any deposit slot can be read
    pub fn header_len(&self) -> usize {
        let discriminator_len = if self.discriminator.is_some() {
            DISCRIMINATOR_LEN
        } else {
            0
        };
        self.key_offsets()
            .map(|offset| offset + PUBKEY_LEN)
            .fold(discriminator_len, usize::max)
    }

    /// Byte range of slot `index`, `None` past the declared slot count
    pub fn slot_range(&self, index: usize) -> Option<Range<usize>> {
        if index >= self.slot_count {
            return None;
        }
        let start = self.deposits_offset + index * self.slot_size;
        Some(start..start + self.slot_size)
    }

    /// Number of complete slots present in a buffer of `data_len` bytes
    pub fn slots_present(&self, data_len: usize) -> usize {
        if data_len < self.deposits_offset {
            return 0;
        }
        ((data_len - self.deposits_offset) / self.slot_size).min(self.slot_count)
    }

    /// Reject layouts whose fields overlap the slot boundary or the header
    pub fn validate(&self) -> DecodeResult<()> {
        let invalid = |reason: String| DecodeError::InvalidLayout {
            name: self.name.clone(),
            reason,
        };

        if self.slot_size == 0 {
            return Err(invalid("slot_size cannot be zero".to_string()));
        }
        if self.slot_count == 0 {
            return Err(invalid("slot_count cannot be zero".to_string()));
        }
        for (field, offset, width) in self.fields.spans() {
            if offset + width > self.slot_size {
                return Err(invalid(format!(
                    "field {} at {}..{} exceeds slot size {}",
                    field,
                    offset,
                    offset + width,
                    self.slot_size
                )));
            }
        }
        if self.discriminator.is_some()
            && self.key_offsets().any(|offset| offset < DISCRIMINATOR_LEN)
        {
            return Err(invalid(
                "header keys overlap the discriminator".to_string(),
            ));
        }
        if self.deposits_offset < self.header_len() {
            return Err(invalid(format!(
                "deposits start at {} inside the {}-byte header",
                self.deposits_offset,
                self.header_len()
            )));
        }
        Ok(())
    }
}

/// Layout declaration as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub name: String,
    /// Hex-encoded 8-byte discriminator
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Anchor account name to derive the discriminator from
    #[serde(default)]
    pub anchor_account: Option<String>,
    pub authority_offset: usize,
    #[serde(default)]
    pub voter_authority_offset: Option<usize>,
    #[serde(default)]
    pub registrar_offset: Option<usize>,
    pub deposits_offset: usize,
    pub slot_count: usize,
    pub slot_size: usize,
    #[serde(default)]
    pub fields: DepositFieldOffsets,
}

impl TryFrom<LayoutConfig> for VoterLayout {
    type Error = DecodeError;

    fn try_from(config: LayoutConfig) -> DecodeResult<Self> {
        let discriminator = match (&config.discriminator, &config.anchor_account) {
            (Some(_), Some(_)) => {
                return Err(DecodeError::InvalidLayout {
                    name: config.name.clone(),
                    reason: "set either discriminator or anchor_account, not both".to_string(),
                })
            }
            (Some(hex_str), None) => {
                let bytes = hex::decode(hex_str.trim()).map_err(|e| DecodeError::InvalidLayout {
                    name: config.name.clone(),
                    reason: format!("discriminator is not hex: {}", e),
                })?;
                let array: [u8; DISCRIMINATOR_LEN] =
                    bytes.try_into().map_err(|_| DecodeError::InvalidLayout {
                        name: config.name.clone(),
                        reason: format!("discriminator must be {} bytes", DISCRIMINATOR_LEN),
                    })?;
                Some(array)
            }
            (None, Some(account)) => Some(anchor_account_discriminator(account)),
            (None, None) => None,
        };

        let layout = VoterLayout {
            name: config.name,
            discriminator,
            authority_offset: config.authority_offset,
            voter_authority_offset: config.voter_authority_offset,
            registrar_offset: config.registrar_offset,
            deposits_offset: config.deposits_offset,
            slot_count: config.slot_count,
            slot_size: config.slot_size,
            fields: config.fields,
        };
        layout.validate()?;
        Ok(layout)
    }
}

/// Known voter layouts, selected by discriminator
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: Vec<VoterLayout>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the voter-stake-registry layout
    pub fn standard() -> Self {
        Self {
            layouts: vec![VoterLayout::vsr_voter()],
        }
    }

    /// Add a layout after validating it; discriminators must stay unique
    pub fn register(&mut self, layout: VoterLayout) -> DecodeResult<()> {
        layout.validate()?;
        let clash = self.layouts.iter().any(|existing| {
            existing.name == layout.name
                || (layout.discriminator.is_some() && existing.discriminator == layout.discriminator)
        });
        if clash {
            return Err(DecodeError::InvalidLayout {
                name: layout.name,
                reason: "name or discriminator already registered".to_string(),
            });
        }
        self.layouts.push(layout);
        Ok(())
    }

    pub fn layouts(&self) -> &[VoterLayout] {
        &self.layouts
    }

    pub fn get(&self, name: &str) -> Option<&VoterLayout> {
        self.layouts.iter().find(|l| l.name == name)
    }

    /// Pick the layout for an account buffer
    ///
    /// An exact discriminator match wins; otherwise the first layout without a
    /// discriminator is used as fallback.
    pub fn select(&self, data: &[u8]) -> DecodeResult<&VoterLayout> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(DecodeError::AccountTooShort {
                len: data.len(),
                required: DISCRIMINATOR_LEN,
            });
        }
        let discriminator = &data[..DISCRIMINATOR_LEN];

        self.layouts
            .iter()
            .find(|l| l.discriminator.is_some_and(|d| d[..] == *discriminator))
            .or_else(|| self.layouts.iter().find(|l| l.discriminator.is_none()))
            .ok_or_else(|| DecodeError::UnknownDiscriminator {
                discriminator: hex::encode(discriminator),
            })
    }
}
