//! Voter account byte builder
//!
//! Writes the voter-stake-registry layout: discriminator, owner @8,
//! registrar @40, 32 deposit slots of 80 bytes from offset 72, then the
//! trailing fields. Setting a voter authority switches to the delegating test
//! layout, which stores the delegate @40 instead of the registrar.

use super::DELEGATING_ACCOUNT;
use byteorder::{LittleEndian, WriteBytesExt};
use governance_power::decoder::{anchor_account_discriminator, layout::VSR_VOTER_ACCOUNT_LEN};
use governance_power::types::{Address, LockupKind, RawAccount};
use std::io::Cursor;

const DEPOSITS_OFFSET: usize = 72;
const SLOT_SIZE: usize = 80;

/// One deposit slot to write
#[derive(Debug, Clone, Copy)]
pub struct DepositSpec {
    pub slot: usize,
    pub is_used: u8,
    pub kind_tag: u8,
    pub amount_native: u64,
    pub start_ts: i64,
    pub end_ts: i64,
}

impl DepositSpec {
    /// Used deposit with the given lockup
    pub fn locked(slot: usize, kind: LockupKind, amount_native: u64, start_ts: i64, end_ts: i64) -> Self {
        Self {
            slot,
            is_used: 1,
            kind_tag: kind.tag(),
            amount_native,
            start_ts,
            end_ts,
        }
    }

    /// Used deposit without lockup
    pub fn unlocked(slot: usize, amount_native: u64) -> Self {
        Self::locked(slot, LockupKind::None, amount_native, 0, 0)
    }

    pub fn unused(mut self) -> Self {
        self.is_used = 0;
        self
    }

    pub fn with_raw_kind(mut self, tag: u8) -> Self {
        self.kind_tag = tag;
        self
    }

    pub fn with_used_byte(mut self, value: u8) -> Self {
        self.is_used = value;
        self
    }
}

/// Builds raw voter account bytes
#[derive(Debug, Clone)]
pub struct VoterAccountBuilder {
    address: Address,
    authority: Address,
    /// Key written at offset 40: registrar, or delegate in the delegating layout
    key_at_40: Address,
    deposits: Vec<DepositSpec>,
    discriminator: [u8; 8],
    length: usize,
}

impl VoterAccountBuilder {
    /// voter-stake-registry account owned by `authority`
    pub fn new(address: Address, authority: Address) -> Self {
        Self {
            address,
            authority,
            key_at_40: super::registrar_key(),
            deposits: Vec::new(),
            discriminator: anchor_account_discriminator("Voter"),
            length: VSR_VOTER_ACCOUNT_LEN,
        }
    }

    pub fn registrar(mut self, registrar: Address) -> Self {
        self.key_at_40 = registrar;
        self
    }

    /// Switch to the delegating layout with `voter_authority` as delegate
    pub fn voter_authority(mut self, voter_authority: Address) -> Self {
        self.key_at_40 = voter_authority;
        self.discriminator = anchor_account_discriminator(DELEGATING_ACCOUNT);
        self
    }

    pub fn deposit(mut self, spec: DepositSpec) -> Self {
        self.deposits.push(spec);
        self
    }

    pub fn discriminator(mut self, discriminator: [u8; 8]) -> Self {
        self.discriminator = discriminator;
        self
    }

    /// Truncate (or pad) the buffer to `length` bytes
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; VSR_VOTER_ACCOUNT_LEN.max(self.length)];
        data[..8].copy_from_slice(&self.discriminator);
        data[8..40].copy_from_slice(self.authority.as_bytes());
        data[40..72].copy_from_slice(self.key_at_40.as_bytes());

        for spec in &self.deposits {
            let base = DEPOSITS_OFFSET + spec.slot * SLOT_SIZE;
            let mut cursor = Cursor::new(&mut data[base..base + SLOT_SIZE]);
            cursor.write_i64::<LittleEndian>(spec.start_ts).unwrap();
            cursor.write_i64::<LittleEndian>(spec.end_ts).unwrap();
            cursor.write_u8(spec.kind_tag).unwrap();
            cursor.set_position(32);
            cursor.write_u64::<LittleEndian>(spec.amount_native).unwrap();
            cursor.write_u64::<LittleEndian>(spec.amount_native).unwrap();
            cursor.write_u8(spec.is_used).unwrap();
        }

        data.truncate(self.length);
        data
    }

    pub fn build(&self) -> RawAccount {
        RawAccount::new(self.address, self.bytes())
    }
}
