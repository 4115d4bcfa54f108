//! Voter account decoding
//!
//! Selects the layout for an account buffer, reads the owner, delegate and
//! registrar keys from the header and exposes the deposit slots through the
//! slot parser.

use super::deposit_parser::{parse_deposit_entries, DecodeLimits};
use super::layout::{LayoutRegistry, VoterLayout, PUBKEY_LEN};
use super::{DecodeError, DecodeResult};
use crate::types::{Address, DepositEntry, RawAccount};

/// A voter account whose header has been decoded
#[derive(Debug, Clone)]
pub struct VoterAccount<'a> {
    pub address: Address,
    pub data: &'a [u8],
    /// Wallet that owns the deposits
    pub authority: Address,
    /// Wallet allowed to vote with the deposits; the owner unless the layout
    /// stores a delegate
    pub voter_authority: Address,
    /// Registrar key, for layouts that carry one
    pub registrar: Option<Address>,
    pub layout: &'a VoterLayout,
}

impl<'a> VoterAccount<'a> {
    /// Owner votes for itself
    pub fn is_self_voted(&self) -> bool {
        self.authority == self.voter_authority
    }

    /// Per-slot decode results in slot order
    pub fn deposit_entries(&self, limits: &DecodeLimits) -> Vec<DecodeResult<DepositEntry>> {
        parse_deposit_entries(self.data, self.layout, limits)
    }
}

/// Decodes raw snapshot accounts into `VoterAccount`s
#[derive(Debug, Clone)]
pub struct VoterDecoder {
    registry: LayoutRegistry,
    limits: DecodeLimits,
}

impl Default for VoterDecoder {
    fn default() -> Self {
        Self::standard()
    }
}

impl VoterDecoder {
    pub fn new(registry: LayoutRegistry, limits: DecodeLimits) -> Self {
        Self { registry, limits }
    }

    /// voter-stake-registry layout with default plausibility limits
    pub fn standard() -> Self {
        Self::new(LayoutRegistry::standard(), DecodeLimits::default())
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Decode the header of one account
    ///
    /// Fails with `AccountTooShort` when the buffer cannot hold the authority
    /// fields, or `UnknownDiscriminator` when no layout matches.
    pub fn decode<'a>(&'a self, account: &'a RawAccount) -> DecodeResult<VoterAccount<'a>> {
        let data = account.data.as_slice();
        let layout = self.registry.select(data)?;

        let required = layout.header_len();
        if data.len() < required {
            return Err(DecodeError::AccountTooShort {
                len: data.len(),
                required,
            });
        }

        let authority = read_address(data, layout.authority_offset);
        Ok(VoterAccount {
            address: account.address,
            data,
            authority,
            voter_authority: layout
                .voter_authority_offset
                .map_or(authority, |offset| read_address(data, offset)),
            registrar: layout.registrar_offset.map(|offset| read_address(data, offset)),
            layout,
        })
    }

    /// Decode header and every slot of one account
    pub fn decode_with_entries<'a>(
        &'a self,
        account: &'a RawAccount,
    ) -> DecodeResult<(VoterAccount<'a>, Vec<DecodeResult<DepositEntry>>)> {
        let voter = self.decode(account)?;
        let entries = voter.deposit_entries(&self.limits);
        Ok((voter, entries))
    }
}

fn read_address(data: &[u8], offset: usize) -> Address {
    let mut bytes = [0u8; PUBKEY_LEN];
    bytes.copy_from_slice(&data[offset..offset + PUBKEY_LEN]);
    Address::new(bytes)
}
