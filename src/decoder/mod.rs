//! Voter account decoder
//!
//! Turns raw account bytes into typed voter headers and deposit entries using an
//! explicit, versioned layout. Decode failures are surfaced per account or per
//! slot and never smoothed over.

pub mod deposit_parser;
pub mod error;
pub mod layout;
pub mod voter;

pub use deposit_parser::{parse_deposit_entries, DecodeLimits};
pub use error::{DecodeError, DecodeResult};
pub use layout::{
    anchor_account_discriminator, DepositFieldOffsets, LayoutConfig, LayoutRegistry, VoterLayout,
};
pub use voter::{VoterAccount, VoterDecoder};
