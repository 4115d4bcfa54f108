//! Serializable view of a single decoded voter account

use crate::decoder::{DecodeResult, VoterAccount};
use crate::power::lockup_multiplier;
use crate::types::{Address, DepositEntry, RegistrarConfig};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DecodedSlot {
    pub slot_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<DepositEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Only set when registrar constants were available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodedAccountView {
    pub address: Address,
    pub layout: String,
    pub authority: Address,
    pub voter_authority: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<Address>,
    pub self_voted: bool,
    pub evaluated_at: i64,
    pub slots: Vec<DecodedSlot>,
}

impl DecodedAccountView {
    /// Build the view; unused slots are left out unless `include_unused`
    pub fn new(
        voter: &VoterAccount<'_>,
        entries: Vec<DecodeResult<DepositEntry>>,
        now: i64,
        registrar: Option<&RegistrarConfig>,
        include_unused: bool,
    ) -> Self {
        let slots = entries
            .into_iter()
            .filter_map(|result| match result {
                Ok(entry) => {
                    if !entry.is_used && !include_unused {
                        return None;
                    }
                    let multiplier = registrar.map(|config| {
                        lockup_multiplier(
                            entry.lockup_kind,
                            entry.lockup_start_ts,
                            entry.lockup_end_ts,
                            now,
                            config,
                        )
                    });
                    Some(DecodedSlot {
                        slot_index: entry.slot_index,
                        entry: Some(entry),
                        error: None,
                        multiplier,
                    })
                }
                Err(e) => Some(DecodedSlot {
                    slot_index: e.slot().unwrap_or_default(),
                    entry: None,
                    error: Some(e.to_string()),
                    multiplier: None,
                }),
            })
            .collect();

        Self {
            address: voter.address,
            layout: voter.layout.name.clone(),
            authority: voter.authority,
            voter_authority: voter.voter_authority,
            registrar: voter.registrar,
            self_voted: voter.is_self_voted(),
            evaluated_at: now,
            slots,
        }
    }

    pub fn used_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.entry.as_ref().is_some_and(|e| e.is_used))
            .count()
    }

    pub fn failed_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.error.is_some()).count()
    }
}
