//! Gossip verification of individual `PayloadAttestationMessage`s.
//!
//! A message passing these checks is safe to forward and to feed into the
//! aggregation pool. Aggregate verification at block inclusion is separate
//! (`state_processing::process_payload_attestation`).

use slot_clock::SlotClock;
use state_processing::ptc::{PtcSelectionError, get_ptc};
use std::collections::HashMap;
use std::time::Duration;
use types::{
    BeaconState, ChainSpec, Domain, EthSpec, Hash256, PayloadAttestationMessage, SignedRoot, Slot,
    beacon_state,
};

#[derive(Debug, PartialEq)]
pub enum Error {
    /// The local clock is prior to genesis; nothing can be verified.
    PriorToGenesis,
    /// The message is for neither the current nor the previous slot.
    StaleSlot {
        message_slot: Slot,
        current_slot: Slot,
    },
    /// A current-slot vote arrived after the PTC deadline; it can no longer
    /// influence the vote it was meant for.
    PtcDeadlineExceeded {
        message_slot: Slot,
        duration_into_slot: Duration,
    },
    /// The attested block is not known.
    UnknownRoot { beacon_block_root: Hash256 },
    /// The attested block is not the block of the attested slot.
    BlockSlotMismatch {
        message_slot: Slot,
        block_slot: Slot,
    },
    /// The sender holds no seat on the slot's PTC.
    ValidatorNotInCommittee {
        validator_index: u64,
        slot: Slot,
    },
    BadSignature,
    BeaconState(beacon_state::Error),
    PtcSelection(PtcSelectionError),
}

impl From<beacon_state::Error> for Error {
    fn from(e: beacon_state::Error) -> Self {
        Error::BeaconState(e)
    }
}

impl From<PtcSelectionError> for Error {
    fn from(e: PtcSelectionError) -> Self {
        Error::PtcSelection(e)
    }
}

/// The seam through which verification asks "do we know this block, and at
/// which slot?". The canonical implementation is the fork-choice block
/// cache; tests use a map.
pub trait BlockLookup {
    fn block_slot(&self, beacon_block_root: Hash256) -> Option<Slot>;
}

impl BlockLookup for HashMap<Hash256, Slot> {
    fn block_slot(&self, beacon_block_root: Hash256) -> Option<Slot> {
        self.get(&beacon_block_root).copied()
    }
}

/// A payload attestation message that passed gossip verification, carrying
/// the sender's seat so the aggregation pool can set the right bit.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPayloadAttestationMessage {
    pub message: PayloadAttestationMessage,
    pub committee_position: usize,
}

/// Verifies a single PTC vote from gossip.
///
/// Previous-slot votes are always timely: they are still needed by the next
/// block's on-chain aggregate. Current-slot votes are dropped once the PTC
/// deadline (plus clock disparity) has passed.
pub fn verify_payload_attestation_message<E: EthSpec, C: SlotClock, L: BlockLookup>(
    message: &PayloadAttestationMessage,
    state: &BeaconState<E>,
    clock: &C,
    block_lookup: &L,
    spec: &ChainSpec,
) -> Result<VerifiedPayloadAttestationMessage, Error> {
    let data = &message.data;
    let current_slot = clock.now().ok_or(Error::PriorToGenesis)?;

    if data.slot > current_slot || data.slot + 1 < current_slot {
        return Err(Error::StaleSlot {
            message_slot: data.slot,
            current_slot,
        });
    }

    if data.slot == current_slot {
        let duration_into_slot = clock.duration_into_slot().ok_or(Error::PriorToGenesis)?;
        let cutoff = spec.ptc_attestation_deadline + spec.maximum_gossip_clock_disparity();
        if duration_into_slot > cutoff {
            return Err(Error::PtcDeadlineExceeded {
                message_slot: data.slot,
                duration_into_slot,
            });
        }
    }

    let block_slot =
        block_lookup
            .block_slot(data.beacon_block_root)
            .ok_or(Error::UnknownRoot {
                beacon_block_root: data.beacon_block_root,
            })?;
    if block_slot != data.slot {
        return Err(Error::BlockSlotMismatch {
            message_slot: data.slot,
            block_slot,
        });
    }

    let ptc = get_ptc(state, data.slot, spec)?;
    let committee_position = ptc
        .iter()
        .position(|&member| member == message.validator_index)
        .ok_or(Error::ValidatorNotInCommittee {
            validator_index: message.validator_index,
            slot: data.slot,
        })?;

    let pubkey = state
        .get_validator(message.validator_index)?
        .pubkey
        .decompress()
        .map_err(|_| Error::BadSignature)?;
    let domain = spec.get_domain(Domain::PtcAttester, state.genesis_validators_root);
    if !message.signature.verify(&pubkey, data.signing_root(domain)) {
        return Err(Error::BadSignature);
    }

    Ok(VerifiedPayloadAttestationMessage {
        message: message.clone(),
        committee_position,
    })
}
