//! Block-carried ePBS operations: the builder's bid and the previous slot's
//! aggregated payload attestation.

use crate::errors::{BlockProcessingError, ValidationError};
use crate::ptc::get_ptc;
use safe_arith::SafeArith;
use types::{
    BeaconState, BuilderPendingPayment, ChainSpec, Domain, EthSpec, Hash256, PayloadAttestation,
    SignedExecutionPayloadBid, SignedRoot, Slot,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerifySignatures {
    True,
    False,
}

impl VerifySignatures {
    pub fn is_true(self) -> bool {
        self == VerifySignatures::True
    }
}

/// Runs the bid checks without mutating the state, in order: signature,
/// builder liveness, funds, slot, parent linkage. The first violated check
/// decides the error.
pub fn verify_execution_payload_bid<E: EthSpec>(
    state: &BeaconState<E>,
    signed_bid: &SignedExecutionPayloadBid,
    block_slot: Slot,
    block_parent_root: Hash256,
    verify_signatures: VerifySignatures,
    spec: &ChainSpec,
) -> Result<(), BlockProcessingError> {
    let bid = &signed_bid.message;

    // The signature can only be checked against a registered key.
    let builder = state.get_builder(bid.builder_index).map_err(|_| {
        ValidationError::UnknownBuilder {
            builder_index: bid.builder_index,
        }
    })?;

    if verify_signatures.is_true() {
        let pubkey = builder
            .pubkey
            .decompress()
            .map_err(|_| ValidationError::BadSignature)?;
        let domain = spec.get_domain(Domain::BeaconBuilder, state.genesis_validators_root);
        if !signed_bid.signature.verify(&pubkey, bid.signing_root(domain)) {
            return Err(ValidationError::BadSignature.into());
        }
    }

    if builder.slashed
        || !builder.is_active_at_finalized_epoch(state.finalized_checkpoint.epoch, spec)
    {
        return Err(ValidationError::UnknownBuilder {
            builder_index: bid.builder_index,
        }
        .into());
    }

    // The bid must be covered on top of everything already owed plus the
    // minimum reserve.
    let pending = state.builder_pending_balance_to_withdraw(bid.builder_index)?;
    let required = bid
        .value
        .safe_add(pending)?
        .safe_add(spec.min_builder_balance)?;
    if builder.balance < required {
        return Err(ValidationError::InsufficientFunds {
            builder_index: bid.builder_index,
            balance: builder.balance,
            required,
        }
        .into());
    }

    if bid.slot != block_slot {
        return Err(ValidationError::SlotMismatch {
            expected: block_slot,
            found: bid.slot,
        }
        .into());
    }

    if bid.parent_block_hash != state.latest_block_hash {
        return Err(ValidationError::ParentMismatch {
            expected: state.latest_block_hash,
            found: bid.parent_block_hash,
        }
        .into());
    }
    if bid.parent_block_root != block_parent_root {
        return Err(ValidationError::ParentMismatch {
            expected: block_parent_root,
            found: bid.parent_block_root,
        }
        .into());
    }

    Ok(())
}

/// Verifies the bid carried by a block and, on success, parks the pending
/// payment in the ring and caches the committed header.
pub fn process_execution_payload_bid<E: EthSpec>(
    state: &mut BeaconState<E>,
    signed_bid: &SignedExecutionPayloadBid,
    block_slot: Slot,
    block_parent_root: Hash256,
    verify_signatures: VerifySignatures,
    spec: &ChainSpec,
) -> Result<(), BlockProcessingError> {
    verify_execution_payload_bid(
        state,
        signed_bid,
        block_slot,
        block_parent_root,
        verify_signatures,
        spec,
    )?;

    let bid = &signed_bid.message;
    if bid.value > 0 {
        state.set_builder_payment(BuilderPendingPayment {
            builder_index: bid.builder_index,
            amount: bid.value,
            slot: bid.slot,
        });
    }
    state.latest_execution_payload_bid = bid.clone();

    Ok(())
}

/// Verifies the aggregated PTC attestation a block carries for its parent
/// slot. Validation only; the availability bit is owned by envelope
/// application.
pub fn process_payload_attestation<E: EthSpec>(
    state: &BeaconState<E>,
    attestation: &PayloadAttestation<E>,
    verify_signatures: VerifySignatures,
    spec: &ChainSpec,
) -> Result<(), BlockProcessingError> {
    let data = &attestation.data;

    // PTC votes ride in the block of the following slot.
    if data.slot + 1 != state.slot {
        return Err(ValidationError::SlotMismatch {
            expected: state.slot.saturating_sub(1u64),
            found: data.slot,
        }
        .into());
    }

    if data.beacon_block_root != state.latest_block_header.parent_root {
        return Err(ValidationError::UnknownRoot {
            beacon_block_root: data.beacon_block_root,
        }
        .into());
    }

    let ptc = get_ptc(state, data.slot, spec)?;
    let positions = attestation.attesting_positions();
    if positions.is_empty() {
        return Err(BlockProcessingError::EmptyAggregate);
    }
    if let Some(&position) = positions.iter().find(|&&p| p >= ptc.len()) {
        return Err(BlockProcessingError::InvalidCommitteePosition {
            position,
            committee_len: ptc.len(),
        });
    }

    if verify_signatures.is_true() {
        let pubkeys = positions
            .iter()
            .map(|&position| {
                state
                    .get_validator(ptc[position])?
                    .pubkey
                    .decompress()
                    .map_err(|_| ValidationError::BadSignature.into())
            })
            .collect::<Result<Vec<_>, BlockProcessingError>>()?;
        let pubkey_refs = pubkeys.iter().collect::<Vec<_>>();
        let domain = spec.get_domain(Domain::PtcAttester, state.genesis_validators_root);
        if !attestation
            .signature
            .fast_aggregate_verify(data.signing_root(domain), &pubkey_refs)
        {
            return Err(ValidationError::BadSignature.into());
        }
    }

    Ok(())
}
