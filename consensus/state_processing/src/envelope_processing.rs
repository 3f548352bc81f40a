//! Application of a revealed execution payload envelope to the state.
//!
//! The envelope arrives after the block that committed its bid. Verification
//! binds it to the committed bid and the current head; application flips the
//! slot's availability bit and advances the execution-side caches.

use crate::errors::{EnvelopeProcessingError, ValidationError};
use crate::execution_engine::{ExecutionEngine, PayloadStatus};
use crate::per_block_processing::VerifySignatures;
use tracing::debug;
use types::{BeaconState, ChainSpec, Domain, EthSpec, SignedExecutionPayloadEnvelope, SignedRoot};

/// How far envelope processing got. Only `Applied` mutates the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeOutcome {
    /// The payload was verified, accepted by the engine and applied.
    Applied,
    /// The envelope is well-formed but the engine could not judge the
    /// payload yet. The caller should retry once the engine catches up.
    NotConfirmed,
}

/// Verifies `signed_envelope` against the committed bid and, if the engine
/// accepts the payload, applies it.
///
/// On any error, and on `NotConfirmed`, the state is untouched.
pub fn process_execution_payload_envelope<E: EthSpec, Engine: ExecutionEngine<E>>(
    state: &mut BeaconState<E>,
    signed_envelope: &SignedExecutionPayloadEnvelope<E>,
    engine: &Engine,
    verify_signatures: VerifySignatures,
    spec: &ChainSpec,
) -> Result<EnvelopeOutcome, EnvelopeProcessingError> {
    let envelope = &signed_envelope.message;
    let bid = state.latest_execution_payload_bid.clone();

    // Only the builder whose bid the block committed may reveal.
    if envelope.builder_index != bid.builder_index {
        return Err(ValidationError::UnknownBuilder {
            builder_index: envelope.builder_index,
        }
        .into());
    }

    if verify_signatures.is_true() {
        let pubkey = state
            .get_builder(bid.builder_index)?
            .pubkey
            .decompress()
            .map_err(|_| ValidationError::BadSignature)?;
        let domain = spec.get_domain(Domain::BeaconBuilder, state.genesis_validators_root);
        if !signed_envelope
            .signature
            .verify(&pubkey, envelope.signing_root(domain))
        {
            return Err(ValidationError::BadSignature.into());
        }
    }

    if envelope.slot != state.slot {
        return Err(ValidationError::SlotMismatch {
            expected: state.slot,
            found: envelope.slot,
        }
        .into());
    }

    if envelope.beacon_block_root != state.latest_block_root() {
        return Err(ValidationError::UnknownRoot {
            beacon_block_root: envelope.beacon_block_root,
        }
        .into());
    }

    // The reveal must be the exact payload the builder committed to.
    if envelope.payload.block_hash != bid.block_hash {
        return Err(ValidationError::PayloadMismatch {
            committed: bid.block_hash,
            revealed: envelope.payload.block_hash,
        }
        .into());
    }

    if envelope.payload.parent_hash != state.latest_block_hash {
        return Err(ValidationError::ParentMismatch {
            expected: state.latest_block_hash,
            found: envelope.payload.parent_hash,
        }
        .into());
    }

    match engine.verify_and_notify(
        &envelope.payload,
        &envelope.blob_versioned_hashes,
        state.latest_block_header.parent_root,
        &envelope.execution_requests,
    ) {
        PayloadStatus::Valid => {}
        PayloadStatus::Invalid => return Err(EnvelopeProcessingError::EngineRejected),
        PayloadStatus::Syncing => return Ok(EnvelopeOutcome::NotConfirmed),
    }

    state.set_payload_availability(state.slot, true)?;
    state.latest_block_hash = envelope.payload.block_hash;
    state.latest_full_slot = state.latest_full_slot.max(state.slot);
    state.latest_withdrawals_root = envelope.payload.withdrawals_root;

    debug!(
        slot = %state.slot,
        builder_index = envelope.builder_index,
        block_hash = ?envelope.payload.block_hash,
        "Applied execution payload envelope"
    );

    Ok(EnvelopeOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution_engine::StaticExecutionEngine;
    use crate::test_utils::{E, epbs_state, sign_envelope, valid_bid};
    use ssz::Encode;
    use types::{
        ExecutionPayloadEnvelope, Hash256, Keypair, SignedExecutionPayloadEnvelope, Slot,
    };

    /// Commits builder 0's bid to the state and returns its signed reveal.
    fn committed_envelope(
        state: &mut BeaconState<E>,
        builders: &[Keypair],
        spec: &ChainSpec,
    ) -> SignedExecutionPayloadEnvelope<E> {
        let bid = valid_bid(state, 0, 5_000_000_000);
        state.latest_execution_payload_bid = bid.clone();

        let mut envelope = ExecutionPayloadEnvelope::<E>::default();
        envelope.payload.parent_hash = state.latest_block_hash;
        envelope.payload.block_hash = bid.block_hash;
        envelope.payload.withdrawals_root = Hash256::repeat_byte(0xee);
        envelope.builder_index = 0;
        envelope.beacon_block_root = state.latest_block_root();
        envelope.slot = state.slot;
        sign_envelope(envelope, &builders[0].sk, state, spec)
    }

    fn valid_engine() -> StaticExecutionEngine {
        StaticExecutionEngine::new(PayloadStatus::Valid)
    }

    #[test]
    fn applied_envelope_updates_execution_caches() {
        let (mut state, _, builders, spec) = epbs_state(4, 1);
        let signed = committed_envelope(&mut state, &builders, &spec);

        let outcome = process_execution_payload_envelope(
            &mut state,
            &signed,
            &valid_engine(),
            VerifySignatures::True,
            &spec,
        )
        .unwrap();

        assert_eq!(outcome, EnvelopeOutcome::Applied);
        assert!(state.is_payload_available(state.slot).unwrap());
        assert_eq!(state.latest_block_hash, Hash256::repeat_byte(0xdd));
        assert_eq!(state.latest_full_slot, state.slot);
        assert_eq!(state.latest_withdrawals_root, Hash256::repeat_byte(0xee));
    }

    #[test]
    fn latest_full_slot_never_regresses() {
        let (mut state, _, builders, spec) = epbs_state(4, 1);
        state.latest_full_slot = Slot::new(40);
        let signed = committed_envelope(&mut state, &builders, &spec);

        process_execution_payload_envelope(
            &mut state,
            &signed,
            &valid_engine(),
            VerifySignatures::True,
            &spec,
        )
        .unwrap();

        assert_eq!(state.latest_full_slot, Slot::new(40));
    }

    #[test]
    fn wrong_builder_rejected_and_state_unchanged() {
        let (mut state, _, builders, spec) = epbs_state(4, 2);
        let mut signed = committed_envelope(&mut state, &builders, &spec);
        signed.message.builder_index = 1;
        let before = state.as_ssz_bytes();

        assert_eq!(
            process_execution_payload_envelope(
                &mut state,
                &signed,
                &valid_engine(),
                VerifySignatures::True,
                &spec,
            ),
            Err(ValidationError::UnknownBuilder { builder_index: 1 }.into())
        );
        assert_eq!(state.as_ssz_bytes(), before);
    }

    #[test]
    fn forged_signature_rejected() {
        let (mut state, validators, builders, spec) = epbs_state(4, 1);
        let signed = committed_envelope(&mut state, &builders, &spec);
        // Re-sign with a key that is not the designated builder's.
        let forged = sign_envelope(signed.message, &validators[0].sk, &state, &spec);

        assert_eq!(
            process_execution_payload_envelope(
                &mut state,
                &forged,
                &valid_engine(),
                VerifySignatures::True,
                &spec,
            ),
            Err(ValidationError::BadSignature.into())
        );
    }

    #[test]
    fn late_reveal_rejected() {
        let (mut state, _, builders, spec) = epbs_state(4, 1);
        let signed = committed_envelope(&mut state, &builders, &spec);
        state.slot = state.slot + 1;

        assert_eq!(
            process_execution_payload_envelope(
                &mut state,
                &signed,
                &valid_engine(),
                VerifySignatures::True,
                &spec,
            ),
            Err(ValidationError::SlotMismatch {
                expected: Slot::new(12),
                found: Slot::new(11),
            }
            .into())
        );
    }

    #[test]
    fn wrong_beacon_block_root_rejected() {
        let (mut state, _, builders, spec) = epbs_state(4, 1);
        let mut signed = committed_envelope(&mut state, &builders, &spec);
        signed.message.beacon_block_root = Hash256::repeat_byte(0x55);
        let resigned = sign_envelope(signed.message, &builders[0].sk, &state, &spec);

        assert_eq!(
            process_execution_payload_envelope(
                &mut state,
                &resigned,
                &valid_engine(),
                VerifySignatures::True,
                &spec,
            ),
            Err(ValidationError::UnknownRoot {
                beacon_block_root: Hash256::repeat_byte(0x55),
            }
            .into())
        );
    }

    #[test]
    fn bait_and_switch_payload_rejected() {
        let (mut state, _, builders, spec) = epbs_state(4, 1);
        let mut signed = committed_envelope(&mut state, &builders, &spec);
        signed.message.payload.block_hash = Hash256::repeat_byte(0x66);
        let resigned = sign_envelope(signed.message, &builders[0].sk, &state, &spec);
        let before = state.as_ssz_bytes();

        assert_eq!(
            process_execution_payload_envelope(
                &mut state,
                &resigned,
                &valid_engine(),
                VerifySignatures::True,
                &spec,
            ),
            Err(ValidationError::PayloadMismatch {
                committed: Hash256::repeat_byte(0xdd),
                revealed: Hash256::repeat_byte(0x66),
            }
            .into())
        );
        assert_eq!(state.as_ssz_bytes(), before);
    }

    #[test]
    fn engine_rejection_is_an_error_and_leaves_state_unchanged() {
        let (mut state, _, builders, spec) = epbs_state(4, 1);
        let signed = committed_envelope(&mut state, &builders, &spec);
        let engine = StaticExecutionEngine::new(PayloadStatus::Invalid);
        let before = state.as_ssz_bytes();

        assert_eq!(
            process_execution_payload_envelope(
                &mut state,
                &signed,
                &engine,
                VerifySignatures::True,
                &spec,
            ),
            Err(EnvelopeProcessingError::EngineRejected)
        );
        assert_eq!(state.as_ssz_bytes(), before);
    }

    #[test]
    fn syncing_engine_defers_without_mutation() {
        let (mut state, _, builders, spec) = epbs_state(4, 1);
        let signed = committed_envelope(&mut state, &builders, &spec);
        let engine = StaticExecutionEngine::new(PayloadStatus::Syncing);
        let before = state.as_ssz_bytes();

        let outcome = process_execution_payload_envelope(
            &mut state,
            &signed,
            &engine,
            VerifySignatures::True,
            &spec,
        )
        .unwrap();

        assert_eq!(outcome, EnvelopeOutcome::NotConfirmed);
        assert_eq!(state.as_ssz_bytes(), before);

        // The same envelope applies cleanly once the engine catches up.
        engine.set_status(PayloadStatus::Valid);
        let outcome = process_execution_payload_envelope(
            &mut state,
            &signed,
            &engine,
            VerifySignatures::True,
            &spec,
        )
        .unwrap();
        assert_eq!(outcome, EnvelopeOutcome::Applied);
    }
}
