//! Handcrafted minimal-preset states with real key material, shared by the
//! processing tests.

use bls::SecretKey;
use types::test_utils::generate_deterministic_keypair;
use types::{
    Address, BeaconState, Builder, ChainSpec, Domain, Epoch, ExecutionPayloadBid,
    ExecutionPayloadEnvelope, Hash256, Keypair, MinimalEthSpec, PayloadAttestationData,
    SignedExecutionPayloadBid, SignedExecutionPayloadEnvelope, SignedRoot, Signature, Slot,
    Validator,
};

pub(crate) type E = MinimalEthSpec;

pub(crate) const VALIDATOR_BALANCE: u64 = 32_000_000_000;
pub(crate) const BUILDER_BALANCE: u64 = 100_000_000_000;

/// Builder keys start here so they never collide with validator keys.
const BUILDER_KEY_OFFSET: usize = 10_000;

pub(crate) fn epbs_state(
    validator_count: usize,
    builder_count: usize,
) -> (BeaconState<E>, Vec<Keypair>, Vec<Keypair>, ChainSpec) {
    let spec = ChainSpec::minimal();
    let mut state = BeaconState::<E>::default();
    state.slot = Slot::new(11);
    state.genesis_validators_root = Hash256::repeat_byte(0xaa);
    state.finalized_checkpoint.epoch = Epoch::new(1);
    state.latest_block_hash = Hash256::repeat_byte(0xbb);

    let validator_keypairs = (0..validator_count)
        .map(generate_deterministic_keypair)
        .collect::<Vec<_>>();
    for keypair in &validator_keypairs {
        state
            .validators
            .push(Validator {
                pubkey: keypair.pk.clone().into(),
                effective_balance: VALIDATOR_BALANCE,
                slashed: false,
                activation_epoch: Epoch::new(0),
                exit_epoch: spec.far_future_epoch,
            })
            .unwrap();
        state.balances.push(VALIDATOR_BALANCE).unwrap();
    }

    let builder_keypairs = (0..builder_count)
        .map(|i| generate_deterministic_keypair(BUILDER_KEY_OFFSET + i))
        .collect::<Vec<_>>();
    for (i, keypair) in builder_keypairs.iter().enumerate() {
        state
            .builders
            .push(Builder {
                pubkey: keypair.pk.clone().into(),
                execution_address: Address::repeat_byte(i as u8 + 1),
                balance: BUILDER_BALANCE,
                deposit_epoch: Epoch::new(0),
                withdrawable_epoch: spec.far_future_epoch,
                slashed: false,
            })
            .unwrap();
    }

    (state, validator_keypairs, builder_keypairs, spec)
}

/// A bid that passes every check against `state` at its current slot.
pub(crate) fn valid_bid(state: &BeaconState<E>, builder_index: u64, value: u64) -> ExecutionPayloadBid {
    ExecutionPayloadBid {
        parent_block_hash: state.latest_block_hash,
        parent_block_root: state.latest_block_root(),
        block_hash: Hash256::repeat_byte(0xdd),
        builder_index,
        slot: state.slot,
        value,
    }
}

pub(crate) fn sign_bid(
    bid: ExecutionPayloadBid,
    sk: &SecretKey,
    state: &BeaconState<E>,
    spec: &ChainSpec,
) -> SignedExecutionPayloadBid {
    let domain = spec.get_domain(Domain::BeaconBuilder, state.genesis_validators_root);
    let signature = sk.sign(bid.signing_root(domain));
    SignedExecutionPayloadBid {
        message: bid,
        signature,
    }
}

pub(crate) fn sign_envelope(
    envelope: ExecutionPayloadEnvelope<E>,
    sk: &SecretKey,
    state: &BeaconState<E>,
    spec: &ChainSpec,
) -> SignedExecutionPayloadEnvelope<E> {
    let domain = spec.get_domain(Domain::BeaconBuilder, state.genesis_validators_root);
    let signature = sk.sign(envelope.signing_root(domain));
    SignedExecutionPayloadEnvelope {
        message: envelope,
        signature,
    }
}

pub(crate) fn sign_attestation_data(
    data: &PayloadAttestationData,
    sk: &SecretKey,
    state: &BeaconState<E>,
    spec: &ChainSpec,
) -> Signature {
    let domain = spec.get_domain(Domain::PtcAttester, state.genesis_validators_root);
    sk.sign(data.signing_root(domain))
}
