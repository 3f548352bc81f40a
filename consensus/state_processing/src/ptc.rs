//! Payload timeliness committee selection.
//!
//! Members are drawn from the active validator set by a swap-or-not shuffle
//! followed by balance-weighted acceptance sampling, so the expected number
//! of seats a validator holds is proportional to its effective balance.

use ethereum_hashing::hash;
use types::{BeaconState, ChainSpec, Domain, EthSpec, Slot};

/// Acceptance sampling draws 16-bit random values.
const MAX_RANDOM_VALUE: u64 = (1 << 16) - 1;

#[derive(Debug, PartialEq, Clone)]
pub enum PtcSelectionError {
    /// No validator is active at the requested epoch.
    NoActiveValidators,
    /// A sampled index pointed outside the registry; the state is corrupt.
    UnknownValidator(u64),
}

/// Returns the PTC for `slot`, in committee order.
///
/// If the active set does not exceed the committee size the whole active set
/// is returned; sampling would otherwise loop without filling the committee.
pub fn get_ptc<E: EthSpec>(
    state: &BeaconState<E>,
    slot: Slot,
    spec: &ChainSpec,
) -> Result<Vec<u64>, PtcSelectionError> {
    let epoch = slot.epoch(E::slots_per_epoch());
    let active = state.get_active_validator_indices(epoch);
    if active.is_empty() {
        return Err(PtcSelectionError::NoActiveValidators);
    }

    let ptc_size = E::ptc_size();
    if active.len() <= ptc_size {
        return Ok(active);
    }

    // Per-slot seed: epoch seed stirred with the slot number.
    let mut preimage = state.get_seed(epoch, Domain::PtcAttester, spec).to_vec();
    preimage.extend_from_slice(&slot.as_u64().to_le_bytes());
    let seed: Vec<u8> = hash(&preimage);

    let total = active.len();
    let mut committee = Vec::with_capacity(ptc_size);
    let mut selected = vec![false; total];
    let mut i = 0usize;

    while committee.len() < ptc_size {
        let shuffled = compute_shuffled_index(i % total, total, &seed, spec.shuffle_round_count);
        let random_value = random_u16(&seed, i) as u64;
        i += 1;

        // A validator never occupies two seats.
        if selected[shuffled] {
            continue;
        }

        let candidate = active[shuffled];
        let effective_balance = state
            .get_validator(candidate)
            .map_err(|_| PtcSelectionError::UnknownValidator(candidate))?
            .effective_balance;

        // Accept with probability effective_balance / max_effective_balance.
        if effective_balance as u128 * MAX_RANDOM_VALUE as u128
            >= spec.max_effective_balance as u128 * random_value as u128
        {
            selected[shuffled] = true;
            committee.push(candidate);
        }
    }

    Ok(committee)
}

/// One round of randomness yields sixteen 16-bit values.
fn random_u16(seed: &[u8], i: usize) -> u16 {
    let mut preimage = seed.to_vec();
    preimage.extend_from_slice(&((i / 16) as u64).to_le_bytes());
    let source = hash(&preimage);
    let offset = (i % 16) * 2;
    u16::from_le_bytes([source[offset], source[offset + 1]])
}

/// The swap-or-not shuffle, applied to a single index.
fn compute_shuffled_index(
    index: usize,
    list_size: usize,
    seed: &[u8],
    shuffle_round_count: u8,
) -> usize {
    debug_assert!(index < list_size);
    let mut index = index;

    for round in 0..shuffle_round_count {
        let mut pivot_preimage = seed.to_vec();
        pivot_preimage.push(round);
        let pivot_hash = hash(&pivot_preimage);
        let pivot = u64::from_le_bytes(
            pivot_hash[..8].try_into().expect("hash is 32 bytes"),
        ) as usize
            % list_size;

        let flip = (pivot + list_size - index) % list_size;
        let position = std::cmp::max(index, flip);

        let mut source_preimage = seed.to_vec();
        source_preimage.push(round);
        source_preimage.extend_from_slice(&((position / 256) as u32).to_le_bytes());
        let source = hash(&source_preimage);

        let byte = source[(position % 256) / 8];
        if (byte >> (position % 8)) & 0x01 == 1 {
            index = flip;
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::epbs_state;
    use std::collections::HashSet;
    use types::MinimalEthSpec;

    type E = MinimalEthSpec;

    #[test]
    fn undersized_active_set_returns_everyone() {
        // Minimal preset: PTC size 4, 3 active validators.
        let (state, _, _, spec) = epbs_state(3, 1);
        let ptc = get_ptc(&state, state.slot, &spec).unwrap();
        assert_eq!(ptc, vec![0, 1, 2]);
    }

    #[test]
    fn empty_active_set_is_an_error() {
        let (mut state, _, _, spec) = epbs_state(3, 1);
        for validator in state.validators.iter_mut() {
            validator.activation_epoch = spec.far_future_epoch;
        }
        assert_eq!(
            get_ptc(&state, state.slot, &spec),
            Err(PtcSelectionError::NoActiveValidators)
        );
    }

    #[test]
    fn sampling_is_deterministic() {
        let (state, _, _, spec) = epbs_state(32, 1);
        let a = get_ptc(&state, state.slot, &spec).unwrap();
        let b = get_ptc(&state, state.slot, &spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn committee_is_exact_size_with_no_duplicates() {
        let (state, _, _, spec) = epbs_state(32, 1);
        let ptc = get_ptc(&state, state.slot, &spec).unwrap();
        assert_eq!(ptc.len(), E::ptc_size());
        let unique = ptc.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), ptc.len());
    }

    #[test]
    fn different_slots_draw_different_committees() {
        let (state, _, _, spec) = epbs_state(64, 1);
        let a = get_ptc(&state, Slot::new(10), &spec).unwrap();
        let b = get_ptc(&state, Slot::new(11), &spec).unwrap();
        // With 64 candidates and 4 seats, identical draws are vanishingly
        // unlikely for a working per-slot seed.
        assert_ne!(a, b);
    }

    #[test]
    fn shuffled_index_is_a_permutation() {
        let seed = vec![7u8; 32];
        let list_size = 100;
        let mut seen = HashSet::new();
        for i in 0..list_size {
            seen.insert(compute_shuffled_index(i, list_size, &seed, 10));
        }
        assert_eq!(seen.len(), list_size);
    }
}
