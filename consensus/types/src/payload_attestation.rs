use crate::{AggregateSignature, BitVector, EthSpec, PayloadAttestationData};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// An aggregate of PTC votes sharing the same `PayloadAttestationData`.
///
/// Bit `i` of `aggregation_bits` marks the `i`th member of the slot's PTC,
/// in committee order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(bound = "E: EthSpec")]
pub struct PayloadAttestation<E: EthSpec> {
    pub aggregation_bits: BitVector<E::PtcSize>,
    pub data: PayloadAttestationData,
    pub signature: AggregateSignature,
}

impl<E: EthSpec> PayloadAttestation<E> {
    pub fn empty(data: PayloadAttestationData) -> Self {
        Self {
            aggregation_bits: BitVector::default(),
            data,
            signature: AggregateSignature::infinity(),
        }
    }

    /// The number of votes carried by this aggregate.
    pub fn num_set_bits(&self) -> usize {
        self.aggregation_bits.num_set_bits()
    }

    /// Committee positions with a vote, in ascending order.
    pub fn attesting_positions(&self) -> Vec<usize> {
        self.aggregation_bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| *bit)
            .map(|(i, _)| i)
            .collect()
    }
}
