//! Naive aggregation of verified PTC votes.
//!
//! Each gossiped message carries one vote; the pool OR-combines votes that
//! share the exact same `PayloadAttestationData` into a single aggregate per
//! data value. Only a short window of slots is retained: an aggregate is
//! useful to the block built one slot later and to nobody after that.

use bls::AggregateSignature;
use parking_lot::RwLock;
use std::collections::HashMap;
use types::{EthSpec, PayloadAttestation, PayloadAttestationData, PayloadAttestationMessage, Slot};

/// The current slot's aggregates plus the previous slot's, which may still be
/// requested while the next block is built.
const SLOTS_RETAINED: usize = 2;

#[derive(Debug, PartialEq)]
pub enum InsertOutcome {
    /// First vote seen for this data value.
    NewAttestationData { committee_position: usize },
    /// This seat's vote was already merged; the message is redundant.
    SignatureAlreadyKnown { committee_position: usize },
    /// The vote was merged into an existing aggregate.
    SignatureAggregated { committee_position: usize },
}

#[derive(Debug)]
pub enum Error {
    /// The message belongs to a slot this map does not cover.
    IncorrectSlot { expected: Slot, attestation: Slot },
    /// The committee position does not fit the PTC bitfield.
    InvalidCommitteePosition(usize),
    /// The signature bytes could not be combined.
    Aggregation(bls::Error),
    InvalidMapIndex(usize),
}

impl From<bls::Error> for Error {
    fn from(e: bls::Error) -> Self {
        Error::Aggregation(e)
    }
}

/// Aggregates for a single slot, keyed by the full data value. Votes with
/// any differing field (root, presence, blob availability) stay separate.
struct AggregatedPayloadAttestationMap<E: EthSpec> {
    map: HashMap<PayloadAttestationData, PayloadAttestation<E>>,
    slot: Slot,
}

impl<E: EthSpec> AggregatedPayloadAttestationMap<E> {
    fn new(slot: Slot) -> Self {
        Self {
            slot,
            map: <_>::default(),
        }
    }

    fn insert(
        &mut self,
        message: &PayloadAttestationMessage,
        committee_position: usize,
    ) -> Result<InsertOutcome, Error> {
        if message.data.slot != self.slot {
            return Err(Error::IncorrectSlot {
                expected: self.slot,
                attestation: message.data.slot,
            });
        }

        if let Some(existing) = self.map.get_mut(&message.data) {
            if existing
                .aggregation_bits
                .get(committee_position)
                .map_err(|_| Error::InvalidCommitteePosition(committee_position))?
            {
                return Ok(InsertOutcome::SignatureAlreadyKnown { committee_position });
            }
            existing
                .aggregation_bits
                .set(committee_position, true)
                .map_err(|_| Error::InvalidCommitteePosition(committee_position))?;
            existing.signature.add_assign(&message.signature)?;
            Ok(InsertOutcome::SignatureAggregated { committee_position })
        } else {
            let mut attestation = PayloadAttestation::empty(message.data);
            attestation
                .aggregation_bits
                .set(committee_position, true)
                .map_err(|_| Error::InvalidCommitteePosition(committee_position))?;
            let mut signature = AggregateSignature::infinity();
            signature.add_assign(&message.signature)?;
            attestation.signature = signature;
            self.map.insert(message.data, attestation);
            Ok(InsertOutcome::NewAttestationData { committee_position })
        }
    }

    fn get(&self, data: &PayloadAttestationData) -> Option<PayloadAttestation<E>> {
        self.map.get(data).cloned()
    }
}

/// The pool itself. Lock scope is a single insert or lookup.
pub struct PayloadAttestationPool<E: EthSpec> {
    maps: RwLock<Vec<AggregatedPayloadAttestationMap<E>>>,
}

impl<E: EthSpec> Default for PayloadAttestationPool<E> {
    fn default() -> Self {
        Self {
            maps: RwLock::new(vec![]),
        }
    }
}

impl<E: EthSpec> PayloadAttestationPool<E> {
    /// Merges a gossip-verified vote into the aggregate for its data value.
    ///
    /// Inserting the same message twice is a no-op reported as
    /// `SignatureAlreadyKnown`; insertion order does not affect the final
    /// aggregate.
    pub fn insert(
        &self,
        message: &PayloadAttestationMessage,
        committee_position: usize,
    ) -> Result<InsertOutcome, Error> {
        // Index resolution and insertion happen under the same guard, so a
        // concurrent insert for another slot cannot evict the map in between.
        let mut maps = self.maps.write();
        let index = Self::get_map_index(&mut maps, message.data.slot);

        maps.get_mut(index)
            .ok_or(Error::InvalidMapIndex(index))?
            .insert(message, committee_position)
    }

    /// The aggregate for an exact data value, if any votes arrived.
    pub fn get(&self, data: &PayloadAttestationData) -> Option<PayloadAttestation<E>> {
        self.maps
            .read()
            .iter()
            .find(|map| map.slot == data.slot)
            .and_then(|map| map.get(data))
    }

    /// All aggregates collected for `slot`, for the next block to pick from.
    pub fn aggregates_for_slot(&self, slot: Slot) -> Vec<PayloadAttestation<E>> {
        self.maps
            .read()
            .iter()
            .find(|map| map.slot == slot)
            .map(|map| map.map.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Index of the map for `slot`, evicting the oldest slot if the window
    /// is full.
    fn get_map_index(maps: &mut Vec<AggregatedPayloadAttestationMap<E>>, slot: Slot) -> usize {
        if let Some(index) = maps.iter().position(|map| map.slot == slot) {
            return index;
        }

        if maps.len() < SLOTS_RETAINED {
            let index = maps.len();
            maps.push(AggregatedPayloadAttestationMap::new(slot));
            return index;
        }

        let index = maps
            .iter()
            .enumerate()
            .min_by_key(|(_, map)| map.slot)
            .map(|(i, _)| i)
            .unwrap_or(0);
        maps[index] = AggregatedPayloadAttestationMap::new(slot);
        index
    }
}
