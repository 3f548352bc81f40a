//! Tracks which bid each builder has broadcast per slot, so duplicates are
//! not re-propagated and a second, differing bid is rejected as
//! equivocation rather than overwriting the first.

use std::collections::HashMap;
use types::{BuilderIndex, Hash256, Slot};

/// Two epochs of slots under the mainnet preset; old entries are useless
/// once the bid's slot can no longer be proposed.
const MAX_OBSERVED_SLOTS: u64 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidObservationOutcome {
    /// First bid from this builder for this slot.
    New,
    /// The exact same bid was seen before.
    Duplicate,
    /// The builder already committed to a different bid for this slot.
    Equivocation {
        existing_bid_root: Hash256,
        new_bid_root: Hash256,
    },
}

#[derive(Debug, Default)]
pub struct ObservedExecutionBids {
    observed: HashMap<Slot, HashMap<BuilderIndex, Hash256>>,
}

impl ObservedExecutionBids {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a bid root for `(slot, builder_index)`. The first root to be
    /// observed is the one the builder is held to.
    pub fn observe_bid(
        &mut self,
        slot: Slot,
        builder_index: BuilderIndex,
        bid_root: Hash256,
    ) -> BidObservationOutcome {
        match self
            .observed
            .entry(slot)
            .or_default()
            .entry(builder_index)
        {
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(bid_root);
                BidObservationOutcome::New
            }
            std::collections::hash_map::Entry::Occupied(entry) => {
                let existing_bid_root = *entry.get();
                if existing_bid_root == bid_root {
                    BidObservationOutcome::Duplicate
                } else {
                    BidObservationOutcome::Equivocation {
                        existing_bid_root,
                        new_bid_root: bid_root,
                    }
                }
            }
        }
    }

    /// Drops every slot more than `MAX_OBSERVED_SLOTS` behind `current_slot`.
    pub fn prune(&mut self, current_slot: Slot) {
        let earliest = current_slot.saturating_sub(MAX_OBSERVED_SLOTS);
        self.observed.retain(|&slot, _| slot >= earliest);
    }

    #[cfg(test)]
    fn observed_bid_count(&self) -> usize {
        self.observed.values().map(|m| m.len()).sum()
    }
}
