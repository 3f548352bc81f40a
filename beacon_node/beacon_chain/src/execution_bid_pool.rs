//! Pool of gossip-verified bids the proposer selects from when producing a
//! block. One bid per (slot, builder): the first verified one stands, per
//! the equivocation rules enforced upstream.

use std::collections::HashMap;
use types::{BuilderIndex, SignedExecutionPayloadBid, Slot};

/// Bids are only useful for the slot being proposed; keep a small buffer
/// around slot boundaries.
const MAX_BID_POOL_SLOTS: u64 = 4;

#[derive(Debug, Default)]
pub struct ExecutionBidPool {
    bids: HashMap<Slot, HashMap<BuilderIndex, SignedExecutionPayloadBid>>,
}

impl ExecutionBidPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a verified bid. A bid already on record for this
    /// (slot, builder) is kept; replacements were rejected as equivocation
    /// before reaching the pool.
    pub fn insert(&mut self, bid: SignedExecutionPayloadBid) {
        self.bids
            .entry(bid.message.slot)
            .or_default()
            .entry(bid.message.builder_index)
            .or_insert(bid);
    }

    /// The highest-value bid for `slot`, if any builder bid.
    pub fn best_bid(&self, slot: Slot) -> Option<&SignedExecutionPayloadBid> {
        self.bids
            .get(&slot)
            .and_then(|slot_bids| slot_bids.values().max_by_key(|bid| bid.message.value))
    }

    /// Drops bids for slots more than `MAX_BID_POOL_SLOTS` behind
    /// `current_slot`.
    pub fn prune(&mut self, current_slot: Slot) {
        let earliest = current_slot.saturating_sub(MAX_BID_POOL_SLOTS);
        self.bids.retain(|&slot, _| slot >= earliest);
    }

    #[cfg(test)]
    fn total_bid_count(&self) -> usize {
        self.bids.values().map(|m| m.len()).sum()
    }
}
