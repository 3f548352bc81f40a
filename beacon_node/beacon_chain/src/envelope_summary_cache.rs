//! Bounded cache of applied-envelope summaries, serving the by-root and
//! by-slot-range lookups peers use to backfill payload history.

use std::collections::{BTreeMap, HashMap};
use types::{EnvelopeSummary, Hash256, Slot};

#[derive(Debug, Default)]
pub struct EnvelopeSummaryCache {
    by_root: HashMap<Hash256, EnvelopeSummary>,
    by_slot: BTreeMap<Slot, Hash256>,
}

impl EnvelopeSummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the summary of an applied envelope. At most one payload is
    /// applied per slot, so a re-insert for the same slot (reorg) replaces
    /// the previous entry.
    pub fn insert(&mut self, summary: EnvelopeSummary) {
        if let Some(previous_root) = self.by_slot.insert(summary.slot, summary.beacon_block_root) {
            self.by_root.remove(&previous_root);
        }
        self.by_root.insert(summary.beacon_block_root, summary);
    }

    /// The summary for the payload completing the block at `beacon_block_root`,
    /// if that payload was applied.
    pub fn get_by_root(&self, beacon_block_root: Hash256) -> Option<EnvelopeSummary> {
        self.by_root.get(&beacon_block_root).copied()
    }

    /// Summaries for `count` slots starting at `start_slot`, in slot order.
    /// Slots whose payload was never applied are simply absent.
    pub fn range(&self, start_slot: Slot, count: u64) -> Vec<EnvelopeSummary> {
        let end_slot = start_slot + count;
        self.by_slot
            .range(start_slot..end_slot)
            .filter_map(|(_, root)| self.by_root.get(root).copied())
            .collect()
    }

    /// Drops summaries older than `earliest_slot`.
    pub fn prune(&mut self, earliest_slot: Slot) {
        let retained = self.by_slot.split_off(&earliest_slot);
        for root in std::mem::replace(&mut self.by_slot, retained).into_values() {
            self.by_root.remove(&root);
        }
    }

    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(slot: u64, root_byte: u8) -> EnvelopeSummary {
        EnvelopeSummary {
            slot: Slot::new(slot),
            beacon_block_root: Hash256::repeat_byte(root_byte),
            block_hash: Hash256::repeat_byte(root_byte.wrapping_add(0x80)),
            builder_index: root_byte as u64,
            withdrawals_root: Hash256::repeat_byte(0x01),
        }
    }

    #[test]
    fn lookup_by_root() {
        let mut cache = EnvelopeSummaryCache::new();
        cache.insert(summary(5, 0x0a));

        assert_eq!(
            cache.get_by_root(Hash256::repeat_byte(0x0a)),
            Some(summary(5, 0x0a))
        );
        assert_eq!(cache.get_by_root(Hash256::repeat_byte(0x0b)), None);
    }

    #[test]
    fn range_skips_slots_without_applied_payloads() {
        let mut cache = EnvelopeSummaryCache::new();
        cache.insert(summary(5, 0x0a));
        // Slot 6's payload was withheld: nothing inserted.
        cache.insert(summary(7, 0x0c));
        cache.insert(summary(8, 0x0d));

        let range = cache.range(Slot::new(5), 3);
        assert_eq!(range, vec![summary(5, 0x0a), summary(7, 0x0c)]);
        assert!(cache.range(Slot::new(9), 4).is_empty());
    }

    #[test]
    fn reorged_slot_is_replaced() {
        let mut cache = EnvelopeSummaryCache::new();
        cache.insert(summary(5, 0x0a));
        cache.insert(summary(5, 0x0b));

        assert_eq!(cache.get_by_root(Hash256::repeat_byte(0x0a)), None);
        assert_eq!(
            cache.get_by_root(Hash256::repeat_byte(0x0b)),
            Some(summary(5, 0x0b))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn pruning_drops_both_indexes() {
        let mut cache = EnvelopeSummaryCache::new();
        cache.insert(summary(3, 0x0a));
        cache.insert(summary(4, 0x0b));
        cache.insert(summary(5, 0x0c));

        cache.prune(Slot::new(5));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_by_root(Hash256::repeat_byte(0x0a)), None);
        assert_eq!(cache.get_by_root(Hash256::repeat_byte(0x0b)), None);
        assert!(cache.get_by_root(Hash256::repeat_byte(0x0c)).is_some());
    }
}
