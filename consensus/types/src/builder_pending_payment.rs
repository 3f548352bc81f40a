use crate::{BuilderIndex, Slot};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// A payment owed to a builder, parked until the epoch boundary that settles
/// its slot.
///
/// These live in a fixed ring of `2 * slots_per_epoch` buckets indexed by
/// `slot % ring_length`; the `slot` tag disambiguates which occupancy a
/// bucket currently holds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
    TreeHash,
)]
pub struct BuilderPendingPayment {
    #[serde(with = "serde_utils::quoted_u64")]
    pub builder_index: BuilderIndex,
    /// Amount owed, in Gwei.
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    /// The slot whose bid created this payment.
    pub slot: Slot,
}

impl BuilderPendingPayment {
    /// An empty bucket. Zero-amount entries are never settled.
    pub fn is_vacant(&self) -> bool {
        self.amount == 0
    }
}
