use crate::{BuilderIndex, Epoch};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// A settled builder payment awaiting its withdrawable epoch.
///
/// The queue is drained strictly FIFO by the execution layer once
/// `withdrawable_epoch <= current_epoch`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
    TreeHash,
)]
pub struct BuilderPendingWithdrawal {
    #[serde(with = "serde_utils::quoted_u64")]
    pub builder_index: BuilderIndex,
    /// Amount owed, in Gwei.
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    pub withdrawable_epoch: Epoch,
}
