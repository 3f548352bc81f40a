use crate::{Hash256, SignedRoot, Slot};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// The content of a PTC vote: did the committed payload (and its blob data)
/// turn up in time for `beacon_block_root` at `slot`?
///
/// Aggregation keys on the whole container, so votes only combine when every
/// field matches.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
    TreeHash,
)]
pub struct PayloadAttestationData {
    pub beacon_block_root: Hash256,
    pub slot: Slot,
    pub payload_present: bool,
    pub blob_data_available: bool,
}

impl SignedRoot for PayloadAttestationData {}
