use crate::{BuilderIndex, ExecutionBlockHash, Hash256, SignedRoot, Signature, Slot};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// A builder's commitment to deliver an execution payload for a slot, at a
/// price.
///
/// The bid commits to the payload content via `block_hash`; the payload
/// itself is revealed later in a `SignedExecutionPayloadEnvelope`.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct ExecutionPayloadBid {
    /// Hash of the parent execution block.
    pub parent_block_hash: ExecutionBlockHash,
    /// Root of the parent beacon block.
    pub parent_block_root: Hash256,
    /// Hash of the execution payload being bid on.
    pub block_hash: ExecutionBlockHash,
    #[serde(with = "serde_utils::quoted_u64")]
    pub builder_index: BuilderIndex,
    pub slot: Slot,
    /// Amount the builder pays the proposer, in Gwei.
    #[serde(with = "serde_utils::quoted_u64")]
    pub value: u64,
}

impl SignedRoot for ExecutionPayloadBid {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedExecutionPayloadBid {
    pub message: ExecutionPayloadBid,
    pub signature: Signature,
}
