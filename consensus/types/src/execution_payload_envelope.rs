use crate::{
    BuilderIndex, EthSpec, ExecutionBlockHash, ExecutionPayload, ExecutionRequests, Hash256,
    SignedRoot, Signature, Slot, VariableList,
};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// The payload reveal: the full execution payload plus the blob artifacts and
/// execution requests the engine needs to validate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(bound = "E: EthSpec")]
pub struct ExecutionPayloadEnvelope<E: EthSpec> {
    pub payload: ExecutionPayload<E>,
    #[serde(with = "serde_utils::quoted_u64")]
    pub builder_index: BuilderIndex,
    /// Root of the beacon block this payload completes.
    pub beacon_block_root: Hash256,
    pub slot: Slot,
    /// Versioned hashes of the blobs committed to by the payload.
    pub blob_versioned_hashes: VariableList<Hash256, E::MaxBlobCommitmentsPerBlock>,
    pub execution_requests: ExecutionRequests,
}

impl<E: EthSpec> SignedRoot for ExecutionPayloadEnvelope<E> {}

impl<E: EthSpec> ExecutionPayloadEnvelope<E> {
    /// The bounded record retained after the payload has been applied; the
    /// transaction bodies themselves are dropped.
    pub fn summary(&self) -> EnvelopeSummary {
        EnvelopeSummary {
            slot: self.slot,
            beacon_block_root: self.beacon_block_root,
            block_hash: self.payload.block_hash,
            builder_index: self.builder_index,
            withdrawals_root: self.payload.withdrawals_root,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(bound = "E: EthSpec")]
pub struct SignedExecutionPayloadEnvelope<E: EthSpec> {
    pub message: ExecutionPayloadEnvelope<E>,
    pub signature: Signature,
}

/// What remains of an envelope once applied: enough for sync and the
/// request/response surface, nothing more.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
    TreeHash,
)]
pub struct EnvelopeSummary {
    pub slot: Slot,
    pub beacon_block_root: Hash256,
    pub block_hash: ExecutionBlockHash,
    #[serde(with = "serde_utils::quoted_u64")]
    pub builder_index: BuilderIndex,
    pub withdrawals_root: Hash256,
}
