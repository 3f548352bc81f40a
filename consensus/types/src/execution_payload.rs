use crate::{EthSpec, ExecutionBlockHash, Hash256, VariableList, typenum};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

pub type Transaction<N> = VariableList<u8, N>;
pub type Transactions<E> = VariableList<
    Transaction<<E as EthSpec>::MaxBytesPerTransaction>,
    <E as EthSpec>::MaxTransactionsPerPayload,
>;

/// Opaque execution-layer request bytes, forwarded verbatim to the engine.
pub type ExecutionRequest = VariableList<u8, typenum::U4096>;
pub type ExecutionRequests = VariableList<ExecutionRequest, typenum::U16>;

/// The execution payload revealed by a builder, reduced to the fields the
/// beacon-side transition consumes. The engine owns full validation of the
/// execution semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(bound = "E: EthSpec")]
pub struct ExecutionPayload<E: EthSpec> {
    pub parent_hash: ExecutionBlockHash,
    pub block_hash: ExecutionBlockHash,
    pub transactions: Transactions<E>,
    /// Root of the withdrawals processed by this payload, retained for the
    /// execution layer to drain the builder withdrawal queue against.
    pub withdrawals_root: Hash256,
}
