use parking_lot::Mutex;
use types::{EthSpec, ExecutionPayload, ExecutionRequest, Hash256};

/// Outcome of handing a payload to the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStatus {
    Valid,
    Invalid,
    /// The engine has not caught up far enough to judge the payload.
    Syncing,
}

/// The slice of the engine API the state transition consumes. The engine owns
/// execution-semantics validation; the transition only consumes the verdict.
pub trait ExecutionEngine<E: EthSpec> {
    fn verify_and_notify(
        &self,
        payload: &ExecutionPayload<E>,
        blob_versioned_hashes: &[Hash256],
        parent_beacon_block_root: Hash256,
        execution_requests: &[ExecutionRequest],
    ) -> PayloadStatus;
}

/// An engine stub that returns a configured status, for tests and sync
/// bring-up.
pub struct StaticExecutionEngine {
    status: Mutex<PayloadStatus>,
}

impl StaticExecutionEngine {
    pub fn new(status: PayloadStatus) -> Self {
        Self {
            status: Mutex::new(status),
        }
    }

    pub fn set_status(&self, status: PayloadStatus) {
        *self.status.lock() = status;
    }
}

impl<E: EthSpec> ExecutionEngine<E> for StaticExecutionEngine {
    fn verify_and_notify(
        &self,
        _payload: &ExecutionPayload<E>,
        _blob_versioned_hashes: &[Hash256],
        _parent_beacon_block_root: Hash256,
        _execution_requests: &[ExecutionRequest],
    ) -> PayloadStatus {
        *self.status.lock()
    }
}
