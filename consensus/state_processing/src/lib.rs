//! State-transition logic for the ePBS pipeline: bid verification, PTC
//! committee selection, payload-attestation verification, envelope
//! application and epoch-boundary payment settlement.

pub mod envelope_processing;
pub mod errors;
pub mod execution_engine;
pub mod per_block_processing;
pub mod per_epoch_processing;
pub mod ptc;

#[cfg(test)]
mod test_utils;

pub use envelope_processing::{EnvelopeOutcome, process_execution_payload_envelope};
pub use errors::{
    BlockProcessingError, EnvelopeProcessingError, EpochProcessingError, FatalInvariantViolation,
    ValidationError,
};
pub use execution_engine::{ExecutionEngine, PayloadStatus, StaticExecutionEngine};
pub use per_block_processing::{
    VerifySignatures, process_execution_payload_bid, process_payload_attestation,
    verify_execution_payload_bid,
};
pub use per_epoch_processing::{process_builder_payment_settlement, process_epoch};
pub use ptc::{PtcSelectionError, get_ptc};
