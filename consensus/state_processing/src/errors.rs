use crate::ptc::PtcSelectionError;
use safe_arith::ArithError;
use types::{BuilderIndex, ExecutionBlockHash, Hash256, Slot, beacon_state};

/// Reasons an ePBS object fails verification against the state. Shared by
/// block, envelope and gossip verification so callers can match on the exact
/// violated check.
#[derive(Debug, PartialEq, Clone)]
pub enum ValidationError {
    /// The signature does not verify against the registered key.
    BadSignature,
    /// The builder index is out of range, inactive or slashed.
    UnknownBuilder { builder_index: BuilderIndex },
    /// The builder balance cannot cover the bid on top of its outstanding
    /// obligations and the minimum reserve.
    InsufficientFunds {
        builder_index: BuilderIndex,
        balance: u64,
        required: u64,
    },
    /// The object is for a different slot than the one being processed.
    SlotMismatch { expected: Slot, found: Slot },
    /// The object does not extend the current chain head.
    ParentMismatch { expected: Hash256, found: Hash256 },
    /// The revealed payload does not match the committed bid.
    PayloadMismatch {
        committed: ExecutionBlockHash,
        revealed: ExecutionBlockHash,
    },
    /// The referenced beacon block root is unknown or not the head.
    UnknownRoot { beacon_block_root: Hash256 },
    /// The message falls outside the accepted slot window.
    StaleSlot { message_slot: Slot, current_slot: Slot },
}

#[derive(Debug, PartialEq, Clone)]
pub enum BlockProcessingError {
    Validation(ValidationError),
    /// A payload attestation with no set bits.
    EmptyAggregate,
    /// An aggregation bit beyond the committee size.
    InvalidCommitteePosition { position: usize, committee_len: usize },
    PtcSelection(PtcSelectionError),
    BeaconStateError(beacon_state::Error),
    ArithError(ArithError),
    SszTypesError(ssz_types::Error),
}

impl From<ValidationError> for BlockProcessingError {
    fn from(e: ValidationError) -> Self {
        BlockProcessingError::Validation(e)
    }
}

impl From<PtcSelectionError> for BlockProcessingError {
    fn from(e: PtcSelectionError) -> Self {
        BlockProcessingError::PtcSelection(e)
    }
}

impl From<beacon_state::Error> for BlockProcessingError {
    fn from(e: beacon_state::Error) -> Self {
        BlockProcessingError::BeaconStateError(e)
    }
}

impl From<ArithError> for BlockProcessingError {
    fn from(e: ArithError) -> Self {
        BlockProcessingError::ArithError(e)
    }
}

impl From<ssz_types::Error> for BlockProcessingError {
    fn from(e: ssz_types::Error) -> Self {
        BlockProcessingError::SszTypesError(e)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum EnvelopeProcessingError {
    Validation(ValidationError),
    /// The execution engine judged the payload invalid.
    EngineRejected,
    BeaconStateError(beacon_state::Error),
    ArithError(ArithError),
}

impl From<ValidationError> for EnvelopeProcessingError {
    fn from(e: ValidationError) -> Self {
        EnvelopeProcessingError::Validation(e)
    }
}

impl From<beacon_state::Error> for EnvelopeProcessingError {
    fn from(e: beacon_state::Error) -> Self {
        EnvelopeProcessingError::BeaconStateError(e)
    }
}

impl From<ArithError> for EnvelopeProcessingError {
    fn from(e: ArithError) -> Self {
        EnvelopeProcessingError::ArithError(e)
    }
}

/// Settlement found state that the transition can never legally produce.
/// These are not recoverable; the node must halt rather than settle payments
/// from a corrupted ring.
#[derive(Debug, PartialEq, Clone)]
pub enum FatalInvariantViolation {
    /// A ring bucket's slot tag does not match the slot being settled.
    CorruptedPaymentRing {
        bucket: usize,
        expected_slot: Slot,
        found_slot: Slot,
    },
    /// The churn accumulator cannot account for a promoted payment.
    ChurnAccountingFailure { amount: u64 },
    /// The withdrawal queue is out of capacity.
    WithdrawalQueueFull {
        builder_index: BuilderIndex,
        amount: u64,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub enum EpochProcessingError {
    Fatal(FatalInvariantViolation),
    BeaconStateError(beacon_state::Error),
    ArithError(ArithError),
}

impl From<FatalInvariantViolation> for EpochProcessingError {
    fn from(e: FatalInvariantViolation) -> Self {
        EpochProcessingError::Fatal(e)
    }
}

impl From<beacon_state::Error> for EpochProcessingError {
    fn from(e: beacon_state::Error) -> Self {
        EpochProcessingError::BeaconStateError(e)
    }
}

impl From<ArithError> for EpochProcessingError {
    fn from(e: ArithError) -> Self {
        EpochProcessingError::ArithError(e)
    }
}
