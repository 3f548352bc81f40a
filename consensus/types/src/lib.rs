//! Types for the enshrined proposer-builder separation (ePBS) beacon chain:
//! builder bids, payload envelopes, PTC attestations and the beacon state
//! fields that track builder payments.

pub mod beacon_block_header;
pub mod beacon_state;
pub mod builder;
pub mod builder_pending_payment;
pub mod builder_pending_withdrawal;
pub mod chain_spec;
pub mod checkpoint;
pub mod eth_spec;
pub mod execution_payload;
pub mod execution_payload_bid;
pub mod execution_payload_envelope;
pub mod payload_attestation;
pub mod payload_attestation_data;
pub mod payload_attestation_message;
pub mod signing_data;
pub mod slot_epoch;
pub mod test_utils;
pub mod validator;

pub use crate::beacon_block_header::BeaconBlockHeader;
pub use crate::beacon_state::BeaconState;
pub use crate::builder::{Builder, BuilderIndex};
pub use crate::builder_pending_payment::BuilderPendingPayment;
pub use crate::builder_pending_withdrawal::BuilderPendingWithdrawal;
pub use crate::chain_spec::{ChainSpec, Domain};
pub use crate::checkpoint::Checkpoint;
pub use crate::eth_spec::{EthSpec, MainnetEthSpec, MinimalEthSpec};
pub use crate::execution_payload::{
    ExecutionPayload, ExecutionRequest, ExecutionRequests, Transaction, Transactions,
};
pub use crate::execution_payload_bid::{ExecutionPayloadBid, SignedExecutionPayloadBid};
pub use crate::execution_payload_envelope::{
    EnvelopeSummary, ExecutionPayloadEnvelope, SignedExecutionPayloadEnvelope,
};
pub use crate::payload_attestation::PayloadAttestation;
pub use crate::payload_attestation_data::PayloadAttestationData;
pub use crate::payload_attestation_message::PayloadAttestationMessage;
pub use crate::signing_data::{ForkData, SignedRoot, SigningData};
pub use crate::slot_epoch::{Epoch, Slot};
pub use crate::validator::Validator;

pub use alloy_primitives::{self, Address, B256 as Hash256};
pub use bls::{
    AggregateSignature, Keypair, PublicKey, PublicKeyBytes, SecretKey, Signature,
};
pub use ssz_types::{BitVector, FixedVector, VariableList, typenum};

/// An execution block hash. Kept distinct from `Hash256` in name only; the
/// wire encoding is identical.
pub type ExecutionBlockHash = Hash256;
