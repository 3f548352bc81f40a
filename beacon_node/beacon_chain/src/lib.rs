//! Node-side ePBS surfaces: gossip verification of bids and PTC votes,
//! the aggregation and bid pools feeding block production, equivocation
//! tracking and the applied-envelope summary cache.

pub mod envelope_summary_cache;
pub mod execution_bid_pool;
pub mod execution_bid_verification;
pub mod observed_execution_bids;
pub mod payload_attestation_pool;
pub mod payload_attestation_verification;

#[cfg(test)]
mod test_utils;

pub use envelope_summary_cache::EnvelopeSummaryCache;
pub use execution_bid_pool::ExecutionBidPool;
pub use execution_bid_verification::GossipVerifiedBid;
pub use observed_execution_bids::{BidObservationOutcome, ObservedExecutionBids};
pub use payload_attestation_pool::{InsertOutcome, PayloadAttestationPool};
pub use payload_attestation_verification::{
    BlockLookup, VerifiedPayloadAttestationMessage, verify_payload_attestation_message,
};
