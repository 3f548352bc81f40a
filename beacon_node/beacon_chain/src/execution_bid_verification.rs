//! Gossip verification of `SignedExecutionPayloadBid` messages.
//!
//! A bid passing these checks may be forwarded, recorded against the
//! builder for equivocation purposes and offered to the proposer via the
//! bid pool.

use crate::observed_execution_bids::{BidObservationOutcome, ObservedExecutionBids};
use slot_clock::SlotClock;
use state_processing::{BlockProcessingError, VerifySignatures, verify_execution_payload_bid};
use tracing::warn;
use tree_hash::TreeHash;
use types::{BeaconState, BuilderIndex, ChainSpec, EthSpec, Hash256, SignedExecutionPayloadBid, Slot};

#[derive(Debug, PartialEq)]
pub enum Error {
    PriorToGenesis,
    /// Bids are only interesting for the slot in progress or the one about
    /// to be proposed.
    StaleSlot { bid_slot: Slot, current_slot: Slot },
    /// This exact bid was already observed; no need to re-propagate.
    BidAlreadyKnown {
        builder_index: BuilderIndex,
        slot: Slot,
        bid_root: Hash256,
    },
    /// The builder already committed to a different bid for this slot.
    BidEquivocation {
        builder_index: BuilderIndex,
        slot: Slot,
        first_root: Hash256,
        second_root: Hash256,
    },
    /// The bid failed state-level verification (signature, registration,
    /// funds, parent linkage).
    BidProcessing(BlockProcessingError),
}

impl From<BlockProcessingError> for Error {
    fn from(e: BlockProcessingError) -> Self {
        Error::BidProcessing(e)
    }
}

/// A bid that passed gossip verification, with its root already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct GossipVerifiedBid {
    bid: SignedExecutionPayloadBid,
    bid_root: Hash256,
}

impl GossipVerifiedBid {
    /// Verifies a bid from gossip against the head state and the
    /// equivocation record.
    pub fn verify<E: EthSpec, C: SlotClock>(
        signed_bid: SignedExecutionPayloadBid,
        state: &BeaconState<E>,
        clock: &C,
        observed_bids: &mut ObservedExecutionBids,
        spec: &ChainSpec,
    ) -> Result<Self, Error> {
        let bid_slot = signed_bid.message.slot;
        let current_slot = clock.now().ok_or(Error::PriorToGenesis)?;

        // Builders bid on top of the head, for the current slot or the next
        // one while its proposer assembles a block.
        if bid_slot != current_slot && bid_slot != current_slot + 1 {
            return Err(Error::StaleSlot {
                bid_slot,
                current_slot,
            });
        }

        verify_execution_payload_bid(
            state,
            &signed_bid,
            bid_slot,
            state.latest_block_root(),
            VerifySignatures::True,
            spec,
        )?;

        let bid_root = signed_bid.message.tree_hash_root();
        let builder_index = signed_bid.message.builder_index;
        match observed_bids.observe_bid(bid_slot, builder_index, bid_root) {
            BidObservationOutcome::New => {}
            BidObservationOutcome::Duplicate => {
                return Err(Error::BidAlreadyKnown {
                    builder_index,
                    slot: bid_slot,
                    bid_root,
                });
            }
            BidObservationOutcome::Equivocation {
                existing_bid_root,
                new_bid_root,
            } => {
                warn!(
                    builder_index,
                    slot = %bid_slot,
                    first_root = ?existing_bid_root,
                    second_root = ?new_bid_root,
                    "Builder bid equivocation"
                );
                return Err(Error::BidEquivocation {
                    builder_index,
                    slot: bid_slot,
                    first_root: existing_bid_root,
                    second_root: new_bid_root,
                });
            }
        }

        Ok(Self {
            bid: signed_bid,
            bid_root,
        })
    }

    pub fn bid(&self) -> &SignedExecutionPayloadBid {
        &self.bid
    }

    pub fn bid_root(&self) -> Hash256 {
        self.bid_root
    }

    pub fn into_inner(self) -> SignedExecutionPayloadBid {
        self.bid
    }
}
