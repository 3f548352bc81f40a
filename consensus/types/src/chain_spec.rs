use crate::{Epoch, ForkData, Hash256};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tree_hash::TreeHash;

/// BLS signature domains used by the ePBS subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    BeaconBuilder,
    PtcAttester,
}

/// Fixed configuration constants. These do not vary per-state, only per
/// network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSpec {
    pub seconds_per_slot: u64,
    /// Minimum balance a builder must retain on top of all outstanding
    /// obligations for a bid to be accepted (Gwei).
    pub min_builder_balance: u64,
    /// Delay, in epochs, between a payment being promoted and the withdrawal
    /// becoming claimable.
    pub builder_withdrawal_delay: u64,
    /// Maximum Gwei of builder payments assigned to a single withdrawable
    /// epoch; the excess spills into later epochs.
    pub builder_payment_churn_limit: u64,
    /// Effective balance ceiling used by the committee sampling weights (Gwei).
    pub max_effective_balance: u64,
    pub far_future_epoch: Epoch,
    pub genesis_fork_version: [u8; 4],
    pub domain_beacon_builder: u32,
    pub domain_ptc_attester: u32,
    /// Offset into a slot after which PTC messages for that slot are dropped.
    pub ptc_attestation_deadline: Duration,
    /// Offset into a slot by which the builder must have revealed the payload.
    /// Strictly later than the PTC deadline.
    pub payload_reveal_deadline: Duration,
    pub maximum_gossip_clock_disparity_millis: u64,
    pub shuffle_round_count: u8,
}

impl ChainSpec {
    pub fn mainnet() -> Self {
        Self {
            seconds_per_slot: 12,
            min_builder_balance: 1_000_000_000,
            builder_withdrawal_delay: 256,
            builder_payment_churn_limit: 128_000_000_000,
            max_effective_balance: 32_000_000_000,
            far_future_epoch: Epoch::new(u64::MAX),
            genesis_fork_version: [0, 0, 0, 0],
            domain_beacon_builder: 27,
            domain_ptc_attester: 12,
            ptc_attestation_deadline: Duration::from_secs(9),
            payload_reveal_deadline: Duration::from_secs(10),
            maximum_gossip_clock_disparity_millis: 500,
            shuffle_round_count: 90,
        }
    }

    pub fn minimal() -> Self {
        Self {
            seconds_per_slot: 6,
            min_builder_balance: 1_000_000_000,
            builder_withdrawal_delay: 2,
            builder_payment_churn_limit: 16_000_000_000,
            ptc_attestation_deadline: Duration::from_secs(4),
            payload_reveal_deadline: Duration::from_secs(5),
            shuffle_round_count: 10,
            ..Self::mainnet()
        }
    }

    pub fn maximum_gossip_clock_disparity(&self) -> Duration {
        Duration::from_millis(self.maximum_gossip_clock_disparity_millis)
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::from_secs(self.seconds_per_slot)
    }

    pub(crate) fn domain_constant(&self, domain: Domain) -> u32 {
        match domain {
            Domain::BeaconBuilder => self.domain_beacon_builder,
            Domain::PtcAttester => self.domain_ptc_attester,
        }
    }

    /// Computes the 32-byte signature domain from the domain constant and the
    /// fork digest.
    pub fn compute_domain(
        &self,
        domain: Domain,
        fork_version: [u8; 4],
        genesis_validators_root: Hash256,
    ) -> Hash256 {
        let fork_data_root = ForkData {
            current_version: fork_version,
            genesis_validators_root,
        }
        .tree_hash_root();

        let mut domain_bytes = [0; 32];
        domain_bytes[..4].copy_from_slice(&self.domain_constant(domain).to_le_bytes());
        domain_bytes[4..].copy_from_slice(&fork_data_root.as_slice()[..28]);
        Hash256::from(domain_bytes)
    }

    pub fn get_domain(&self, domain: Domain, genesis_validators_root: Hash256) -> Hash256 {
        self.compute_domain(domain, self.genesis_fork_version, genesis_validators_root)
    }
}
