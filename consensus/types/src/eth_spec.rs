use crate::ChainSpec;
use serde::{Deserialize, Serialize};
use ssz_types::typenum::{
    U4, U8, U16, U64, U512, U4096, U8192, U16384, U65536, U1048576, U1073741824, Unsigned,
};
use std::fmt::Debug;

/// Compile-time length parameters for the SSZ containers.
pub trait EthSpec:
    'static + Default + Sync + Send + Clone + Debug + PartialEq + Eq + std::hash::Hash
{
    type SlotsPerEpoch: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type SlotsPerHistoricalRoot: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type EpochsPerHistoricalVector: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    /// Number of members in the payload timeliness committee.
    type PtcSize: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    /// Length of the pending payment ring: two epochs of slots.
    type BuilderPendingPaymentsBound: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type BuilderPendingWithdrawalsLimit: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type BuilderRegistryLimit: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type ValidatorRegistryLimit: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxTransactionsPerPayload: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxBytesPerTransaction: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxBlobCommitmentsPerBlock: Unsigned + Clone + Sync + Send + Debug + PartialEq;

    fn default_spec() -> ChainSpec;

    fn slots_per_epoch() -> u64 {
        Self::SlotsPerEpoch::to_u64()
    }

    fn slots_per_historical_root() -> usize {
        Self::SlotsPerHistoricalRoot::to_usize()
    }

    fn epochs_per_historical_vector() -> usize {
        Self::EpochsPerHistoricalVector::to_usize()
    }

    fn ptc_size() -> usize {
        Self::PtcSize::to_usize()
    }

    fn builder_pending_payments_bound() -> usize {
        Self::BuilderPendingPaymentsBound::to_usize()
    }
}

/// Ethereum Foundation mainnet parameters.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
pub struct MainnetEthSpec;

impl EthSpec for MainnetEthSpec {
    type SlotsPerEpoch = ssz_types::typenum::U32;
    type SlotsPerHistoricalRoot = U8192;
    type EpochsPerHistoricalVector = U65536;
    type PtcSize = U512;
    type BuilderPendingPaymentsBound = U64;
    type BuilderPendingWithdrawalsLimit = U16384;
    type BuilderRegistryLimit = U1048576;
    type ValidatorRegistryLimit = U1048576;
    type MaxTransactionsPerPayload = U1048576;
    type MaxBytesPerTransaction = U1073741824;
    type MaxBlobCommitmentsPerBlock = U4096;

    fn default_spec() -> ChainSpec {
        ChainSpec::mainnet()
    }
}

/// Shrunken parameters for fast testing.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
pub struct MinimalEthSpec;

impl EthSpec for MinimalEthSpec {
    type SlotsPerEpoch = U8;
    type SlotsPerHistoricalRoot = U64;
    type EpochsPerHistoricalVector = U64;
    type PtcSize = U4;
    type BuilderPendingPaymentsBound = U16;
    type BuilderPendingWithdrawalsLimit = U64;
    type BuilderRegistryLimit = U1048576;
    type ValidatorRegistryLimit = U1048576;
    type MaxTransactionsPerPayload = U16384;
    type MaxBytesPerTransaction = U1073741824;
    type MaxBlobCommitmentsPerBlock = U16;

    fn default_spec() -> ChainSpec {
        ChainSpec::minimal()
    }
}
