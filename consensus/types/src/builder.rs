use crate::{Address, ChainSpec, Epoch, PublicKeyBytes};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

pub type BuilderIndex = u64;

/// A registered builder in the beacon state.
///
/// Builders are separate from validators. They register with a deposit and
/// must keep enough balance to cover every bid they sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Builder {
    pub pubkey: PublicKeyBytes,
    pub execution_address: Address,
    #[serde(with = "serde_utils::quoted_u64")]
    pub balance: u64,
    pub deposit_epoch: Epoch,
    pub withdrawable_epoch: Epoch,
    pub slashed: bool,
}

impl Builder {
    /// A builder may bid once its deposit is finalized and it has not begun
    /// an exit.
    pub fn is_active_at_finalized_epoch(&self, finalized_epoch: Epoch, spec: &ChainSpec) -> bool {
        self.deposit_epoch < finalized_epoch && self.withdrawable_epoch == spec.far_future_epoch
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            pubkey: PublicKeyBytes::empty(),
            execution_address: Address::ZERO,
            balance: 0,
            deposit_epoch: Epoch::new(0),
            withdrawable_epoch: Epoch::new(u64::MAX),
            slashed: false,
        }
    }
}
