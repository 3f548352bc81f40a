use crate::{
    BeaconBlockHeader, BitVector, Builder, BuilderIndex, BuilderPendingPayment,
    BuilderPendingWithdrawal, ChainSpec, Checkpoint, Domain, Epoch, EthSpec, ExecutionBlockHash,
    ExecutionPayloadBid, FixedVector, Hash256, Slot, Validator, VariableList,
};
use ethereum_hashing::hash;
use safe_arith::{ArithError, SafeArith};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnknownValidator(u64),
    UnknownBuilder(BuilderIndex),
    SszTypesError(ssz_types::Error),
    BitfieldError(ssz::BitfieldError),
    ArithError(ArithError),
}

impl From<ssz_types::Error> for Error {
    fn from(e: ssz_types::Error) -> Self {
        Error::SszTypesError(e)
    }
}

impl From<ssz::BitfieldError> for Error {
    fn from(e: ssz::BitfieldError) -> Self {
        Error::BitfieldError(e)
    }
}

impl From<ArithError> for Error {
    fn from(e: ArithError) -> Self {
        Error::ArithError(e)
    }
}

/// The beacon state, reduced to the fields the ePBS transition touches.
///
/// Builder payments flow through three stages recorded here: the pending
/// payment ring (`builder_pending_payments`), the withdrawal queue
/// (`builder_pending_withdrawals`) and finally the execution layer, which
/// drains the queue FIFO.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(bound = "E: EthSpec")]
pub struct BeaconState<E: EthSpec> {
    pub slot: Slot,
    pub genesis_validators_root: Hash256,
    pub latest_block_header: BeaconBlockHeader,
    pub randao_mixes: FixedVector<Hash256, E::EpochsPerHistoricalVector>,
    pub validators: VariableList<Validator, E::ValidatorRegistryLimit>,
    pub balances: VariableList<u64, E::ValidatorRegistryLimit>,
    pub finalized_checkpoint: Checkpoint,

    // ePBS fields.
    pub builders: VariableList<Builder, E::BuilderRegistryLimit>,
    /// The bid committed to by the current slot's block, pending its reveal.
    pub latest_execution_payload_bid: ExecutionPayloadBid,
    /// One bit per slot (mod `SlotsPerHistoricalRoot`): did the committed
    /// payload turn up?
    pub execution_payload_availability: BitVector<E::SlotsPerHistoricalRoot>,
    /// Ring of pending payments indexed by `slot % (2 * slots_per_epoch)`.
    pub builder_pending_payments: FixedVector<BuilderPendingPayment, E::BuilderPendingPaymentsBound>,
    /// FIFO queue of settled payments awaiting their withdrawable epoch.
    pub builder_pending_withdrawals:
        VariableList<BuilderPendingWithdrawal, E::BuilderPendingWithdrawalsLimit>,
    /// Hash of the most recent applied execution payload.
    pub latest_block_hash: ExecutionBlockHash,
    /// Highest slot whose payload was revealed and applied. Monotonic.
    pub latest_full_slot: Slot,
    /// Withdrawals root of the most recent applied payload.
    pub latest_withdrawals_root: Hash256,

    // Builder payment churn accumulator.
    #[serde(with = "serde_utils::quoted_u64")]
    pub builder_payment_balance_to_consume: u64,
    pub earliest_builder_payment_epoch: Epoch,
}

impl<E: EthSpec> BeaconState<E> {
    pub fn current_epoch(&self) -> Epoch {
        self.slot.epoch(E::slots_per_epoch())
    }

    pub fn previous_epoch(&self) -> Epoch {
        let current = self.current_epoch();
        current.checked_sub(1u64).unwrap_or(current)
    }

    /// The root of the block this state follows from.
    pub fn latest_block_root(&self) -> Hash256 {
        use tree_hash::TreeHash;
        self.latest_block_header.tree_hash_root()
    }

    pub fn get_validator(&self, validator_index: u64) -> Result<&Validator, Error> {
        self.validators
            .get(validator_index as usize)
            .ok_or(Error::UnknownValidator(validator_index))
    }

    pub fn get_builder(&self, builder_index: BuilderIndex) -> Result<&Builder, Error> {
        self.builders
            .get(builder_index as usize)
            .ok_or(Error::UnknownBuilder(builder_index))
    }

    pub fn get_builder_mut(&mut self, builder_index: BuilderIndex) -> Result<&mut Builder, Error> {
        self.builders
            .get_mut(builder_index as usize)
            .ok_or(Error::UnknownBuilder(builder_index))
    }

    pub fn get_active_validator_indices(&self, epoch: Epoch) -> Vec<u64> {
        self.validators
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_active_at(epoch))
            .map(|(i, _)| i as u64)
            .collect()
    }

    pub fn get_randao_mix(&self, epoch: Epoch) -> &Hash256 {
        let i = epoch.as_usize() % E::epochs_per_historical_vector();
        &self.randao_mixes[i]
    }

    /// Seed for committee sampling at `epoch`, domain-separated so distinct
    /// duties draw independent randomness.
    pub fn get_seed(&self, epoch: Epoch, domain: Domain, spec: &ChainSpec) -> Hash256 {
        let mut preimage = Vec::with_capacity(4 + 8 + 32);
        preimage.extend_from_slice(&spec.domain_constant(domain).to_le_bytes());
        preimage.extend_from_slice(&epoch.as_u64().to_le_bytes());
        preimage.extend_from_slice(self.get_randao_mix(epoch).as_slice());
        Hash256::from_slice(&hash(&preimage))
    }

    /// Index of the pending payment bucket for `slot`.
    pub fn builder_payment_bucket(slot: Slot) -> usize {
        slot.as_usize() % E::builder_pending_payments_bound()
    }

    pub fn get_builder_payment(&self, slot: Slot) -> &BuilderPendingPayment {
        &self.builder_pending_payments[Self::builder_payment_bucket(slot)]
    }

    /// Writes the pending payment for `slot`, overwriting whatever stale
    /// entry occupies the bucket.
    pub fn set_builder_payment(&mut self, payment: BuilderPendingPayment) {
        let bucket = Self::builder_payment_bucket(payment.slot);
        self.builder_pending_payments[bucket] = payment;
    }

    pub fn is_payload_available(&self, slot: Slot) -> Result<bool, Error> {
        let i = slot.as_usize() % E::slots_per_historical_root();
        Ok(self.execution_payload_availability.get(i)?)
    }

    pub fn set_payload_availability(&mut self, slot: Slot, available: bool) -> Result<(), Error> {
        let i = slot.as_usize() % E::slots_per_historical_root();
        Ok(self.execution_payload_availability.set(i, available)?)
    }

    /// Everything the builder already owes: parked payments plus queued
    /// withdrawals. Bids must be covered on top of this.
    pub fn builder_pending_balance_to_withdraw(
        &self,
        builder_index: BuilderIndex,
    ) -> Result<u64, Error> {
        let mut total = 0u64;
        for payment in self
            .builder_pending_payments
            .iter()
            .filter(|p| !p.is_vacant() && p.builder_index == builder_index)
        {
            total.safe_add_assign(payment.amount)?;
        }
        for withdrawal in self
            .builder_pending_withdrawals
            .iter()
            .filter(|w| w.builder_index == builder_index)
        {
            total.safe_add_assign(withdrawal.amount)?;
        }
        Ok(total)
    }

    /// The FIFO prefix of the withdrawal queue that the execution layer may
    /// drain at `epoch`.
    pub fn withdrawable_builder_payments(
        &self,
        epoch: Epoch,
    ) -> impl Iterator<Item = &BuilderPendingWithdrawal> {
        self.builder_pending_withdrawals
            .iter()
            .take_while(move |w| w.withdrawable_epoch <= epoch)
    }
}
