//! Epoch-boundary settlement of builder pending payments.
//!
//! By the time an epoch ends, the availability bit of every slot in the
//! previous epoch is final. Each parked payment from that epoch is either
//! promoted into the withdrawal queue (payload turned up) or forfeited
//! (payload withheld), and its ring bucket and availability bit are cleared
//! for reuse.

use crate::errors::{EpochProcessingError, FatalInvariantViolation};
use safe_arith::SafeArith;
use tracing::debug;
use types::{BeaconState, BuilderPendingWithdrawal, ChainSpec, Epoch, EthSpec};

/// Runs the ePBS portion of the epoch transition. Call with `state.slot`
/// already advanced into the new epoch.
pub fn process_epoch<E: EthSpec>(
    state: &mut BeaconState<E>,
    spec: &ChainSpec,
) -> Result<(), EpochProcessingError> {
    process_builder_payment_settlement(state, spec)
}

/// Settles every pending payment parked during the previous epoch.
pub fn process_builder_payment_settlement<E: EthSpec>(
    state: &mut BeaconState<E>,
    spec: &ChainSpec,
) -> Result<(), EpochProcessingError> {
    // Nothing to settle during the genesis epoch.
    let Some(previous_epoch) = state.current_epoch().checked_sub(1u64) else {
        return Ok(());
    };

    for slot in previous_epoch.slot_iter(E::slots_per_epoch()) {
        let bucket = BeaconState::<E>::builder_payment_bucket(slot);
        let payment = *state.get_builder_payment(slot);
        let available = state.is_payload_available(slot)?;
        // The bit is consumed here: the slot sharing this index one history
        // window from now must start from "withheld".
        state.set_payload_availability(slot, false)?;
        if payment.is_vacant() {
            continue;
        }
        // A populated bucket must carry the slot it was parked for. Anything
        // else means the ring was mismanaged and amounts can no longer be
        // attributed; settling would corrupt builder balances.
        if payment.slot != slot {
            return Err(FatalInvariantViolation::CorruptedPaymentRing {
                bucket,
                expected_slot: slot,
                found_slot: payment.slot,
            }
            .into());
        }

        if available {
            let withdrawable_epoch =
                compute_builder_payment_withdrawable_epoch(state, payment.amount, spec)?;
            state
                .builder_pending_withdrawals
                .push(BuilderPendingWithdrawal {
                    builder_index: payment.builder_index,
                    amount: payment.amount,
                    withdrawable_epoch,
                })
                .map_err(|_| FatalInvariantViolation::WithdrawalQueueFull {
                    builder_index: payment.builder_index,
                    amount: payment.amount,
                })?;
        } else {
            debug!(
                %slot,
                builder_index = payment.builder_index,
                amount = payment.amount,
                "Forfeiting builder payment for withheld payload"
            );
        }

        state.builder_pending_payments[bucket] = Default::default();
    }

    Ok(())
}

/// Assigns a promoted payment its withdrawable epoch, rate-limited by the
/// per-epoch churn: each epoch absorbs at most `builder_payment_churn_limit`
/// Gwei and the excess spills into later epochs.
fn compute_builder_payment_withdrawable_epoch<E: EthSpec>(
    state: &mut BeaconState<E>,
    amount: u64,
    spec: &ChainSpec,
) -> Result<Epoch, EpochProcessingError> {
    if spec.builder_payment_churn_limit == 0 {
        return Err(FatalInvariantViolation::ChurnAccountingFailure { amount }.into());
    }

    // The accumulator never refers to an epoch closer than the withdrawal
    // delay; catch it up and refill the current epoch's allowance.
    let earliest = state.current_epoch() + spec.builder_withdrawal_delay;
    if state.earliest_builder_payment_epoch < earliest {
        state.earliest_builder_payment_epoch = earliest;
        state.builder_payment_balance_to_consume = spec.builder_payment_churn_limit;
    }

    while amount > state.builder_payment_balance_to_consume {
        state.earliest_builder_payment_epoch += 1;
        state
            .builder_payment_balance_to_consume
            .safe_add_assign(spec.builder_payment_churn_limit)?;
    }

    state.builder_payment_balance_to_consume = state
        .builder_payment_balance_to_consume
        .checked_sub(amount)
        .ok_or(FatalInvariantViolation::ChurnAccountingFailure { amount })?;

    Ok(state.earliest_builder_payment_epoch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{E, epbs_state};
    use types::{BuilderPendingPayment, Slot};

    const CHURN: u64 = 16_000_000_000;

    /// State sitting at the first slot of epoch 2, so settlement covers
    /// epoch 1 (slots 8..16 under the minimal preset).
    fn settlement_state() -> (BeaconState<E>, ChainSpec) {
        let (mut state, _, _, spec) = epbs_state(4, 2);
        state.slot = Slot::new(16);
        (state, spec)
    }

    fn park(state: &mut BeaconState<E>, builder_index: u64, amount: u64, slot: u64) {
        state.set_builder_payment(BuilderPendingPayment {
            builder_index,
            amount,
            slot: Slot::new(slot),
        });
    }

    #[test]
    fn revealed_payment_is_promoted() {
        let (mut state, spec) = settlement_state();
        park(&mut state, 0, 5_000_000_000, 10);
        state.set_payload_availability(Slot::new(10), true).unwrap();

        process_epoch(&mut state, &spec).unwrap();

        assert_eq!(state.builder_pending_withdrawals.len(), 1);
        let withdrawal = &state.builder_pending_withdrawals[0];
        assert_eq!(withdrawal.builder_index, 0);
        assert_eq!(withdrawal.amount, 5_000_000_000);
        // Current epoch 2 plus the minimal-preset delay of 2.
        assert_eq!(withdrawal.withdrawable_epoch, Epoch::new(4));
        assert!(state.get_builder_payment(Slot::new(10)).is_vacant());
    }

    #[test]
    fn withheld_payment_is_forfeited() {
        let (mut state, spec) = settlement_state();
        park(&mut state, 0, 5_000_000_000, 10);

        process_epoch(&mut state, &spec).unwrap();

        assert!(state.builder_pending_withdrawals.is_empty());
        assert!(state.get_builder_payment(Slot::new(10)).is_vacant());
        // The forfeited amount no longer counts against the builder.
        assert_eq!(state.builder_pending_balance_to_withdraw(0).unwrap(), 0);
    }

    #[test]
    fn availability_bit_does_not_leak_across_the_history_window() {
        let (mut state, spec) = settlement_state();
        // Slot 10's payload was applied and its payment settled normally.
        park(&mut state, 0, 5_000_000_000, 10);
        state.set_payload_availability(Slot::new(10), true).unwrap();
        process_epoch(&mut state, &spec).unwrap();
        assert_eq!(state.builder_pending_withdrawals.len(), 1);

        // Slot 74 shares slot 10's bit under the minimal preset's 64-slot
        // window. Its payload was withheld.
        state.slot = Slot::new(80);
        park(&mut state, 0, 5_000_000_000, 74);
        process_epoch(&mut state, &spec).unwrap();

        // The earlier settlement consumed the bit, so the aliasing payment
        // is forfeited, not promoted.
        assert_eq!(state.builder_pending_withdrawals.len(), 1);
        assert!(state.get_builder_payment(Slot::new(74)).is_vacant());
        assert!(!state.is_payload_available(Slot::new(74)).unwrap());
    }

    #[test]
    fn settlement_conserves_amounts() {
        let (mut state, spec) = settlement_state();
        park(&mut state, 0, 3, 8);
        park(&mut state, 1, 5, 9);
        park(&mut state, 0, 7, 12);
        state.set_payload_availability(Slot::new(8), true).unwrap();
        state.set_payload_availability(Slot::new(12), true).unwrap();

        process_epoch(&mut state, &spec).unwrap();

        let promoted: u64 = state
            .builder_pending_withdrawals
            .iter()
            .map(|w| w.amount)
            .sum();
        assert_eq!(promoted, 10);
        for slot in 8..16 {
            assert!(state.get_builder_payment(Slot::new(slot)).is_vacant());
        }
    }

    #[test]
    fn current_epoch_payments_are_left_alone() {
        let (mut state, spec) = settlement_state();
        park(&mut state, 0, 9, 16);
        state.set_payload_availability(Slot::new(16), true).unwrap();

        process_epoch(&mut state, &spec).unwrap();

        assert!(state.builder_pending_withdrawals.is_empty());
        assert_eq!(state.get_builder_payment(Slot::new(16)).amount, 9);
    }

    #[test]
    fn churn_spills_large_payments_into_later_epochs() {
        let (mut state, spec) = settlement_state();
        // Two and a half epochs worth of churn.
        park(&mut state, 0, 2 * CHURN + CHURN / 2, 10);
        park(&mut state, 1, CHURN / 2, 11);
        state.set_payload_availability(Slot::new(10), true).unwrap();
        state.set_payload_availability(Slot::new(11), true).unwrap();

        process_epoch(&mut state, &spec).unwrap();

        // First payment eats epochs 4 and 5 whole and half of 6; the second
        // fits in 6's remainder.
        assert_eq!(
            state.builder_pending_withdrawals[0].withdrawable_epoch,
            Epoch::new(6)
        );
        assert_eq!(
            state.builder_pending_withdrawals[1].withdrawable_epoch,
            Epoch::new(6)
        );
        assert_eq!(state.builder_payment_balance_to_consume, 0);
        assert_eq!(state.earliest_builder_payment_epoch, Epoch::new(6));
    }

    #[test]
    fn accumulator_refills_when_behind_the_delay_horizon() {
        let (mut state, spec) = settlement_state();
        state.earliest_builder_payment_epoch = Epoch::new(3);
        state.builder_payment_balance_to_consume = 1;
        park(&mut state, 0, CHURN, 10);
        state.set_payload_availability(Slot::new(10), true).unwrap();

        process_epoch(&mut state, &spec).unwrap();

        // Epoch 3 is closer than current + delay = 4, so the stale allowance
        // is discarded and the payment lands at epoch 4.
        assert_eq!(
            state.builder_pending_withdrawals[0].withdrawable_epoch,
            Epoch::new(4)
        );
        assert_eq!(state.builder_payment_balance_to_consume, 0);
    }

    #[test]
    fn corrupted_ring_is_fatal() {
        let (mut state, spec) = settlement_state();
        // Bucket for slot 10 tagged with an aliasing slot from another epoch.
        state.builder_pending_payments[10] = BuilderPendingPayment {
            builder_index: 0,
            amount: 1,
            slot: Slot::new(26),
        };

        assert_eq!(
            process_epoch(&mut state, &spec),
            Err(EpochProcessingError::Fatal(
                FatalInvariantViolation::CorruptedPaymentRing {
                    bucket: 10,
                    expected_slot: Slot::new(10),
                    found_slot: Slot::new(26),
                }
            ))
        );
    }

    #[test]
    fn zero_churn_limit_is_fatal() {
        let (mut state, mut spec) = settlement_state();
        spec.builder_payment_churn_limit = 0;
        park(&mut state, 0, 1, 10);
        state.set_payload_availability(Slot::new(10), true).unwrap();

        assert_eq!(
            process_epoch(&mut state, &spec),
            Err(EpochProcessingError::Fatal(
                FatalInvariantViolation::ChurnAccountingFailure { amount: 1 }
            ))
        );
    }

    #[test]
    fn genesis_epoch_settles_nothing() {
        let (mut state, _, _, spec) = epbs_state(4, 1);
        state.slot = Slot::new(3);
        park(&mut state, 0, 5, 1);
        state.set_payload_availability(Slot::new(1), true).unwrap();

        process_epoch(&mut state, &spec).unwrap();

        assert!(state.builder_pending_withdrawals.is_empty());
        assert_eq!(state.get_builder_payment(Slot::new(1)).amount, 5);
    }
}
