use super::SlotClock;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use types::Slot;

/// Determines the present slot based upon a manually-incremented UNIX timestamp.
pub struct ManualSlotClock {
    genesis_slot: Slot,
    /// Duration from UNIX epoch to genesis.
    genesis_duration: Duration,
    /// Duration from UNIX epoch to right now.
    current_time: Arc<RwLock<Duration>>,
    /// The length of each slot.
    slot_duration: Duration,
}

impl Clone for ManualSlotClock {
    fn clone(&self) -> Self {
        ManualSlotClock {
            genesis_slot: self.genesis_slot,
            genesis_duration: self.genesis_duration,
            current_time: Arc::clone(&self.current_time),
            slot_duration: self.slot_duration,
        }
    }
}

impl ManualSlotClock {
    /// Jumps the clock to the start of `slot`.
    pub fn set_slot(&self, slot: u64) {
        let slots_since_genesis: u32 = slot
            .checked_sub(self.genesis_slot.as_u64())
            .expect("slot must be post-genesis")
            .try_into()
            .expect("slot must fit within a u32");
        *self.current_time.write() =
            self.genesis_duration + self.slot_duration * slots_since_genesis;
    }

    pub fn set_current_time(&self, duration: Duration) {
        *self.current_time.write() = duration;
    }

    pub fn advance_time(&self, duration: Duration) {
        let current_time = *self.current_time.read();
        *self.current_time.write() = current_time + duration;
    }

    pub fn advance_slot(&self) {
        self.set_slot(self.now().expect("clock is post-genesis").as_u64() + 1)
    }
}

impl SlotClock for ManualSlotClock {
    fn new(genesis_slot: Slot, genesis_duration: Duration, slot_duration: Duration) -> Self {
        if slot_duration.as_millis() == 0 {
            panic!("ManualSlotClock cannot have a < 1ms slot duration");
        }

        Self {
            genesis_slot,
            current_time: Arc::new(RwLock::new(genesis_duration)),
            genesis_duration,
            slot_duration,
        }
    }

    fn now(&self) -> Option<Slot> {
        self.slot_of(*self.current_time.read())
    }

    fn is_prior_to_genesis(&self) -> Option<bool> {
        Some(*self.current_time.read() < self.genesis_duration)
    }

    fn now_duration(&self) -> Option<Duration> {
        Some(*self.current_time.read())
    }

    fn slot_of(&self, now: Duration) -> Option<Slot> {
        let since_genesis = now.checked_sub(self.genesis_duration)?;
        let slot = Slot::new((since_genesis.as_millis() / self.slot_duration.as_millis()) as u64);
        Some(slot + self.genesis_slot)
    }

    fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    fn duration_to_slot(&self, slot: Slot) -> Option<Duration> {
        self.start_of(slot)?.checked_sub(*self.current_time.read())
    }

    fn duration_to_next_slot(&self) -> Option<Duration> {
        let now = *self.current_time.read();
        if now < self.genesis_duration {
            self.genesis_duration.checked_sub(now)
        } else {
            self.start_of(self.slot_of(now)? + 1)?.checked_sub(now)
        }
    }

    fn start_of(&self, slot: Slot) -> Option<Duration> {
        let slots_since_genesis: u32 = slot
            .as_u64()
            .checked_sub(self.genesis_slot.as_u64())?
            .try_into()
            .ok()?;
        self.genesis_duration
            .checked_add(self.slot_duration.checked_mul(slots_since_genesis)?)
    }

    fn genesis_slot(&self) -> Slot {
        self.genesis_slot
    }
}
