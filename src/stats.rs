//! Landing statistics
//!
//! Per-slot counters for the presentation layer. Purely additive; never reset
//! during a session.

use serde::{Deserialize, Serialize};

/// Landing counters for one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LandingStats {
    /// Landings per slot, indexed like the board's slots
    pub per_slot: Vec<u64>,
    /// Balls that have landed
    pub total_landed: u64,
    /// Balls admitted by a drop
    pub total_dropped: u64,
    /// Sum of all payouts credited
    pub total_paid: u64,
}

impl LandingStats {
    /// Create empty counters for `slot_count` slots
    pub fn new(slot_count: usize) -> Self {
        Self {
            per_slot: vec![0; slot_count],
            ..Default::default()
        }
    }

    pub fn record_drop(&mut self) {
        self.total_dropped += 1;
    }

    /// Count a landing. Out-of-range slots still count toward the total.
    pub fn record_landing(&mut self, slot: usize, payout: u64) {
        if let Some(count) = self.per_slot.get_mut(slot) {
            *count += 1;
        }
        self.total_landed += 1;
        self.total_paid = self.total_paid.saturating_add(payout);
    }

    /// Landings in a slot (0 for unknown slots)
    pub fn count(&self, slot: usize) -> u64 {
        self.per_slot.get(slot).copied().unwrap_or(0)
    }

    /// Share of landed balls that fell in `slot`, in percent
    pub fn percentage(&self, slot: usize) -> f32 {
        if self.total_landed == 0 {
            return 0.0;
        }
        self.count(slot) as f32 / self.total_landed as f32 * 100.0
    }

    /// Balls dropped but not yet landed
    pub fn in_flight(&self) -> u64 {
        self.total_dropped.saturating_sub(self.total_landed)
    }

    /// Slot with the most landings (lowest index wins ties)
    pub fn most_common_slot(&self) -> Option<usize> {
        if self.total_landed == 0 {
            return None;
        }
        self.per_slot
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
            .map(|(i, _)| i)
    }

    /// Average payout per landed ball
    pub fn mean_payout(&self) -> f32 {
        if self.total_landed == 0 {
            return 0.0;
        }
        self.total_paid as f32 / self.total_landed as f32
    }
}
