//! Landing resolution: which slot a ball fell into and what it pays

use serde::{Deserialize, Serialize};

use super::layout::Slot;

/// How a slot multiplier turns into points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum PayoutPolicy {
    /// `floor(multiplier)`
    #[default]
    Flat,
    /// `floor(multiplier * factor)`
    Scaled { factor: f32 },
    /// `floor(multiplier) - drop_cost`, never below zero
    NetOfCost,
}

impl PayoutPolicy {
    /// Points credited for landing in a slot with `multiplier`
    pub fn payout(&self, multiplier: f32, drop_cost: u64) -> u64 {
        let points = match self {
            PayoutPolicy::Flat | PayoutPolicy::NetOfCost => multiplier,
            PayoutPolicy::Scaled { factor } => multiplier * factor,
        };
        // NaN and negatives floor to zero; `as` saturates on overflow
        let points = points.max(0.0).floor() as u64;
        match self {
            PayoutPolicy::NetOfCost => points.saturating_sub(drop_cost),
            _ => points,
        }
    }
}

/// A resolved landing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub slot: usize,
    pub multiplier: f32,
    pub payout: u64,
}

/// Index of the slot containing `x`
///
/// Positions left of the board clamp to the first slot; positions at or past
/// the right edge clamp to the last. NaN resolves to slot 0.
/// Returns None only when there are no slots.
pub fn slot_index(slots: &[Slot], x: f32) -> Option<usize> {
    if slots.is_empty() {
        return None;
    }
    if x.is_nan() {
        return Some(0);
    }
    // Slots are sorted and contiguous: count the ones that start at or before x
    let starts_before = slots.partition_point(|slot| slot.x <= x);
    Some(starts_before.saturating_sub(1).min(slots.len() - 1))
}

/// Look up the slot under `x` and compute the payout
pub fn resolve(slots: &[Slot], x: f32, policy: PayoutPolicy, drop_cost: u64) -> Option<Landing> {
    let slot = slot_index(slots, x)?;
    let multiplier = slots[slot].multiplier;
    Some(Landing {
        slot,
        multiplier,
        payout: policy.payout(multiplier, drop_cost),
    })
}
