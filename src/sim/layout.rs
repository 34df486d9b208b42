//! Static board geometry: the peg grid and the slot row
//!
//! Built once at setup and never mutated during play.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// A fixed circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
}

/// A scoring interval `[x, x + width)` at the bottom of the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub x: f32,
    pub width: f32,
    pub multiplier: f32,
}

impl Slot {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x && x < self.right()
    }
}

/// How slot multipliers are assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MultiplierPolicy {
    /// Slot `i` pays `i + 1`
    Ascending,
    /// Fixed table, repeated cyclically if shorter than the slot row
    Table(Vec<f32>),
    /// Uniform in `[min, max)` from the board RNG
    Randomized { min: f32, max: f32 },
    /// Linear from `edge` at both ends to `center` in the middle
    CenterWeighted { edge: f32, center: f32 },
}

impl MultiplierPolicy {
    /// Multipliers for a row of `count` slots
    pub fn assign<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<f32> {
        match self {
            MultiplierPolicy::Ascending => (0..count).map(|i| (i + 1) as f32).collect(),
            MultiplierPolicy::Table(table) if table.is_empty() => vec![1.0; count],
            MultiplierPolicy::Table(table) => (0..count).map(|i| table[i % table.len()]).collect(),
            MultiplierPolicy::Randomized { min, max } => {
                let (lo, hi) = if min <= max { (*min, *max) } else { (*max, *min) };
                (0..count)
                    .map(|_| if lo < hi { rng.random_range(lo..hi) } else { lo })
                    .collect()
            }
            MultiplierPolicy::CenterWeighted { edge, center } => {
                let mid = (count as f32 - 1.0) / 2.0;
                (0..count)
                    .map(|i| {
                        if mid <= 0.0 {
                            return *center;
                        }
                        // 0 at the middle, 1 at either end
                        let t = (i as f32 - mid).abs() / mid;
                        center + (edge - center) * t
                    })
                    .collect()
            }
        }
    }
}

/// Pegs and slots for one board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldLayout {
    pub pegs: Vec<Peg>,
    pub slots: Vec<Slot>,
}

impl FieldLayout {
    /// Build the staggered peg grid and the slot row from settings
    pub fn build<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Self {
        let pegs = build_pegs(settings);
        let slots = build_slots(settings, rng);
        log::info!(
            "Board layout: {} pegs, {} slots, {}x{}",
            pegs.len(),
            slots.len(),
            settings.width,
            settings.height
        );
        Self { pegs, slots }
    }
}

/// Even rows are shifted half a column; pegs touching a side wall are dropped
fn build_pegs(settings: &Settings) -> Vec<Peg> {
    if settings.peg_cols == 0 {
        return Vec::new();
    }
    let spacing_x = settings.width / settings.peg_cols as f32;
    let min_x = settings.peg_radius;
    let max_x = settings.width - settings.peg_radius;

    let mut pegs = Vec::with_capacity(settings.peg_rows as usize * settings.peg_cols as usize);
    for row in 0..settings.peg_rows {
        let offset = if row % 2 == 0 { spacing_x / 2.0 } else { 0.0 };
        let y = row as f32 * settings.row_spacing + settings.top_offset;
        for col in 0..settings.peg_cols {
            let x = col as f32 * spacing_x + offset;
            if x > min_x && x < max_x {
                pegs.push(Peg { pos: Vec2::new(x, y) });
            }
        }
    }
    pegs
}

fn build_slots<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Vec<Slot> {
    let count = settings.slot_count.max(1);
    let width = settings.width / count as f32;
    settings
        .multipliers
        .assign(count, rng)
        .into_iter()
        .enumerate()
        .map(|(i, multiplier)| Slot {
            x: i as f32 * width,
            width,
            multiplier,
        })
        .collect()
}
