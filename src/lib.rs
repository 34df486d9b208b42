//! Peg Drop - A ball-drop board game simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, physics, landing, score)
//! - `stats`: Per-slot landing counters for the presentation layer
//! - `settings`: Board configuration and presets
//! - `platform`: Browser bindings (wasm32 only)

pub mod platform;
pub mod settings;
pub mod sim;
pub mod stats;

pub use settings::{BoardPreset, Settings, SettingsError};
pub use stats::LandingStats;

/// Base game constants
pub mod consts {
    /// Canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 550.0;

    pub const BALL_RADIUS: f32 = 8.0;
    pub const PEG_RADIUS: f32 = 5.0;

    /// Downward acceleration per tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.2;
    /// Impulse magnitude applied on peg contact
    pub const BOUNCE_FACTOR: f32 = 0.6;
    /// A ball still in flight after this many ticks is settled where it is
    pub const MAX_FLIGHT_TICKS: u32 = 3_600;

    pub const SLOT_COUNT: usize = 10;
    /// Height of the slot bar; its top edge is the scoring line
    pub const SLOT_BAR_HEIGHT: f32 = 30.0;

    /// Peg grid
    pub const PEG_ROWS: u32 = 12;
    pub const PEG_COLS: u32 = 9;
    pub const PEG_ROW_SPACING: f32 = 40.0;
    pub const PEG_TOP_OFFSET: f32 = 50.0;

    /// Economy
    pub const STARTING_SCORE: u64 = 100;
    pub const DROP_COST: u64 = 1;
    /// Max horizontal launch speed (vx drawn from [-spread, spread))
    pub const DROP_SPREAD: f32 = 1.0;

    /// Multipliers of the 18-slot board
    pub const WIDE_MULTIPLIERS: [f32; 18] = [
        0.5, 1.0, 1.0, 1.2, 1.2, 1.4, 1.4, 2.0, 3.0, 4.0, 2.0, 1.4, 1.4, 1.2, 1.2, 1.0, 1.0, 0.5,
    ];
    /// Payout scale of the 18-slot board
    pub const WIDE_PAYOUT_SCALE: f32 = 10.0;
}
