//! Board settings and presets
//!
//! Everything that varies between board variants lives here: canvas size,
//! physics constants, peg grid, slot table and economy.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{MultiplierPolicy, PayoutPolicy};

/// Settings loading/validation errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Named board variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardPreset {
    /// 10 slots, multipliers 1x..10x, flat payout
    #[default]
    Classic,
    /// 18 slots, fixed table peaking at the middle, payout scaled by 10
    Wide,
    /// 10 slots, multipliers rising toward the middle
    Center,
}

impl BoardPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardPreset::Classic => "Classic",
            BoardPreset::Wide => "Wide",
            BoardPreset::Center => "Center",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(BoardPreset::Classic),
            "wide" => Some(BoardPreset::Wide),
            "center" | "centre" => Some(BoardPreset::Center),
            _ => None,
        }
    }
}

/// Board settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    pub width: f32,
    pub height: f32,

    // === Physics ===
    pub ball_radius: f32,
    pub peg_radius: f32,
    /// Added to vy every tick
    pub gravity: f32,
    /// Peg contact impulse magnitude
    pub bounce_factor: f32,
    /// Pull the ball back inside when it overshoots a side wall
    pub clamp_to_walls: bool,
    /// Force a landing after this many ticks in flight (0 = never)
    ///
    /// A backstop only: on the shipped boards every ball crosses the scoring
    /// line long before this. A forced ball is scored by its current `x`
    /// even though it never reached the slot bar.
    pub max_flight_ticks: u32,

    // === Peg grid ===
    pub peg_rows: u32,
    pub peg_cols: u32,
    pub row_spacing: f32,
    pub top_offset: f32,

    // === Slots ===
    pub slot_count: usize,
    pub slot_bar_height: f32,
    pub multipliers: MultiplierPolicy,

    // === Economy ===
    pub starting_score: u64,
    pub drop_cost: u64,
    pub drop_spread: f32,
    pub payout: PayoutPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,

            ball_radius: BALL_RADIUS,
            peg_radius: PEG_RADIUS,
            gravity: GRAVITY,
            bounce_factor: BOUNCE_FACTOR,
            clamp_to_walls: false,
            max_flight_ticks: MAX_FLIGHT_TICKS,

            peg_rows: PEG_ROWS,
            peg_cols: PEG_COLS,
            row_spacing: PEG_ROW_SPACING,
            top_offset: PEG_TOP_OFFSET,

            slot_count: SLOT_COUNT,
            slot_bar_height: SLOT_BAR_HEIGHT,
            multipliers: MultiplierPolicy::Ascending,

            starting_score: STARTING_SCORE,
            drop_cost: DROP_COST,
            drop_spread: DROP_SPREAD,
            payout: PayoutPolicy::Flat,
        }
    }
}

impl Settings {
    /// Create settings for a named board variant
    pub fn from_preset(preset: BoardPreset) -> Self {
        let mut settings = Self::default();
        match preset {
            BoardPreset::Classic => {}
            BoardPreset::Wide => {
                settings.slot_count = WIDE_MULTIPLIERS.len();
                settings.multipliers = MultiplierPolicy::Table(WIDE_MULTIPLIERS.to_vec());
                settings.payout = PayoutPolicy::Scaled {
                    factor: WIDE_PAYOUT_SCALE,
                };
            }
            BoardPreset::Center => {
                settings.multipliers = MultiplierPolicy::CenterWeighted {
                    edge: 0.5,
                    center: 5.0,
                };
            }
        }
        settings
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make the board meaningless
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| {
            log::warn!("Rejected settings: {}", msg);
            Err(SettingsError::Invalid(msg))
        };

        if !(self.width > 0.0 && self.height > 0.0) {
            return invalid(format!("canvas must be positive, got {}x{}", self.width, self.height));
        }
        // Termination relies on strictly positive gravity
        if !(self.gravity > 0.0) {
            return invalid(format!("gravity must be positive, got {}", self.gravity));
        }
        if !(self.ball_radius >= 0.0 && self.peg_radius >= 0.0) {
            return invalid("radii must be non-negative".to_string());
        }
        if !(self.bounce_factor >= 0.0) {
            return invalid(format!("bounce factor must be non-negative, got {}", self.bounce_factor));
        }
        if !(self.drop_spread >= 0.0) {
            return invalid(format!("drop spread must be non-negative, got {}", self.drop_spread));
        }
        if !(self.scoring_line() > 0.0) {
            return invalid(format!(
                "slot bar height {} leaves no room on a {} tall canvas",
                self.slot_bar_height, self.height
            ));
        }
        Ok(())
    }

    /// Y coordinate a ball's lower edge must pass to land
    #[inline]
    pub fn scoring_line(&self) -> f32 {
        self.height - self.slot_bar_height
    }

    /// Ball spawn point (top center)
    #[inline]
    pub fn spawn_point(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.ball_radius)
    }
}
