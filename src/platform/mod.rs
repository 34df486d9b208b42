//! Platform abstraction layer
//!
//! `Session` is what a host drives: it queues drop requests from input events
//! and runs one simulation tick per display frame. On wasm32 it is wrapped in
//! a `wasm_bindgen` handle for the browser page.

use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};

/// Input collected between frames
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Drop requests (clicks or key presses) since the last frame
    pub drops: u32,
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub admitted: u32,
    pub refused: u32,
    pub landed: usize,
    pub events: Vec<GameEvent>,
}

/// A running board driven by a host's frame callback
#[derive(Debug, Clone)]
pub struct Session {
    pub state: GameState,
    input: FrameInput,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            state: GameState::new(settings, seed),
            input: FrameInput::default(),
        }
    }

    /// Queue a drop for the start of the next frame
    ///
    /// Returns false, and queues nothing, when the score left after the drops
    /// already queued this frame cannot cover one more. Credits only arrive
    /// during a tick, after queued drops are paid, so an accepted request is
    /// always admitted.
    pub fn request_drop(&mut self) -> bool {
        let ledger = &self.state.ledger;
        let pending = u64::from(self.input.drops).saturating_mul(ledger.drop_cost());
        let affordable = ledger
            .balance()
            .checked_sub(pending)
            .is_some_and(|left| left >= ledger.drop_cost());
        if !affordable {
            log::debug!(
                "Drop request refused: score {} with {} drops queued",
                ledger.balance(),
                self.input.drops
            );
            return false;
        }
        self.input.drops = self.input.drops.saturating_add(1);
        true
    }

    /// Drops waiting for the next frame
    #[inline]
    pub fn queued_drops(&self) -> u32 {
        self.input.drops
    }

    /// Apply queued drops, then advance every ball one tick
    pub fn frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        let drops = std::mem::take(&mut self.input).drops;
        for _ in 0..drops {
            match self.state.drop_ball() {
                Ok(_) => report.admitted += 1,
                Err(_) => report.refused += 1,
            }
        }

        report.landed = tick(&mut self.state);
        report.events = self.state.drain_events();
        report
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.state.score()
    }

    /// Ball centers flattened as `[x0, y0, x1, y1, ...]`
    pub fn ball_positions(&self) -> Vec<f32> {
        self.state
            .balls
            .iter()
            .flat_map(|b| [b.pos.x, b.pos.y])
            .collect()
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use super::Session;
    use crate::settings::{BoardPreset, Settings};

    /// Browser handle. The page calls `drop_ball` from its click/key
    /// listeners and `frame` from `requestAnimationFrame`.
    #[wasm_bindgen]
    pub struct PegDrop {
        session: Session,
    }

    #[wasm_bindgen]
    impl PegDrop {
        /// Create a board from a preset name ("classic", "wide", "center")
        #[wasm_bindgen(constructor)]
        pub fn new(preset: &str) -> PegDrop {
            let preset = BoardPreset::from_str(preset).unwrap_or_default();
            let seed = js_sys::Date::now() as u64;
            log::info!("Peg Drop starting: {} board, seed {}", preset.as_str(), seed);
            PegDrop {
                session: Session::new(Settings::from_preset(preset), seed),
            }
        }

        /// Create a board from settings JSON
        pub fn from_json(json: &str, seed: u64) -> Result<PegDrop, JsValue> {
            let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(PegDrop {
                session: Session::new(settings, seed),
            })
        }

        /// Queue a drop for the next frame; false if the score cannot cover
        /// it on top of the drops already queued
        pub fn drop_ball(&mut self) -> bool {
            self.session.request_drop()
        }

        /// Advance one frame; returns the number of balls that landed
        pub fn frame(&mut self) -> u32 {
            let report = self.session.frame();
            if report.refused > 0 {
                log::warn!("{} queued drops refused", report.refused);
            }
            report.landed as u32
        }

        /// Current score (JS numbers are f64; scores stay far below 2^53)
        pub fn score(&self) -> f64 {
            self.session.score() as f64
        }

        pub fn ball_positions(&self) -> Vec<f32> {
            self.session.ball_positions()
        }

        pub fn ball_radius(&self) -> f32 {
            self.session.state.settings.ball_radius
        }

        /// Peg centers flattened as `[x0, y0, ...]`
        pub fn peg_positions(&self) -> Vec<f32> {
            self.session
                .state
                .pegs()
                .iter()
                .flat_map(|p| [p.pos.x, p.pos.y])
                .collect()
        }

        pub fn slot_multipliers(&self) -> Vec<f32> {
            self.session.state.slots().iter().map(|s| s.multiplier).collect()
        }

        /// Landing share per slot, in percent
        pub fn slot_percentages(&self) -> Vec<f32> {
            let stats = self.session.state.stats();
            (0..stats.per_slot.len()).map(|i| stats.percentage(i)).collect()
        }

        pub fn total_landed(&self) -> f64 {
            self.session.state.stats().total_landed as f64
        }
    }

    #[wasm_bindgen(start)]
    pub fn wasm_main() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            // Logger already installed by an earlier module instance
            return;
        }
        log::info!("Peg Drop module loaded");
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::PegDrop;
