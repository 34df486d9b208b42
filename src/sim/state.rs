//! Board state and core simulation types
//!
//! One `GameState` owns everything the simulation touches; nothing is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::landing::{self, Landing};
use super::layout::{FieldLayout, Peg, Slot};
use super::ledger::{DropError, Ledger};
use crate::settings::Settings;
use crate::stats::LandingStats;

/// Ball lifecycle: `Falling -> Landed` (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    Falling,
    /// Scored; removed from the board at the end of the tick
    Landed { slot: usize },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Ticks spent in flight
    #[serde(default)]
    pub age_ticks: u32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            state: BallState::Falling,
            age_ticks: 0,
        }
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.state == BallState::Falling
    }
}

/// Things that happened during a tick or drop, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Dropped { ball_id: u32 },
    DropRefused { balance: u64, cost: u64 },
    Landed { ball_id: u32, slot: usize, payout: u64 },
}

/// Complete board state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub settings: Settings,
    /// Static pegs and slots
    pub layout: FieldLayout,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    pub ledger: Ledger,
    pub stats: LandingStats,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events, drained by the host
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a board with a seeded RNG
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut state = Self::with_rng(settings, Pcg32::seed_from_u64(seed));
        state.seed = seed;
        state
    }

    /// Create a board with an injected RNG (used for layout and drop spread)
    pub fn with_rng(settings: Settings, mut rng: Pcg32) -> Self {
        let layout = FieldLayout::build(&settings, &mut rng);
        let ledger = Ledger::new(settings.starting_score, settings.drop_cost);
        let stats = LandingStats::new(layout.slots.len());
        log::info!(
            "New board: score {}, drop cost {}, payout {:?}",
            settings.starting_score,
            settings.drop_cost,
            settings.payout
        );
        Self {
            seed: 0,
            settings,
            layout,
            balls: Vec::new(),
            ledger,
            stats,
            time_ticks: 0,
            events: Vec::new(),
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Pay the drop cost and admit a ball at the top center
    ///
    /// A refused drop changes neither the score nor the active balls.
    pub fn drop_ball(&mut self) -> Result<u32, DropError> {
        if let Err(err) = self.ledger.debit_drop() {
            let DropError::InsufficientScore { balance, cost } = err;
            log::warn!("Drop refused: score {} < cost {}", balance, cost);
            self.events.push(GameEvent::DropRefused { balance, cost });
            return Err(err);
        }

        let spread = self.settings.drop_spread;
        let vx = (self.rng.random::<f32>() - 0.5) * 2.0 * spread;
        let id = self.next_entity_id();
        let ball = Ball::new(id, self.settings.spawn_point(), Vec2::new(vx, 0.0), self.settings.ball_radius);
        log::debug!("Dropped ball {} with vx {:.3}", id, vx);

        self.balls.push(ball);
        self.stats.record_drop();
        self.events.push(GameEvent::Dropped { ball_id: id });
        Ok(id)
    }

    /// Score a ball that crossed the floor line
    ///
    /// Credits at most once per ball: a ball already `Landed` returns None.
    pub fn resolve_landing(&mut self, ball_index: usize) -> Option<Landing> {
        let ball = self.balls.get_mut(ball_index)?;
        if !ball.is_falling() {
            return None;
        }
        let landing = landing::resolve(
            &self.layout.slots,
            ball.pos.x,
            self.settings.payout,
            self.ledger.drop_cost(),
        )?;
        ball.state = BallState::Landed { slot: landing.slot };
        let ball_id = ball.id;

        self.ledger.credit(landing.payout);
        self.stats.record_landing(landing.slot, landing.payout);
        self.events.push(GameEvent::Landed {
            ball_id,
            slot: landing.slot,
            payout: landing.payout,
        });
        log::debug!(
            "Ball {} landed in slot {} ({}x) for {}",
            ball_id,
            landing.slot,
            landing.multiplier,
            landing.payout
        );
        Some(landing)
    }

    /// Drop landed balls from the active set
    pub fn remove_landed(&mut self) -> usize {
        let before = self.balls.len();
        self.balls.retain(Ball::is_falling);
        before - self.balls.len()
    }

    /// Current score
    #[inline]
    pub fn score(&self) -> u64 {
        self.ledger.balance()
    }

    #[inline]
    pub fn stats(&self) -> &LandingStats {
        &self.stats
    }

    #[inline]
    pub fn pegs(&self) -> &[Peg] {
        &self.layout.pegs
    }

    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.layout.slots
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
