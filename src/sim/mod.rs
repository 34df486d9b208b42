//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per host frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod landing;
pub mod layout;
pub mod ledger;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_peg_collision, peg_impulse, reflect_off_walls};
pub use landing::{Landing, PayoutPolicy, slot_index};
pub use layout::{FieldLayout, MultiplierPolicy, Peg, Slot};
pub use ledger::{DropError, Ledger};
pub use state::{Ball, BallState, GameEvent, GameState};
pub use tick::{run_until_settled, step_ball, tick};
