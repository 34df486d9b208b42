//! Collision detection and response for pegs and side walls
//!
//! Peg contact is a crude repulsion impulse, not an elastic bounce: no energy
//! is conserved and no position correction is applied, so a ball that stays
//! overlapped keeps getting pushed on consecutive ticks.

use glam::Vec2;

use super::layout::Peg;

/// Result of a peg contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a contact occurred
    pub hit: bool,
    /// Angle from peg center to ball center (radians, screen coordinates)
    pub angle: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            angle: 0.0,
        }
    }
}

/// Check contact between a ball and a peg
pub fn ball_peg_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    peg: &Peg,
    peg_radius: f32,
) -> CollisionResult {
    let d = ball_pos - peg.pos;
    let distance = d.length();
    let reach = ball_radius + peg_radius;

    if distance < reach {
        return CollisionResult {
            hit: true,
            angle: d.y.atan2(d.x),
        };
    }

    CollisionResult::miss()
}

/// Velocity change for a peg contact at `angle`
///
/// `vx += bounce * cos(angle)`, `vy -= bounce * sin(angle)`
#[inline]
pub fn peg_impulse(angle: f32, bounce_factor: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin()) * bounce_factor
}

/// Reflect horizontal velocity off the side walls
///
/// Only flips when the ball is outside a wall and still heading further out,
/// so a ball that overshoots by more than one tick of travel cannot get stuck
/// flipping back and forth beyond the wall.
/// Returns true if the ball was reflected.
pub fn reflect_off_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, width: f32, clamp: bool) -> bool {
    let past_left = pos.x - radius < 0.0;
    let past_right = pos.x + radius > width;

    let reflected = (past_left && vel.x < 0.0) || (past_right && vel.x > 0.0);
    if reflected {
        vel.x = -vel.x;
    }

    if clamp {
        if past_left {
            pos.x = radius.min(width / 2.0);
        } else if past_right {
            pos.x = (width - radius).max(width / 2.0);
        }
    }

    reflected
}

/// Check if the ball's lower edge has passed the scoring line
#[inline]
pub fn ball_crossed_floor(ball_pos: Vec2, ball_radius: f32, scoring_line: f32) -> bool {
    ball_pos.y + ball_radius > scoring_line
}
