//! Collision detection and response
//!
//! The part that makes a brick-breaker feel right: deciding which axis a
//! ball reflects on when it clips a tile, and turning a bat contact point
//! into a bounce angle instead of a mirror reflection.

use glam::Vec2;

use super::rect::Rect;

/// Reflection axis resolved from a tile contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Decide which velocity component a ball reflects when it overlaps `tile`.
///
/// Uses the ball's *previous-frame* rect: if the ball was entirely to the
/// left or right of the tile last frame it approached horizontally (reflect
/// x); if it was entirely above or below, vertically (reflect y). Returns
/// `None` when the previous rect already overlapped the tile on both axes,
/// which can happen after a teleporting effect; callers treat that as no
/// reflection rather than guessing.
pub fn reflection_axis(prev: &Rect, tile: &Rect) -> Option<Axis> {
    if prev.right() <= tile.left() || prev.left() >= tile.right() {
        Some(Axis::X)
    } else if prev.bottom() <= tile.top() || prev.top() >= tile.bottom() {
        Some(Axis::Y)
    } else {
        None
    }
}

/// Normalized horizontal contact position of a ball on the bat.
///
/// -1 at the bat's left edge, 0 dead center, +1 at the right edge, clamped.
pub fn bat_hit_pos(ball: &Rect, bat: &Rect) -> f32 {
    let half_width = bat.w / 2.0;
    if half_width <= f32::EPSILON {
        return 0.0;
    }
    ((ball.center().x - bat.center().x) / half_width).clamp(-1.0, 1.0)
}

/// Velocity after a bat bounce: angle proportional to the contact position,
/// magnitude `speed`, always directed upward.
pub fn bounce_velocity(hit_pos: f32, speed: f32, max_angle: f32) -> Vec2 {
    let angle = hit_pos * max_angle;
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}
