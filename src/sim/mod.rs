//! Deterministic gameplay simulation
//!
//! Pure state-in, state-out: no windowing, rendering or mixing. The host
//! calls [`tick`] once per frame with an input snapshot, a frame delta and a
//! wall-clock timestamp; every timer and random draw flows from those
//! inputs, so a fake clock and a fixed seed replay identically.

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::Axis;
pub use rect::Rect;
pub use state::{
    Backdrop, Ball, BallState, Bat, BatSize, BatSkin, Bullet, GameState, Power, PowerKind, Tile,
    Velocity, Walls,
};
pub use tick::{InputState, TickOutcome, tick};
