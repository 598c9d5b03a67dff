//! Brickfall - an arcade brick-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `level`: JSON level definitions and world construction
//! - `audio`: Sound-trigger interface for the audio collaborator
//! - `render`: Draw-list interface for the rendering collaborator
//! - `settings`: Player preferences
//!
//! The crate owns no window, renderer or mixer. A host drives it by feeding
//! an [`sim::InputState`] snapshot plus a wall-clock timestamp into
//! [`sim::tick`] every frame and consuming [`render::draw_list`] afterwards.

pub mod audio;
pub mod level;
pub mod render;
pub mod settings;
pub mod sim;

pub use level::LevelDef;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate for velocity normalization. Ball velocities are
    /// expressed in pixels per frame at this rate; integration multiplies by
    /// `dt * FRAME_RATE` so behavior is identical across refresh rates.
    pub const FRAME_RATE: f32 = 60.0;
    /// Largest dt a single update will accept (frame hitch protection)
    pub const MAX_FRAME_DT: f32 = 0.15;

    /// Bat defaults
    pub const BAT_SPEED: f32 = 660.0;
    pub const BAT_EDGE_MARGIN: f32 = 2.0;
    pub const BAT_BIG_SCALE: f32 = 1.5;
    pub const BAT_SMALL_SCALE: f32 = 0.6;
    /// Wall-clock delay between bat animation frames
    pub const BAT_FRAME_DELAY_MS: u64 = 50;
    /// Minimum wall-clock gap between bullet volleys
    pub const BULLET_COOLDOWN_MS: u64 = 100;

    /// Ball defaults (speed is pixels per frame at FRAME_RATE)
    pub const BALL_SPEED: f32 = 12.0;
    /// Widest bounce angle off the bat, radians (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Stuck balls auto-release after this long on the bat
    pub const STICKY_RELEASE_MS: u64 = 2000;

    /// Power-up fall speed, pixels per second
    pub const POWER_FALL_SPEED: f32 = 310.0;
    /// Spawned power-up size as a fraction of its tile
    pub const POWER_SIZE_FRACTION: f32 = 0.6;
    /// Speed effect multipliers (applied to the nominal BALL_SPEED)
    pub const FAST_BALL_SCALE: f32 = 1.9;
    pub const SLOW_BALL_SCALE: f32 = 0.5;
    /// Horizontal speed of multi-ball clones relative to nominal
    pub const MULTI_BALL_VX_SCALE: f32 = 0.8;

    /// Bullet climb speed, pixels per second
    pub const BULLET_SPEED: f32 = 540.0;
    pub const BULLET_WIDTH: f32 = 5.0;

    /// Play-area margins as screen fractions
    pub const BOUNDS_LEFT_FRACTION: f32 = 0.01;
    pub const BOUNDS_RIGHT_FRACTION: f32 = 0.98;
    pub const BOUNDS_TOP_FRACTION: f32 = 0.05;

    /// Wall rectangle fractions (left/right width, top height)
    pub const WALL_SIDE_FRACTION: f32 = 0.02;
    pub const WALL_TOP_FRACTION: f32 = 0.02;

    /// Gap between tile cells as a fraction of the cell
    pub const TILE_GAP_FRACTION: f32 = 0.08;

    /// Placement defaults (screen fractions) when a level omits them
    pub const DEFAULT_BAT_PLACEMENT: (f32, f32) = (0.45, 0.93);
    pub const DEFAULT_BAT_DIMS: (f32, f32) = (0.09, 0.025);
    pub const DEFAULT_BALL_PLACEMENT: (f32, f32) = (0.5, 0.92);
    pub const DEFAULT_BALL_DIMS: (f32, f32) = (0.007, 0.007);
}

/// Milliseconds elapsed between two timestamps, saturating at zero so a
/// caller handing in an older clock never underflows.
#[inline]
pub fn elapsed_since(earlier_ms: u64, now_ms: u64) -> u64 {
    now_ms.saturating_sub(earlier_ms)
}
