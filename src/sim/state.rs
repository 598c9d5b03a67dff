//! Game state and core simulation types
//!
//! Everything the per-frame update pass reads and mutates lives here. The
//! world is rebuilt by the level loader on every (re)load and owned by a
//! single thread; entity updates mutate it in place in a fixed order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::rect::Rect;
use crate::consts::*;
use crate::elapsed_since;

/// Ball velocity: components plus the nominal speed and widest bat-bounce
/// angle. Speed-changing effects rescale the components so the current
/// direction is kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    /// Nominal magnitude used for bat bounces (pixels per frame)
    pub speed: f32,
    /// Widest bounce angle off the bat, radians
    pub max_angle: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            speed: BALL_SPEED,
            max_angle: MAX_BOUNCE_ANGLE,
        }
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Redirect off the bat: angle proportional to the contact position,
    /// magnitude `speed`, always upward.
    pub fn bounce_off_bat(&mut self, hit_pos: f32) {
        let v = collision::bounce_velocity(hit_pos, self.speed, self.max_angle);
        self.x = v.x;
        self.y = v.y;
    }

    /// Change the nominal speed, rescaling the live components to the new
    /// magnitude without altering direction.
    pub fn set_speed(&mut self, speed: f32) {
        let dir = self.as_vec2().normalize_or_zero();
        if dir != Vec2::ZERO {
            self.x = dir.x * speed;
            self.y = dir.y * speed;
        }
        self.speed = speed;
    }
}

/// Ball state - riding the bat or free-moving. Stuck -> Free is one-way
/// per life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Attached to the bat; releases on fire input or after
    /// [`STICKY_RELEASE_MS`] measured from `since_ms`
    Stuck { since_ms: u64 },
    /// Velocity-driven
    Free,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub rect: Rect,
    /// Rect at the start of the last integration step, for reflection-axis
    /// resolution against tiles
    pub prev_rect: Rect,
    pub vel: Velocity,
    pub state: BallState,
    /// Pierces tiles without reflecting
    pub is_fireball: bool,
}

impl Ball {
    /// A serve ball: stuck to the bat, primed with the opening diagonal it
    /// will take when released.
    pub fn new_stuck(id: u32, rect: Rect, now_ms: u64) -> Self {
        Self {
            id,
            rect,
            prev_rect: rect,
            vel: Velocity::new(BALL_SPEED * 0.6, -BALL_SPEED),
            state: BallState::Stuck { since_ms: now_ms },
            is_fireball: false,
        }
    }

    #[inline]
    pub fn is_stuck(&self) -> bool {
        matches!(self.state, BallState::Stuck { .. })
    }

    /// One-way transition to free motion
    pub fn release(&mut self) {
        if self.is_stuck() {
            log::debug!("ball {} released", self.id);
            self.state = BallState::Free;
        }
    }

    /// Auto-release once the attach duration has elapsed
    pub fn check_sticky_timer(&mut self, now_ms: u64) {
        if let BallState::Stuck { since_ms } = self.state
            && elapsed_since(since_ms, now_ms) >= STICKY_RELEASE_MS
        {
            self.release();
        }
    }

    /// Ride the bat: centered on its width, resting on its top edge
    pub fn follow_bat(&mut self, bat: &Bat) {
        self.rect.x = bat.rect.x + bat.rect.w / 2.0;
        self.rect.y = bat.rect.y - self.rect.h;
        self.prev_rect = self.rect;
    }

    /// A multi-ball clone: half this ball's size, free from the start,
    /// horizontal speed `vx` (sign supplied by the caller).
    pub fn split_clone(&self, id: u32, vx: f32) -> Self {
        let rect = self.rect.scaled_about_center(0.5);
        Self {
            id,
            rect,
            prev_rect: rect,
            vel: Velocity {
                x: vx,
                y: self.vel.y,
                ..self.vel
            },
            state: BallState::Free,
            is_fireball: self.is_fireball,
        }
    }
}

/// Bat skins; each carries its own animation frame list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatSkin {
    #[default]
    Normal,
    Magnet,
    Bullets,
}

impl BatSkin {
    /// Number of animation frames in this skin's sprite list
    pub fn frame_count(&self) -> usize {
        match self {
            BatSkin::Normal => 3,
            BatSkin::Magnet => 1,
            BatSkin::Bullets => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatSkin::Normal => "normal",
            BatSkin::Magnet => "magnet",
            BatSkin::Bullets => "bullets",
        }
    }
}

/// Bat size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatSize {
    #[default]
    Normal,
    Big,
    Small,
}

impl BatSize {
    /// Dimension multiplier relative to the level's base bat size
    pub fn scale(&self) -> f32 {
        match self {
            BatSize::Normal => 1.0,
            BatSize::Big => BAT_BIG_SCALE,
            BatSize::Small => BAT_SMALL_SCALE,
        }
    }
}

/// The player's bat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bat {
    pub rect: Rect,
    /// Base dimensions from the level definition; size morphs multiply these
    pub base_w: f32,
    pub base_h: f32,
    /// Horizontal velocity goal, pixels per second (signed)
    pub velocity_goal: f32,
    /// Movement bounds for the rect's left edge
    pub min_x: f32,
    pub max_x: f32,
    pub skin: BatSkin,
    pub size: BatSize,
    /// Current animation frame index into the skin's frame list
    pub frame: usize,
    pub last_frame_ms: u64,
    pub last_shot_ms: u64,
    fire_was_down: bool,
}

impl Bat {
    pub fn new(rect: Rect, screen_width: f32, now_ms: u64) -> Self {
        Self {
            rect,
            base_w: rect.w,
            base_h: rect.h,
            velocity_goal: 0.0,
            min_x: BAT_EDGE_MARGIN,
            max_x: screen_width - BAT_EDGE_MARGIN,
            skin: BatSkin::default(),
            size: BatSize::default(),
            frame: 0,
            last_frame_ms: now_ms,
            last_shot_ms: 0,
            fire_was_down: false,
        }
    }

    /// Set the velocity goal from the directional input flags
    pub fn steer(&mut self, left: bool, right: bool) {
        self.velocity_goal = if left {
            -BAT_SPEED
        } else if right {
            BAT_SPEED
        } else {
            0.0
        };
    }

    /// Integrate horizontal motion and clamp to the movement bounds
    pub fn integrate(&mut self, dt: f32) {
        self.rect.x += self.velocity_goal * dt;
        let upper = (self.max_x - self.rect.w).max(self.min_x);
        self.rect.x = self.rect.x.clamp(self.min_x, upper);
    }

    /// Morph to a size class, scaling the base dimensions and preserving the
    /// top-left anchor. Reapplying the current class is a no-op shape-wise.
    pub fn set_size(&mut self, size: BatSize) {
        self.size = size;
        let scale = size.scale();
        self.rect = self.rect.resized(self.base_w * scale, self.base_h * scale);
    }

    /// Swap the active skin, resetting the animation frame index
    pub fn set_skin(&mut self, skin: BatSkin) {
        self.skin = skin;
        self.frame = 0;
    }

    /// Bullets can only be fired with the bullets skin
    #[inline]
    pub fn fire_unlocked(&self) -> bool {
        self.skin == BatSkin::Bullets
    }

    /// Cycle the animation frame on a fixed wall-clock delay, independent of
    /// movement
    pub fn advance_animation(&mut self, now_ms: u64) {
        if elapsed_since(self.last_frame_ms, now_ms) >= BAT_FRAME_DELAY_MS {
            self.frame = (self.frame + 1) % self.skin.frame_count();
            self.last_frame_ms = now_ms;
        }
    }

    /// Track the fire flag and report whether a volley fires this frame:
    /// requires a press edge, the bullets skin, and an elapsed cooldown.
    pub fn poll_fire(&mut self, fire_down: bool, now_ms: u64) -> bool {
        let edge = fire_down && !self.fire_was_down;
        self.fire_was_down = fire_down;
        if !edge || !self.fire_unlocked() {
            return false;
        }
        if elapsed_since(self.last_shot_ms, now_ms) < BULLET_COOLDOWN_MS {
            return false;
        }
        self.last_shot_ms = now_ms;
        true
    }

    /// Spawn rects for a volley: one bullet per bat edge, half the bat's
    /// height, sitting on its top edge.
    pub fn bullet_spawn_rects(&self) -> [Rect; 2] {
        let h = self.rect.h * 0.5;
        let y = self.rect.y - h;
        [
            Rect::new(self.rect.x, y, BULLET_WIDTH, h),
            Rect::new(self.rect.right() - BULLET_WIDTH, y, BULLET_WIDTH, h),
        ]
    }
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerKind {
    BigBat,
    SmallBat,
    BulletsBat,
    MagnetBat,
    FireBall,
    FastBall,
    SlowBall,
    MultiBall,
}

impl PowerKind {
    /// The full catalog, for uniform sampling at load time
    pub const ALL: [PowerKind; 8] = [
        PowerKind::BigBat,
        PowerKind::SmallBat,
        PowerKind::BulletsBat,
        PowerKind::MagnetBat,
        PowerKind::FireBall,
        PowerKind::FastBall,
        PowerKind::SlowBall,
        PowerKind::MultiBall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerKind::BigBat => "big_bat",
            PowerKind::SmallBat => "small_bat",
            PowerKind::BulletsBat => "bullets_bat",
            PowerKind::MagnetBat => "magnet_bat",
            PowerKind::FireBall => "fire_ball",
            PowerKind::FastBall => "fast_ball",
            PowerKind::SlowBall => "slow_ball",
            PowerKind::MultiBall => "multi_ball",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

/// A tile (brick) in the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    /// Sprite identifier from the level matrix
    pub sprite: String,
    pub rect: Rect,
    /// 1 for normal tiles, 2 for double-hit tiles; 0 means broken
    pub hits_remaining: u8,
    /// Power-up released when this tile breaks
    pub power: Option<PowerKind>,
}

impl Tile {
    pub fn new(id: u32, sprite: String, rect: Rect, double_hit: bool) -> Self {
        Self {
            id,
            sprite,
            rect,
            hits_remaining: if double_hit { 2 } else { 1 },
            power: None,
        }
    }

    /// Register one collision. The counter decrements by exactly one and
    /// never underflows. Returns true when this hit broke the tile.
    pub fn register_hit(&mut self) -> bool {
        let was_intact = self.hits_remaining > 0;
        self.hits_remaining = self.hits_remaining.saturating_sub(1);
        was_intact && self.hits_remaining == 0
    }

    #[inline]
    pub fn is_broken(&self) -> bool {
        self.hits_remaining == 0
    }

    /// Rect a power-up released by this tile occupies: 60% of the tile,
    /// centered on it.
    pub fn power_spawn_rect(&self) -> Rect {
        self.rect.scaled_about_center(POWER_SIZE_FRACTION)
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Power {
    pub id: u32,
    pub kind: PowerKind,
    pub rect: Rect,
}

impl Power {
    /// Constant downward drift
    pub fn fall(&mut self, dt: f32) {
        self.rect.y += POWER_FALL_SPEED * dt;
    }
}

/// A bat-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub rect: Rect,
}

impl Bullet {
    /// Fixed upward climb
    pub fn rise(&mut self, dt: f32) {
        self.rect.y -= BULLET_SPEED * dt;
    }
}

/// The three static play boundary rectangles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Walls {
    pub left: Rect,
    pub right: Rect,
    pub top: Rect,
}

impl Walls {
    /// Fixed screen-fraction margins: 2% side widths, 2% top height
    pub fn from_screen(width: f32, height: f32) -> Self {
        let side = width * WALL_SIDE_FRACTION;
        Self {
            left: Rect::new(0.0, 0.0, side, height),
            right: Rect::new(width - side, 0.0, side, height),
            top: Rect::new(0.0, 0.0, width, height * WALL_TOP_FRACTION),
        }
    }
}

/// Background identifiers the level hands to the collaborators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Backdrop {
    pub music: String,
    pub image: String,
}

/// Complete game state - the shared mutable world
///
/// Created by the level loader, mutated in place by [`super::tick`], and
/// rebuilt wholesale on level (re)load. The bat is an `Option` because it can
/// legitimately be absent between levels; every consumer guards on that
/// instead of assuming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Current level index (1-based, matches the level file naming)
    pub level_index: u32,
    pub paused: bool,
    pub walls: Walls,
    pub backdrop: Backdrop,
    pub bat: Option<Bat>,
    pub balls: Vec<Ball>,
    pub tiles: Vec<Tile>,
    pub powers: Vec<Power>,
    pub bullets: Vec<Bullet>,
    next_id: u32,
}

impl GameState {
    /// An empty world with walls in place. The level loader populates it.
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            screen_width,
            screen_height,
            level_index: 0,
            paused: false,
            walls: Walls::from_screen(screen_width, screen_height),
            backdrop: Backdrop::default(),
            bat: None,
            balls: Vec::new(),
            tiles: Vec::new(),
            powers: Vec::new(),
            bullets: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Explicit pause transition; no setter side effects
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!(
            "game {}",
            if self.paused { "paused" } else { "resumed" }
        );
    }

    /// Spawn a serve ball stuck to the bat (or at `rect` if no bat exists)
    pub fn spawn_ball_stuck(&mut self, rect: Rect, now_ms: u64) {
        let id = self.next_entity_id();
        let mut ball = Ball::new_stuck(id, rect, now_ms);
        if let Some(bat) = &self.bat {
            ball.follow_bat(bat);
        }
        self.balls.push(ball);
    }
}
