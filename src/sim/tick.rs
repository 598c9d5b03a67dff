//! Per-frame update pass
//!
//! One call to [`tick`] advances the whole world by one frame in a fixed
//! order: bat -> balls -> tile sweep -> power-ups -> bullets -> tile sweep.
//! The order matters: tiles are decremented from inside the ball pass,
//! power-ups spawn from the tile sweep, and power-up effects mutate the bat
//! and ball pools, so reordering changes observable behavior.
//!
//! Movement is dt-scaled; timers (sticky release, animation, bullet
//! cooldown) compare elapsed milliseconds against the injected `now_ms`.
//! Both models coexist deliberately - a fake clock makes every timer
//! deterministic under test while dt keeps motion frame-rate independent.

use glam::Vec2;

use super::collision::{self, Axis};
use super::state::{Ball, Bullet, GameState, Power, PowerKind, Tile, Walls};
use crate::audio::{SoundId, SoundSink};
use crate::consts::*;

/// Input snapshot for a single frame
///
/// The core only reads this; the windowing collaborator owns the event pump
/// and mutates the snapshot through the explicit transition methods so that
/// opposite directions can never be held simultaneously.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub confirm: bool,
    pub mouse_down: bool,
    pub mouse_pos: Vec2,
}

impl InputState {
    /// Pressing left clears right; the pair is mutually exclusive
    pub fn press_left(&mut self) {
        self.left = true;
        self.right = false;
    }

    pub fn release_left(&mut self) {
        self.left = false;
    }

    /// Pressing right clears left
    pub fn press_right(&mut self) {
        self.right = true;
        self.left = false;
    }

    pub fn release_right(&mut self) {
        self.right = false;
    }

    pub fn press_up(&mut self) {
        self.up = true;
        self.down = false;
    }

    pub fn release_up(&mut self) {
        self.up = false;
    }

    pub fn press_down(&mut self) {
        self.down = true;
        self.up = false;
    }

    pub fn release_down(&mut self) {
        self.down = false;
    }

    pub fn set_fire(&mut self, down: bool) {
        self.fire = down;
    }

    pub fn set_confirm(&mut self, down: bool) {
        self.confirm = down;
    }

    pub fn set_mouse(&mut self, pos: Vec2, down: bool) {
        self.mouse_pos = pos;
        self.mouse_down = down;
    }
}

/// What a single update observed; life counting and level progression are
/// the caller's job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The ball pool drained during this update
    pub round_lost: bool,
    /// The tile set drained during this update
    pub level_cleared: bool,
}

/// Advance the game state by one frame.
///
/// `dt` is the frame delta in seconds (clamped to [`MAX_FRAME_DT`]);
/// `now_ms` is the caller's wall clock, used for every timer so tests can
/// supply a fake one. Sounds fire through `sounds` as they happen.
pub fn tick(
    state: &mut GameState,
    input: &InputState,
    dt: f32,
    now_ms: u64,
    sounds: &mut dyn SoundSink,
) -> TickOutcome {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    if state.paused {
        return TickOutcome::default();
    }

    let had_balls = !state.balls.is_empty();
    let had_tiles = !state.tiles.is_empty();

    update_bat(state, input, dt, now_ms, sounds);
    update_balls(state, input, dt, now_ms, sounds);
    sweep_broken_tiles(state);
    update_powers(state, dt, sounds);
    update_bullets(state, dt);
    sweep_broken_tiles(state);

    TickOutcome {
        round_lost: had_balls && state.balls.is_empty(),
        level_cleared: had_tiles && state.tiles.is_empty(),
    }
}

/// Bat pass: steering, integration, animation, bullet volleys
fn update_bat(
    state: &mut GameState,
    input: &InputState,
    dt: f32,
    now_ms: u64,
    sounds: &mut dyn SoundSink,
) {
    let mut volley = None;
    if let Some(bat) = state.bat.as_mut() {
        bat.steer(input.left, input.right);
        bat.integrate(dt);
        bat.advance_animation(now_ms);
        if bat.poll_fire(input.fire, now_ms) {
            volley = Some(bat.bullet_spawn_rects());
        }
    }

    if let Some(rects) = volley {
        sounds.trigger(SoundId::BulletFire);
        for rect in rects {
            let id = state.next_entity_id();
            state.bullets.push(Bullet { id, rect });
        }
    }
}

/// Ball pass, in the fixed per-ball order:
/// sticky timer -> integrate/follow -> bounds -> bat bounce -> fire release
/// -> tile collision -> death cull.
fn update_balls(
    state: &mut GameState,
    input: &InputState,
    dt: f32,
    now_ms: u64,
    sounds: &mut dyn SoundSink,
) {
    let GameState {
        bat,
        balls,
        tiles,
        walls,
        screen_width,
        screen_height,
        ..
    } = &mut *state;
    let (sw, sh) = (*screen_width, *screen_height);

    for ball in balls.iter_mut() {
        ball.check_sticky_timer(now_ms);

        if ball.is_stuck() {
            if let Some(bat) = bat.as_ref() {
                ball.follow_bat(bat);
            }
        } else {
            ball.prev_rect = ball.rect;
            let step = dt * FRAME_RATE;
            ball.rect.x += ball.vel.x * step;
            ball.rect.y += ball.vel.y * step;
        }

        bounds_check(ball, walls, sw, sh);

        // Bat bounce, only while the ball is inside the play area vertically
        if !ball.is_stuck()
            && let Some(bat) = bat.as_ref()
            && ball.rect.y < sh
            && ball.rect.intersects(&bat.rect)
        {
            let hit_pos = collision::bat_hit_pos(&ball.rect, &bat.rect);
            ball.vel.bounce_off_bat(hit_pos);
        }

        if input.fire {
            ball.release();
        }

        tile_collision(ball, tiles, sounds);
    }

    // Death check: below the screen means gone this same update
    balls.retain(|b| b.rect.y < sh);
}

/// Reflect off the play-area margins and the wall rectangles. Reflections
/// force the sign rather than flipping it so a ball that ends up past a
/// margin cannot jitter against it.
fn bounds_check(ball: &mut Ball, walls: &Walls, sw: f32, sh: f32) {
    if ball.rect.x <= sw * BOUNDS_LEFT_FRACTION || ball.rect.intersects(&walls.left) {
        ball.vel.x = ball.vel.x.abs();
    } else if ball.rect.right() >= sw * BOUNDS_RIGHT_FRACTION || ball.rect.intersects(&walls.right)
    {
        ball.vel.x = -ball.vel.x.abs();
    }
    if ball.rect.y <= sh * BOUNDS_TOP_FRACTION || ball.rect.intersects(&walls.top) {
        ball.vel.y = ball.vel.y.abs();
    }
}

/// Hit the first intact tile the ball overlaps. Normal balls reflect on the
/// axis resolved from the previous-frame rect; fireballs pierce through
/// without reflecting.
fn tile_collision(ball: &mut Ball, tiles: &mut [Tile], sounds: &mut dyn SoundSink) {
    let Some(idx) = tiles
        .iter()
        .position(|t| !t.is_broken() && ball.rect.intersects(&t.rect))
    else {
        return;
    };

    let tile = &mut tiles[idx];
    tile.register_hit();
    sounds.trigger(SoundId::BrickHit);

    if ball.is_fireball {
        return;
    }
    match collision::reflection_axis(&ball.prev_rect, &tile.rect) {
        Some(Axis::X) => ball.vel.x = -ball.vel.x,
        Some(Axis::Y) => ball.vel.y = -ball.vel.y,
        // Previous rect already overlapped on both axes; let it pass rather
        // than guess a normal
        None => {}
    }
}

/// Remove broken tiles and release their attached power-ups. A broken tile
/// is dropped in the same sweep that spawns its power, so one tile can never
/// emit twice.
fn sweep_broken_tiles(state: &mut GameState) {
    let mut spawns: Vec<(PowerKind, super::rect::Rect)> = Vec::new();
    state.tiles.retain(|tile| {
        if tile.is_broken() {
            if let Some(kind) = tile.power {
                spawns.push((kind, tile.power_spawn_rect()));
            }
            false
        } else {
            true
        }
    });

    for (kind, rect) in spawns {
        log::debug!("tile released power {}", kind.as_str());
        let id = state.next_entity_id();
        state.powers.push(Power { id, kind, rect });
    }
}

/// Power-up pass: fall, collect on bat overlap, cull below the screen
fn update_powers(state: &mut GameState, dt: f32, sounds: &mut dyn SoundSink) {
    let bat_rect = state.bat.as_ref().map(|b| b.rect);
    let sh = state.screen_height;

    let mut collected: Vec<PowerKind> = Vec::new();
    state.powers.retain_mut(|power| {
        power.fall(dt);
        if let Some(bat_rect) = bat_rect
            && power.rect.intersects(&bat_rect)
        {
            collected.push(power.kind);
            false
        } else {
            power.rect.y < sh
        }
    });

    for kind in collected {
        sounds.trigger(SoundId::PowerPickup);
        apply_power(state, kind);
    }
}

/// Apply exactly one effect per collected power-up. Every arm is a no-op
/// guard when its target pool is empty; reapplying an effect that is already
/// active re-triggers the morph without changing shape.
fn apply_power(state: &mut GameState, kind: PowerKind) {
    use super::state::{BatSize, BatSkin};

    log::info!("power applied: {}", kind.as_str());
    match kind {
        PowerKind::BigBat => {
            if let Some(bat) = state.bat.as_mut() {
                bat.set_size(BatSize::Big);
            }
        }
        PowerKind::SmallBat => {
            if let Some(bat) = state.bat.as_mut() {
                bat.set_size(BatSize::Small);
            }
        }
        PowerKind::BulletsBat => {
            if let Some(bat) = state.bat.as_mut() {
                bat.set_skin(BatSkin::Bullets);
            }
        }
        PowerKind::MagnetBat => {
            if let Some(bat) = state.bat.as_mut() {
                bat.set_skin(BatSkin::Magnet);
            }
        }
        PowerKind::FireBall => {
            for ball in &mut state.balls {
                ball.is_fireball = true;
            }
        }
        PowerKind::FastBall => {
            for ball in &mut state.balls {
                ball.vel.set_speed(BALL_SPEED * FAST_BALL_SCALE);
            }
        }
        PowerKind::SlowBall => {
            for ball in &mut state.balls {
                ball.vel.set_speed(BALL_SPEED * SLOW_BALL_SCALE);
            }
        }
        PowerKind::MultiBall => {
            // Two clones per live ball with symmetric opposite x-velocity
            let parents = state.balls.clone();
            let vx = BALL_SPEED * MULTI_BALL_VX_SCALE;
            for parent in &parents {
                for sign in [1.0_f32, -1.0] {
                    let id = state.next_entity_id();
                    state.balls.push(parent.split_clone(id, sign * vx));
                }
            }
        }
    }
}

/// Bullet pass: climb, decrement the first overlapped tile, cull above the
/// top play margin
fn update_bullets(state: &mut GameState, dt: f32) {
    let GameState {
        bullets,
        tiles,
        screen_height,
        ..
    } = &mut *state;
    let top_cull = *screen_height * BOUNDS_TOP_FRACTION;

    bullets.retain_mut(|bullet| {
        bullet.rise(dt);
        let hit = tiles
            .iter_mut()
            .find(|t| !t.is_broken() && bullet.rect.intersects(&t.rect));
        if let Some(tile) = hit {
            tile.register_hit();
            false
        } else {
            bullet.rect.y > top_cull
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundQueue;
    use crate::sim::rect::Rect;
    use crate::sim::state::{BallState, Bat, BatSkin, Tile};
    use proptest::prelude::*;

    const SW: f32 = 1000.0;
    const SH: f32 = 1000.0;
    const DT: f32 = 1.0 / 60.0;

    fn world_with_bat() -> GameState {
        let mut state = GameState::new(SW, SH);
        let bat = Bat::new(Rect::new(450.0, 930.0, 100.0, 25.0), SW, 0);
        state.bat = Some(bat);
        state
    }

    fn free_ball(state: &mut GameState, rect: Rect, vx: f32, vy: f32) -> u32 {
        let id = state.next_entity_id();
        let mut ball = Ball::new_stuck(id, rect, 0);
        ball.state = BallState::Free;
        ball.vel.x = vx;
        ball.vel.y = vy;
        ball.prev_rect = rect;
        state.balls.push(ball);
        id
    }

    #[test]
    fn test_stuck_ball_follows_bat() {
        let mut state = world_with_bat();
        state.spawn_ball_stuck(Rect::new(0.0, 0.0, 14.0, 14.0), 0);
        let mut sounds = SoundQueue::default();
        let mut input = InputState::default();
        input.press_right();

        for frame in 1..=20u64 {
            tick(&mut state, &input, DT, frame * 16, &mut sounds);
            let bat = state.bat.as_ref().unwrap();
            let ball = &state.balls[0];
            assert!(ball.is_stuck());
            assert!((ball.rect.x - (bat.rect.x + bat.rect.w / 2.0)).abs() < 0.001);
            assert!((ball.rect.y - (bat.rect.y - ball.rect.h)).abs() < 0.001);
        }

        // Auto-release after the attach duration
        tick(&mut state, &input, DT, 2500, &mut sounds);
        assert!(!state.balls[0].is_stuck());
    }

    #[test]
    fn test_fire_releases_stuck_ball() {
        let mut state = world_with_bat();
        state.spawn_ball_stuck(Rect::new(0.0, 0.0, 14.0, 14.0), 0);
        let mut sounds = SoundQueue::default();
        let mut input = InputState::default();
        input.set_fire(true);

        tick(&mut state, &input, DT, 16, &mut sounds);
        assert!(!state.balls[0].is_stuck());
    }

    #[test]
    fn test_double_hit_tile_breaks_and_spawns_one_power() {
        let mut state = GameState::new(SW, SH);
        let tile_rect = Rect::new(480.0, 300.0, 60.0, 30.0);
        let mut tile = Tile::new(state.next_entity_id(), "red".into(), tile_rect, true);
        tile.power = Some(PowerKind::FastBall);
        state.tiles.push(tile);

        // Ball parked inside the tile with zero velocity: each tick registers
        // exactly one hit
        let ball_rect = Rect::new(500.0, 310.0, 12.0, 12.0);
        free_ball(&mut state, ball_rect, 0.0, 0.0);

        let mut sounds = SoundQueue::default();
        let input = InputState::default();

        let out = tick(&mut state, &input, DT, 16, &mut sounds);
        assert_eq!(state.tiles[0].hits_remaining, 1);
        assert!(state.powers.is_empty());
        assert!(!out.level_cleared);

        let out = tick(&mut state, &input, DT, 32, &mut sounds);
        assert!(state.tiles.is_empty());
        assert!(out.level_cleared);
        assert_eq!(state.powers.len(), 1);
        assert_eq!(state.powers[0].kind, PowerKind::FastBall);
        // 60% of the tile, centered on it (minus one frame of falling)
        let spawned = &state.powers[0].rect;
        assert!((spawned.w - 36.0).abs() < 0.001);
        assert!((spawned.center().x - tile_rect.center().x).abs() < 0.001);
        assert_eq!(
            sounds.drain(),
            vec![SoundId::BrickHit, SoundId::BrickHit]
        );
    }

    #[test]
    fn test_ball_reflects_off_tile_side() {
        let mut state = GameState::new(SW, SH);
        let tile_rect = Rect::new(500.0, 300.0, 60.0, 30.0);
        state
            .tiles
            .push(Tile::new(1, "blue".into(), tile_rect, false));

        // Approaching from the left: x reflects, y is untouched
        let id = free_ball(&mut state, Rect::new(480.0, 305.0, 12.0, 12.0), 12.0, 3.0);
        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);

        let ball = state.balls.iter().find(|b| b.id == id).unwrap();
        assert!(ball.vel.x < 0.0);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_fireball_pierces_without_reflecting() {
        let mut state = GameState::new(SW, SH);
        state
            .tiles
            .push(Tile::new(1, "blue".into(), Rect::new(500.0, 300.0, 60.0, 30.0), false));

        let id = free_ball(&mut state, Rect::new(480.0, 305.0, 12.0, 12.0), 12.0, -3.0);
        state.balls.last_mut().unwrap().is_fireball = true;

        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);

        let ball = state.balls.iter().find(|b| b.id == id).unwrap();
        // Velocity direction unchanged, tile still broken
        assert!(ball.vel.x > 0.0);
        assert!(state.tiles.is_empty());
    }

    #[test]
    fn test_bat_bounce_center_goes_straight_up() {
        let mut state = world_with_bat();
        let bat_rect = state.bat.as_ref().unwrap().rect;
        let spawn = Rect::from_center(
            Vec2::new(bat_rect.center().x, bat_rect.y - 2.0),
            12.0,
            12.0,
        );
        let id = free_ball(&mut state, spawn, 0.0, 8.0);

        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);

        let ball = state.balls.iter().find(|b| b.id == id).unwrap();
        assert!(ball.vel.y < 0.0);
        assert!(ball.vel.x.abs() < 0.5);
        assert!((ball.vel.as_vec2().length() - ball.vel.speed).abs() < 0.001);
    }

    #[test]
    fn test_ball_reflects_at_play_area_margins() {
        let mut sounds = SoundQueue::default();
        let input = InputState::default();

        // Left margin (1% of screen width): x forced positive
        let mut state = GameState::new(SW, SH);
        let id = free_ball(&mut state, Rect::new(12.0, 500.0, 12.0, 12.0), -6.0, 2.0);
        tick(&mut state, &input, DT, 16, &mut sounds);
        let ball = state.balls.iter().find(|b| b.id == id).unwrap();
        assert!(ball.rect.x <= SW * BOUNDS_LEFT_FRACTION);
        assert!(ball.vel.x > 0.0);

        // Right margin (98%): x forced negative
        let mut state = GameState::new(SW, SH);
        let id = free_ball(&mut state, Rect::new(970.0, 500.0, 12.0, 12.0), 6.0, 2.0);
        tick(&mut state, &input, DT, 16, &mut sounds);
        let ball = state.balls.iter().find(|b| b.id == id).unwrap();
        assert!(ball.rect.right() >= SW * BOUNDS_RIGHT_FRACTION);
        assert!(ball.vel.x < 0.0);

        // Top margin (5%): y forced positive
        let mut state = GameState::new(SW, SH);
        let id = free_ball(&mut state, Rect::new(500.0, 52.0, 12.0, 12.0), 2.0, -6.0);
        tick(&mut state, &input, DT, 16, &mut sounds);
        let ball = state.balls.iter().find(|b| b.id == id).unwrap();
        assert!(ball.rect.y <= SH * BOUNDS_TOP_FRACTION);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_ball_reflects_off_wall_rect() {
        // The left wall rect (2% of screen width) extends past the 1%
        // margin, so a ball stopping between the two exercises the wall
        // check on its own.
        let mut state = GameState::new(SW, SH);
        let wall = state.walls.left;
        let id = free_ball(&mut state, Rect::new(16.0, 500.0, 12.0, 12.0), -1.0, 2.0);

        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);

        let ball = state.balls.iter().find(|b| b.id == id).unwrap();
        assert!(ball.rect.x > SW * BOUNDS_LEFT_FRACTION);
        assert!(ball.rect.intersects(&wall));
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_ball_below_screen_removed_same_update() {
        let mut state = GameState::new(SW, SH);
        free_ball(&mut state, Rect::new(500.0, SH - 1.0, 12.0, 12.0), 0.0, 12.0);

        let mut sounds = SoundQueue::default();
        let out = tick(&mut state, &InputState::default(), DT, 16, &mut sounds);

        assert!(state.balls.is_empty());
        assert!(out.round_lost);
    }

    #[test]
    fn test_multi_ball_triples_pool() {
        let mut state = world_with_bat();
        free_ball(&mut state, Rect::new(300.0, 400.0, 12.0, 12.0), 5.0, -8.0);
        free_ball(&mut state, Rect::new(600.0, 400.0, 12.0, 12.0), -5.0, -8.0);

        // Park a multi-ball pickup on the bat
        let bat_rect = state.bat.as_ref().unwrap().rect;
        let id = state.next_entity_id();
        state.powers.push(Power {
            id,
            kind: PowerKind::MultiBall,
            rect: Rect::from_center(bat_rect.center(), 20.0, 20.0),
        });

        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);

        assert_eq!(state.balls.len(), 6);
        assert!(state.powers.is_empty());
        assert!(sounds.drain().contains(&SoundId::PowerPickup));

        // Each spawned pair has opposite-sign x-velocity of equal magnitude
        let expected_vx = BALL_SPEED * MULTI_BALL_VX_SCALE;
        let clones: Vec<_> = state.balls.iter().skip(2).collect();
        assert_eq!(clones.len(), 4);
        for pair in clones.chunks(2) {
            assert!((pair[0].vel.x - expected_vx).abs() < 0.001);
            assert!((pair[1].vel.x + expected_vx).abs() < 0.001);
        }
    }

    #[test]
    fn test_speed_powers_rescale_all_balls() {
        let mut state = world_with_bat();
        free_ball(&mut state, Rect::new(300.0, 400.0, 12.0, 12.0), 3.0, -4.0);

        let bat_rect = state.bat.as_ref().unwrap().rect;
        let id = state.next_entity_id();
        state.powers.push(Power {
            id,
            kind: PowerKind::SlowBall,
            rect: Rect::from_center(bat_rect.center(), 20.0, 20.0),
        });

        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);

        let expected = BALL_SPEED * SLOW_BALL_SCALE;
        let ball = &state.balls[0];
        assert!((ball.vel.speed - expected).abs() < 0.001);
        assert!((ball.vel.as_vec2().length() - expected).abs() < 0.001);
    }

    #[test]
    fn test_bullet_volley_fires_and_hits_tiles() {
        let mut state = world_with_bat();
        state.bat.as_mut().unwrap().set_skin(BatSkin::Bullets);
        // A ball so round_lost doesn't trip, parked far away
        free_ball(&mut state, Rect::new(100.0, 200.0, 12.0, 12.0), 0.0, 0.0);

        let mut input = InputState::default();
        input.set_fire(true);
        let mut sounds = SoundQueue::default();
        tick(&mut state, &input, DT, 1000, &mut sounds);

        assert_eq!(state.bullets.len(), 2);
        assert!(sounds.drain().contains(&SoundId::BulletFire));

        // Put a tile straight above the left bullet
        let left = state.bullets[0].rect;
        state.tiles.push(Tile::new(
            99,
            "green".into(),
            Rect::new(left.x - 10.0, left.y - 40.0, 40.0, 20.0),
            false,
        ));

        input.set_fire(false);
        for frame in 2..10u64 {
            tick(&mut state, &input, DT, 1000 + frame * 16, &mut sounds);
        }
        // Left bullet consumed by the tile it broke
        assert!(state.tiles.is_empty());
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_bullet_culled_at_top_margin() {
        let mut state = GameState::new(SW, SH);
        state.bullets.push(Bullet {
            id: 1,
            rect: Rect::new(500.0, SH * 0.05 + 1.0, 5.0, 10.0),
        });

        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_paused_world_is_frozen() {
        let mut state = world_with_bat();
        free_ball(&mut state, Rect::new(300.0, 400.0, 12.0, 12.0), 6.0, 6.0);
        state.toggle_pause();

        let before = state.balls[0].rect;
        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);
        assert_eq!(state.balls[0].rect, before);

        state.toggle_pause();
        tick(&mut state, &InputState::default(), DT, 32, &mut sounds);
        assert_ne!(state.balls[0].rect, before);
    }

    #[test]
    fn test_power_pickup_without_bat_is_noop() {
        let mut state = GameState::new(SW, SH);
        state.powers.push(Power {
            id: 1,
            kind: PowerKind::BigBat,
            rect: Rect::new(500.0, 500.0, 20.0, 20.0),
        });

        let mut sounds = SoundQueue::default();
        tick(&mut state, &InputState::default(), DT, 16, &mut sounds);
        // Nothing to collect it; it just keeps falling
        assert_eq!(state.powers.len(), 1);
        assert!(state.powers[0].rect.y > 500.0);
        assert!(sounds.drain().is_empty());
    }

    proptest! {
        /// The bat never leaves its movement bounds, whatever the input
        /// sequence or dt sizes thrown at it.
        #[test]
        fn prop_bat_stays_in_bounds(
            steps in prop::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..2.0), 1..60)
        ) {
            let mut state = world_with_bat();
            let mut sounds = SoundQueue::default();
            let mut now = 0u64;
            for (left, right, dt) in steps {
                now += 16;
                let mut input = InputState::default();
                if left {
                    input.press_left();
                }
                if right {
                    input.press_right();
                }
                tick(&mut state, &input, dt, now, &mut sounds);
                let bat = state.bat.as_ref().unwrap();
                prop_assert!(bat.rect.x >= BAT_EDGE_MARGIN - 0.001);
                prop_assert!(bat.rect.right() <= SW - BAT_EDGE_MARGIN + 0.001);
            }
        }
    }
}
