//! Draw-list interface for the rendering collaborator
//!
//! The core never touches a GPU or a surface. Once per frame the host asks
//! for a draw list: one rect plus sprite reference per visible entity, in a
//! fixed paint order. What a sprite reference resolves to is the host's
//! problem; a host whose asset failed to load substitutes
//! [`SpriteRef::Placeholder`] and keeps going.

use crate::sim::rect::Rect;
use crate::sim::state::{BatSkin, GameState, PowerKind};

/// What to paint inside a draw command's rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteRef<'a> {
    /// A tile by its sprite identifier from the level matrix
    Tile(&'a str),
    /// The bat's active skin and animation frame index
    Bat { skin: BatSkin, frame: usize },
    Ball { fireball: bool },
    Power(PowerKind),
    Bullet,
    /// Stand-in for an entity whose visual failed to load
    Placeholder,
}

/// One paint instruction: where and what
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand<'a> {
    pub rect: Rect,
    pub sprite: SpriteRef<'a>,
}

/// Build this frame's draw list.
///
/// Paint order is fixed: tile grid, then bat, balls, power-ups, bullets.
/// Later entries paint over earlier ones.
pub fn draw_list(state: &GameState) -> Vec<DrawCommand<'_>> {
    let mut commands = Vec::with_capacity(
        state.tiles.len() + 1 + state.balls.len() + state.powers.len() + state.bullets.len(),
    );

    for tile in &state.tiles {
        commands.push(DrawCommand {
            rect: tile.rect,
            sprite: SpriteRef::Tile(&tile.sprite),
        });
    }
    if let Some(bat) = &state.bat {
        commands.push(DrawCommand {
            rect: bat.rect,
            sprite: SpriteRef::Bat {
                skin: bat.skin,
                frame: bat.frame,
            },
        });
    }
    for ball in &state.balls {
        commands.push(DrawCommand {
            rect: ball.rect,
            sprite: SpriteRef::Ball {
                fireball: ball.is_fireball,
            },
        });
    }
    for power in &state.powers {
        commands.push(DrawCommand {
            rect: power.rect,
            sprite: SpriteRef::Power(power.kind),
        });
    }
    for bullet in &state.bullets {
        commands.push(DrawCommand {
            rect: bullet.rect,
            sprite: SpriteRef::Bullet,
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, Bat, Bullet, Power, Tile};

    #[test]
    fn test_draw_order_and_coverage() {
        let mut state = GameState::new(1000.0, 800.0);
        state
            .tiles
            .push(Tile::new(1, "red".into(), Rect::new(100.0, 100.0, 40.0, 20.0), false));
        state.bat = Some(Bat::new(Rect::new(450.0, 740.0, 100.0, 25.0), 1000.0, 0));
        state
            .balls
            .push(Ball::new_stuck(2, Rect::new(0.0, 0.0, 10.0, 10.0), 0));
        state.powers.push(Power {
            id: 3,
            kind: PowerKind::FireBall,
            rect: Rect::new(200.0, 300.0, 20.0, 20.0),
        });
        state.bullets.push(Bullet {
            id: 4,
            rect: Rect::new(500.0, 400.0, 5.0, 12.0),
        });

        let commands = draw_list(&state);
        assert_eq!(commands.len(), 5);
        assert!(matches!(commands[0].sprite, SpriteRef::Tile("red")));
        assert!(matches!(commands[1].sprite, SpriteRef::Bat { frame: 0, .. }));
        assert!(matches!(
            commands[2].sprite,
            SpriteRef::Ball { fireball: false }
        ));
        assert!(matches!(
            commands[3].sprite,
            SpriteRef::Power(PowerKind::FireBall)
        ));
        assert!(matches!(commands[4].sprite, SpriteRef::Bullet));
    }

    #[test]
    fn test_missing_bat_is_skipped() {
        let state = GameState::new(1000.0, 800.0);
        assert!(draw_list(&state).is_empty());
    }
}
