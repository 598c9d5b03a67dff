//! Level definitions and world construction
//!
//! Levels are JSON records: a sprite matrix, grid geometry as screen
//! fractions, double-hit coordinates and a power-up budget. The loader
//! validates the whole definition up front and only then constructs a
//! [`GameState`], so a bad file can never leave a half-built world behind.
//!
//! Power-up placement is the one random step: `num_powers` occupied cells
//! are drawn without replacement from a seeded PCG stream, so the same seed
//! reproduces the same layout.

use std::collections::HashMap;
use std::path::Path;

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::Deserialize;
use thiserror::Error;

use crate::consts::*;
use crate::sim::rect::Rect;
use crate::sim::state::{Bat, GameState, PowerKind, Tile};

/// Sprite identifiers a level matrix may use. An empty string marks an
/// empty cell.
pub const TILE_SPRITES: &[&str] = &["blue", "green", "orange", "purple", "red", "yellow"];

/// Everything that can go wrong loading a level. All of these are fatal to
/// the load; none of them leave a partially constructed world.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("matrix is {rows}x{cols} but the header says {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("unknown tile sprite '{0}'")]
    UnknownTileSprite(String),
    #[error("double-hit cell ({0}, {1}) is outside the matrix")]
    DoubleHitOutOfRange(usize, usize),
    #[error("{requested} power-ups requested but only {occupied} cells are occupied")]
    TooManyPowers { requested: usize, occupied: usize },
}

/// Grid origin as screen fractions
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TileOffsets {
    pub x: f32,
    pub y: f32,
}

/// Cell stride as screen fractions
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TileDims {
    pub width: f32,
    pub height: f32,
}

/// A parsed level file
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDef {
    pub num_rows: usize,
    pub num_cols: usize,
    /// Row-major sprite matrix; `""` is an empty cell
    pub matrix: Vec<Vec<String>>,
    /// `(row, col)` cells that take two hits to break
    #[serde(default)]
    pub double_hit_tiles: Vec<(usize, usize)>,
    /// How many occupied cells carry a power-up
    #[serde(default)]
    pub num_powers: usize,
    pub background_music: String,
    pub background_image: String,
    pub tiles_offsets: TileOffsets,
    pub tiles_dims: TileDims,
    #[serde(default = "default_bat_placement")]
    pub bat_placement: (f32, f32),
    #[serde(default = "default_bat_dims")]
    pub bat_dims: (f32, f32),
    #[serde(default = "default_ball_placement")]
    pub ball_placement: (f32, f32),
    #[serde(default = "default_ball_dims")]
    pub ball_dims: (f32, f32),
}

fn default_bat_placement() -> (f32, f32) {
    DEFAULT_BAT_PLACEMENT
}

fn default_bat_dims() -> (f32, f32) {
    DEFAULT_BAT_DIMS
}

fn default_ball_placement() -> (f32, f32) {
    DEFAULT_BALL_PLACEMENT
}

fn default_ball_dims() -> (f32, f32) {
    DEFAULT_BALL_DIMS
}

impl LevelDef {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the whole definition before any world construction
    fn validate(&self) -> Result<(), LevelError> {
        let rows = self.matrix.len();
        let cols = self.matrix.iter().map(Vec::len).max().unwrap_or(0);
        if rows != self.num_rows || self.matrix.iter().any(|r| r.len() != self.num_cols) {
            return Err(LevelError::DimensionMismatch {
                rows,
                cols,
                expected_rows: self.num_rows,
                expected_cols: self.num_cols,
            });
        }

        for row in &self.matrix {
            for sprite in row {
                if !sprite.is_empty() && !TILE_SPRITES.contains(&sprite.as_str()) {
                    return Err(LevelError::UnknownTileSprite(sprite.clone()));
                }
            }
        }

        for &(row, col) in &self.double_hit_tiles {
            if row >= self.num_rows || col >= self.num_cols {
                return Err(LevelError::DoubleHitOutOfRange(row, col));
            }
        }

        let occupied = self.occupied_cells().len();
        if self.num_powers > occupied {
            return Err(LevelError::TooManyPowers {
                requested: self.num_powers,
                occupied,
            });
        }
        Ok(())
    }

    /// Coordinates of non-empty cells in row-major order
    fn occupied_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (row, cols) in self.matrix.iter().enumerate() {
            for (col, sprite) in cols.iter().enumerate() {
                if !sprite.is_empty() {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    /// Draw the power-up layout: which cells carry one and which kind each
    /// gets, both from the seeded stream.
    fn assign_powers(&self, rng: &mut Pcg32) -> HashMap<(usize, usize), PowerKind> {
        let occupied = self.occupied_cells();
        let mut assigned = HashMap::new();
        for &cell in occupied.choose_multiple(rng, self.num_powers) {
            if let Some(kind) = PowerKind::ALL.choose(rng) {
                assigned.insert(cell, *kind);
            }
        }
        assigned
    }

    /// Construct the initial world for this level.
    ///
    /// Validation runs first; any error aborts before the world exists.
    /// Geometry is computed from screen fractions, with each tile shrunk by
    /// the cell gap and centered in its cell.
    pub fn build(
        &self,
        screen_width: f32,
        screen_height: f32,
        level_index: u32,
        seed: u64,
        now_ms: u64,
    ) -> Result<GameState, LevelError> {
        self.validate()?;
        log::info!(
            "building level {}: {}x{} grid, {} power-ups, seed {}",
            level_index,
            self.num_rows,
            self.num_cols,
            self.num_powers,
            seed
        );

        let mut rng = Pcg32::seed_from_u64(seed);
        let powers = self.assign_powers(&mut rng);

        let mut state = GameState::new(screen_width, screen_height);
        state.level_index = level_index;
        state.backdrop.music = self.background_music.clone();
        state.backdrop.image = self.background_image.clone();

        // Tile grid: cell stride from the fraction dims, tiles gap-shrunk
        // and centered within their cells
        let start_x = screen_width * self.tiles_offsets.x;
        let start_y = screen_height * self.tiles_offsets.y;
        let cell_w = self.tiles_dims.width * screen_width;
        let cell_h = self.tiles_dims.height * screen_height;
        let tile_w = cell_w * (1.0 - TILE_GAP_FRACTION);
        let tile_h = cell_h * (1.0 - TILE_GAP_FRACTION);

        for (row, cols) in self.matrix.iter().enumerate() {
            for (col, sprite) in cols.iter().enumerate() {
                if sprite.is_empty() {
                    continue;
                }
                let rect = Rect::new(
                    start_x + col as f32 * cell_w + (cell_w - tile_w) / 2.0,
                    start_y + row as f32 * cell_h + (cell_h - tile_h) / 2.0,
                    tile_w,
                    tile_h,
                );
                let double_hit = self.double_hit_tiles.contains(&(row, col));
                let id = state.next_entity_id();
                let mut tile = Tile::new(id, sprite.clone(), rect, double_hit);
                tile.power = powers.get(&(row, col)).copied();
                state.tiles.push(tile);
            }
        }

        let bat_rect = Rect::new(
            self.bat_placement.0 * screen_width,
            self.bat_placement.1 * screen_height,
            self.bat_dims.0 * screen_width,
            self.bat_dims.1 * screen_height,
        );
        state.bat = Some(Bat::new(bat_rect, screen_width, now_ms));

        let ball_rect = Rect::new(
            self.ball_placement.0 * screen_width,
            self.ball_placement.1 * screen_height,
            self.ball_dims.0 * screen_width,
            self.ball_dims.1 * screen_height,
        );
        state.spawn_ball_stuck(ball_rect, now_ms);

        Ok(state)
    }
}
