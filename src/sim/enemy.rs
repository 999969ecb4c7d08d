//! Patrolling enemies
//!
//! An enemy walks until the way ahead is blocked by a wall or a drop, waits
//! a moment, then turns around. It never falls and never leaves its ledge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::player::Facing;
use super::tile::{TileCollision, TileGrid};
use crate::assets::{AssetProvider, TextureHandle};
use crate::consts::CHARACTER_FRAME_SIZE;
use crate::tuning::Tuning;

const BOUNDS_WIDTH_FRACTION: f32 = 0.35;
const BOUNDS_HEIGHT_FRACTION: f32 = 0.7;

/// Animation frames for one sprite set
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnemySprites {
    pub idle: TextureHandle,
    pub run: TextureHandle,
}

impl EnemySprites {
    pub fn load(assets: &mut impl AssetProvider, sprite_set: &str) -> Self {
        Self {
            idle: assets.texture(&format!("Sprites/{sprite_set}/Idle")),
            run: assets.texture(&format!("Sprites/{sprite_set}/Run")),
        }
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Appearance/behaviour variant ("MonsterA", "MonsterB")
    pub sprite_set: String,
    /// Bottom-center anchor
    pub position: Vec2,
    pub facing: Facing,
    alive: bool,
    /// Seconds left to stand at a patrol edge
    wait_time: f32,
    size: Vec2,
    sprites: EnemySprites,
}

impl Enemy {
    pub fn new(id: u32, position: Vec2, sprite_set: &str, sprites: EnemySprites) -> Self {
        Self {
            id,
            sprite_set: sprite_set.to_string(),
            position,
            facing: Facing::Left,
            alive: true,
            wait_time: 0.0,
            size: Vec2::new(
                CHARACTER_FRAME_SIZE * BOUNDS_WIDTH_FRACTION,
                CHARACTER_FRAME_SIZE * BOUNDS_HEIGHT_FRACTION,
            ),
            sprites,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_time > 0.0
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_bottom_center(self.position, self.size)
    }

    /// Walk, or wait and turn at an edge
    pub fn update(&mut self, dt: f32, grid: &TileGrid, tuning: &Tuning) {
        if !self.alive {
            return;
        }
        let dir = self.facing.sign();

        if self.wait_time > 0.0 {
            self.wait_time = (self.wait_time - dt).max(0.0);
            if self.wait_time <= 0.0 {
                self.facing = self.facing.reversed();
            }
            return;
        }

        // Column the leading edge would step into this frame
        let step = dir * tuning.enemy_move_speed * dt;
        let lead_x = self.position.x + self.size.x / 2.0 * dir + step;
        let ahead_x = grid.column_at(lead_x);
        let floor_y = grid.row_at(self.position.y);

        let wall_ahead = grid.collision_at(ahead_x, floor_y - 1) == TileCollision::Impassable;
        let drop_ahead = grid.collision_at(ahead_x, floor_y) == TileCollision::Passable;
        if wall_ahead || drop_ahead {
            self.wait_time = tuning.enemy_wait_secs;
        } else {
            self.position.x += step;
        }
    }

    /// Mark dead. The owning level removes it from play.
    pub fn on_killed(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        true
    }

    pub fn sprite(&self) -> TextureHandle {
        if self.is_waiting() {
            self.sprites.idle
        } else {
            self.sprites.run
        }
    }
}
