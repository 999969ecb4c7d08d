//! Player projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::{BLAST_HEIGHT, BLAST_WIDTH};

/// A blast fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blast {
    /// Center
    pub position: Vec2,
    /// Signed horizontal speed (units/second)
    pub speed: f32,
    pub damage: u32,
    pub active: bool,
    /// Deactivates once `position.x` leaves `[min_x, max_x]`
    min_x: f32,
    max_x: f32,
}

impl Blast {
    /// New blast at `position` that may stray `window` units either way from its spawn X
    pub fn new(position: Vec2, speed: f32, window: f32, damage: u32) -> Self {
        Self {
            position,
            speed,
            damage,
            active: true,
            min_x: position.x - window,
            max_x: position.x + window,
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_center(self.position, Vec2::new(BLAST_WIDTH, BLAST_HEIGHT))
    }

    /// Travel bounds `(min_x, max_x)`
    pub fn travel_window(&self) -> (f32, f32) {
        (self.min_x, self.max_x)
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.position.x += self.speed * dt;
        if self.position.x > self.max_x || self.position.x < self.min_x {
            self.active = false;
        }
    }
}
