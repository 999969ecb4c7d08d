//! Collectible orbs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Circle;
use super::player::Player;
use crate::assets::TextureHandle;
use crate::consts::ORB_TEXTURE_HEIGHT;

/// Bounce height as a fraction of the orb texture height
const BOUNCE_HEIGHT: f32 = 0.18;
/// Bounce cycles (radians) per second
const BOUNCE_RATE: f32 = 3.0;
/// Phase offset per world unit so neighbouring orbs bob out of sync
const BOUNCE_SYNC: f32 = -0.75;

/// Orb variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbKind {
    /// Points only
    Plain,
    /// Grants temporary invincibility
    PowerUp,
    /// Arms the area-clear trigger
    Special,
}

impl OrbKind {
    pub fn texture_path(&self) -> &'static str {
        match self {
            OrbKind::Plain => "Sprites/Gem",
            OrbKind::PowerUp => "Sprites/PowerUp",
            OrbKind::Special => "Sprites/Special",
        }
    }
}

/// A collectible orb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub kind: OrbKind,
    /// Resting center
    pub base_position: Vec2,
    pub radius: f32,
    pub point_value: u64,
    pub collected: bool,
    pub texture: TextureHandle,
    /// Vertical offset from the bounce animation
    bounce: f32,
    /// Animation clock (seconds)
    time: f32,
}

impl Orb {
    pub fn new(kind: OrbKind, position: Vec2, radius: f32, point_value: u64, texture: TextureHandle) -> Self {
        Self {
            kind,
            base_position: position,
            radius,
            point_value,
            collected: false,
            texture,
            bounce: 0.0,
            time: 0.0,
        }
    }

    /// Current center including bounce
    pub fn position(&self) -> Vec2 {
        self.base_position + Vec2::new(0.0, self.bounce)
    }

    pub fn bounding_circle(&self) -> Circle {
        Circle::new(self.position(), self.radius)
    }

    /// Advance the bounce animation
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        let t = self.time * BOUNCE_RATE + self.base_position.x * BOUNCE_SYNC;
        self.bounce = t.sin() * BOUNCE_HEIGHT * ORB_TEXTURE_HEIGHT;
    }

    /// Apply this orb's effect and mark it collected.
    ///
    /// Returns `false` if it was already collected, so effects never stack
    /// from a stale reference.
    pub fn on_collected(&mut self, player: &mut Player, power_up_secs: f32) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        match self.kind {
            OrbKind::Plain => {}
            OrbKind::PowerUp => player.power_up(power_up_secs),
            OrbKind::Special => player.arm_special(),
        }
        true
    }
}
