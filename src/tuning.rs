//! Gameplay tuning
//!
//! Every balance constant the simulation uses. Loaded from JSON or taken
//! from `Default`; missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning values
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("tile size must be positive, got {width}x{height}")]
    TileSize { width: f32, height: f32 },
    #[error("viewport width must be positive, got {0}")]
    Viewport(f32),
    #[error("camera margin fraction must be in [0, 0.5), got {0}")]
    CameraMargin(f32),
    #[error("time limit must be between 0 and 86400 seconds, got {0}")]
    TimeLimit(f32),
}

/// Longest accepted level time limit (one day)
pub const MAX_TIME_LIMIT_SECS: f32 = 86_400.0;

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Grid ===
    pub tile_width: f32,
    pub tile_height: f32,

    // === Timer & scoring ===
    /// Level time limit (seconds)
    pub time_limit_secs: f32,
    /// Points awarded per second of time left after reaching the exit
    pub points_per_second: u64,
    /// How many seconds of remaining time the countdown drains per real second
    pub countdown_speedup: f32,
    /// Score must be strictly greater than this to use the exit
    pub exit_score_threshold: u64,
    /// Points per enemy kill
    pub enemy_kill_points: u64,
    pub plain_orb_points: u64,
    pub power_up_orb_points: u64,
    pub special_orb_points: u64,

    // === Player movement ===
    pub move_acceleration: f32,
    pub max_move_speed: f32,
    pub ground_drag: f32,
    pub air_drag: f32,
    pub max_jump_time: f32,
    pub jump_launch_velocity: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub jump_control_power: f32,
    /// Invincibility window granted by a power-up orb (seconds)
    pub power_up_secs: f32,

    // === Enemies ===
    pub enemy_move_speed: f32,
    /// Pause at a patrol edge before turning around (seconds)
    pub enemy_wait_secs: f32,

    // === Blasts ===
    /// Minimum time between shots (seconds). The cooldown starts elapsed,
    /// so the first shot of a level is available on its first frame.
    pub fire_cooldown_secs: f32,
    /// Horizontal speed (units/second), sign follows facing
    pub blast_speed: f32,
    /// Blast deactivates once it strays this far from its spawn X
    pub blast_travel_window: f32,
    /// Spawn offset from the player anchor when facing right (X mirrored for left)
    pub blast_offset: (f32, f32),
    pub blast_damage: u32,

    // === Camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Dead-zone margin as a fraction of viewport width
    pub camera_margin: f32,
    /// Background layer scroll rate relative to the camera
    pub background_parallax: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,

            time_limit_secs: 120.0,
            points_per_second: 5,
            countdown_speedup: 100.0,
            exit_score_threshold: 1000,
            enemy_kill_points: 30,
            plain_orb_points: 30,
            power_up_orb_points: 100,
            special_orb_points: 100,

            move_acceleration: 13_000.0,
            max_move_speed: 1_750.0,
            ground_drag: 0.48,
            air_drag: 0.58,
            max_jump_time: 0.35,
            jump_launch_velocity: -3_500.0,
            gravity: 3_400.0,
            max_fall_speed: 550.0,
            jump_control_power: 0.14,
            power_up_secs: 6.0,

            enemy_move_speed: 64.0,
            enemy_wait_secs: 0.5,

            fire_cooldown_secs: 2.0,
            blast_speed: 600.0,
            blast_travel_window: 60.0,
            blast_offset: (50.0, -30.0),
            blast_damage: 10,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            camera_margin: 0.35,
            background_parallax: 0.2,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.tile_width <= 0.0 || self.tile_height <= 0.0 {
            return Err(TuningError::TileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        if self.viewport_width <= 0.0 {
            return Err(TuningError::Viewport(self.viewport_width));
        }
        if !(0.0..0.5).contains(&self.camera_margin) {
            return Err(TuningError::CameraMargin(self.camera_margin));
        }
        if !(0.0..=MAX_TIME_LIMIT_SECS).contains(&self.time_limit_secs) {
            return Err(TuningError::TimeLimit(self.time_limit_secs));
        }
        if self.fire_cooldown_secs <= 0.0 {
            log::warn!("fire cooldown is {}s - blasts fire every frame", self.fire_cooldown_secs);
        }
        Ok(())
    }

    /// Orb point value by kind
    pub fn orb_points(&self, kind: crate::sim::OrbKind) -> u64 {
        use crate::sim::OrbKind;
        match kind {
            OrbKind::Plain => self.plain_orb_points,
            OrbKind::PowerUp => self.power_up_orb_points,
            OrbKind::Special => self.special_orb_points,
        }
    }
}
