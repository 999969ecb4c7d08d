//! Blastfall - A tile-based side-scrolling action platformer
//!
//! Core modules:
//! - `sim`: Deterministic level simulation (tiles, entities, collisions, scoring)
//! - `renderer`: Draw-call seam and scene submission
//! - `audio`: Sound cues and the playback seam
//! - `assets`: Path-keyed texture/sound/font handles
//! - `input`: Button snapshots
//! - `tuning`: Data-driven game balance
//! - `hud`: Time/score readout and status overlays
//! - `session`: Level rotation and the continue flow

pub mod assets;
pub mod audio;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Tile dimensions in world units
    pub const TILE_WIDTH: f32 = 40.0;
    pub const TILE_HEIGHT: f32 = 32.0;

    /// Player and enemy sprite frames are square
    pub const CHARACTER_FRAME_SIZE: f32 = 64.0;

    /// Orb texture dimensions (bounce amplitude scales with height)
    pub const ORB_TEXTURE_HEIGHT: f32 = 32.0;

    /// Blast texture dimensions
    pub const BLAST_WIDTH: f32 = 16.0;
    pub const BLAST_HEIGHT: f32 = 16.0;

    /// Default viewport (the camera needs its width)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 480.0;

    /// Seed for tile variant selection
    pub const TILE_VARIANT_SEED: u64 = 354_668;
}

/// Bottom-center anchor to top-left corner for a sprite of `size`
#[inline]
pub fn bottom_center_to_top_left(anchor: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(anchor.x - size.x / 2.0, anchor.y - size.y)
}
