//! Level simulation
//!
//! All gameplay logic lives here. Nothing in this module draws, plays sound
//! or reads devices directly:
//! - Time comes in as an elapsed `Duration` per frame
//! - Audio and input go through the collaborator traits
//! - Tile variants use a fixed seed so layouts are reproducible

pub mod blast;
pub mod camera;
pub mod enemy;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod level;
pub mod orb;
pub mod player;
pub mod tick;
pub mod tile;

pub use blast::Blast;
pub use camera::Camera;
pub use enemy::{Enemy, EnemySprites};
pub use event::{KillCause, LevelEvent};
pub use geometry::{Circle, Rect};
pub use layout::{LevelError, LevelLayout, TILE_RULES, parse_level, tile_rule};
pub use level::{Level, LevelTextures};
pub use orb::{Orb, OrbKind};
pub use player::{Facing, Player, PlayerSprites};
pub use tile::{Tile, TileCollision, TileGrid};
