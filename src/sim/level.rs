//! Level state
//!
//! A `Level` owns everything in play: the tile grid, the player, the enemy,
//! orb and blast collections, score, timer and camera. Entities get the grid
//! and tuning as call arguments and never hold a reference back to the level.

use std::time::Duration;

use glam::Vec2;

use super::blast::Blast;
use super::camera::Camera;
use super::enemy::{Enemy, EnemySprites};
use super::layout::{LevelError, parse_level};
use super::orb::Orb;
use super::player::{Player, PlayerSprites};
use super::tile::TileGrid;
use crate::assets::{AssetProvider, TextureHandle};
use crate::audio::LevelSounds;
use crate::tuning::{MAX_TIME_LIMIT_SECS, Tuning};

/// Textures the level draws that are not owned by an entity
#[derive(Debug, Clone, Copy)]
pub struct LevelTextures {
    pub blast: TextureHandle,
    pub background: TextureHandle,
}

/// One playable level
#[derive(Debug, Clone)]
pub struct Level {
    pub(crate) index: usize,
    pub(crate) tuning: Tuning,
    pub(crate) grid: TileGrid,
    pub(crate) player: Player,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) orbs: Vec<Orb>,
    pub(crate) blasts: Vec<Blast>,
    /// Respawn point (bottom-center of the start tile)
    pub(crate) start: Vec2,
    /// Center of the exit tile
    pub(crate) exit: Vec2,
    pub(crate) score: u64,
    pub(crate) time_remaining: Duration,
    /// Set once when the win conditions are met
    pub(crate) reached_exit: bool,
    /// Set once when the timer first reads zero
    pub(crate) time_expired: bool,
    pub(crate) camera: Camera,
    /// Seconds since the last blast
    pub(crate) since_last_shot: f32,
    pub(crate) sounds: LevelSounds,
    pub(crate) textures: LevelTextures,
}

/// Level clock start value. Out-of-range limits are clamped; NaN gives zero.
fn time_limit(tuning: &Tuning) -> Duration {
    let secs = tuning.time_limit_secs.clamp(0.0, MAX_TIME_LIMIT_SECS);
    Duration::try_from_secs_f32(secs).unwrap_or_default()
}

impl Level {
    /// Parse `source` and populate the level. Fails without producing a
    /// partial level if the description is malformed.
    pub fn new(
        index: usize,
        source: &str,
        tuning: Tuning,
        assets: &mut impl AssetProvider,
    ) -> Result<Self, LevelError> {
        let tile_size = Vec2::new(tuning.tile_width, tuning.tile_height);
        let layout = parse_level(source, tile_size, assets)?;

        let player = Player::new(layout.start, PlayerSprites::load(assets));

        let enemies = layout
            .enemies
            .iter()
            .enumerate()
            .map(|(id, (position, sprite_set))| {
                let sprites = EnemySprites::load(assets, sprite_set);
                Enemy::new(id as u32, *position, sprite_set, sprites)
            })
            .collect::<Vec<_>>();

        let orb_radius = tuning.tile_width / 3.0;
        let orbs = layout
            .orbs
            .iter()
            .map(|(position, kind)| {
                let texture = assets.texture(kind.texture_path());
                Orb::new(*kind, *position, orb_radius, tuning.orb_points(*kind), texture)
            })
            .collect::<Vec<_>>();

        let textures = LevelTextures {
            blast: assets.texture("Sprites/blast"),
            background: assets.texture(&format!("Backgrounds/level{}", index + 1)),
        };

        log::info!(
            "Level {}: {}x{} tiles, {} enemies, {} orbs",
            index,
            layout.grid.width(),
            layout.grid.height(),
            enemies.len(),
            orbs.len()
        );

        Ok(Self {
            index,
            time_remaining: time_limit(&tuning),
            since_last_shot: tuning.fire_cooldown_secs,
            sounds: LevelSounds::load(assets),
            tuning,
            grid: layout.grid,
            player,
            enemies,
            orbs,
            blasts: Vec::new(),
            start: layout.start,
            exit: layout.exit,
            score: 0,
            reached_exit: false,
            time_expired: false,
            camera: Camera::new(),
            textures,
        })
    }

    /// Respawn the player at the start point after a death
    pub fn start_new_life(&mut self) {
        log::debug!("Level {}: new life", self.index);
        self.player.reset(self.start);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    pub fn reached_exit(&self) -> bool {
        self.reached_exit
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    pub fn blasts(&self) -> &[Blast] {
        &self.blasts
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn exit(&self) -> Vec2 {
        self.exit
    }

    /// Horizontal scroll offset of the view
    pub fn camera_offset(&self) -> f32 {
        self.camera.scroll_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HandleTable;
    use crate::sim::OrbKind;

    #[test]
    fn test_new_populates_entities() {
        let mut assets = HandleTable::new();
        let level = Level::new(0, "1.GPS.A.B.X\n###########", Tuning::default(), &mut assets).unwrap();
        assert_eq!(level.orbs().len(), 3);
        assert_eq!(level.enemies().len(), 2);
        assert_eq!(level.enemies()[0].sprite_set, "MonsterA");
        assert_eq!(level.enemies()[1].id, 1);
        assert_eq!(level.orbs()[1].kind, OrbKind::PowerUp);
        assert_eq!(level.orbs()[1].point_value, 100);
        assert_eq!(level.orbs()[0].point_value, 30);
        assert_eq!(level.score(), 0);
        assert_eq!(level.time_remaining(), Duration::from_secs(120));
        assert!(level.player().is_alive());
        assert_eq!(level.player().position, level.start());
        assert_eq!(level.camera_offset(), 0.0);
    }

    #[test]
    fn test_new_rejects_bad_layout() {
        let err = Level::new(0, "1..\n##", Tuning::default(), &mut HandleTable::new()).unwrap_err();
        assert!(matches!(err, LevelError::RaggedRow { line: 2, .. }));
    }

    #[test]
    fn test_extreme_time_limits_do_not_panic() {
        let cases = [
            (1e20, Duration::from_secs(86_400)),
            (f32::INFINITY, Duration::from_secs(86_400)),
            (f32::NAN, Duration::ZERO),
            (-5.0, Duration::ZERO),
        ];
        for (secs, expected) in cases {
            let mut tuning = Tuning::default();
            tuning.time_limit_secs = secs;
            let level = Level::new(0, "1..X\n####", tuning, &mut HandleTable::new()).unwrap();
            assert_eq!(level.time_remaining(), expected, "{secs}");
        }
    }

    #[test]
    fn test_start_new_life_respawns() {
        let mut level =
            Level::new(0, "1....X\n######", Tuning::default(), &mut HandleTable::new()).unwrap();
        level.player.on_killed(None);
        level.player.position = Vec2::new(150.0, 400.0);
        level.start_new_life();
        assert!(level.player().is_alive());
        assert_eq!(level.player().position, level.start());
    }
}
