//! Level text format
//!
//! A level is a grid of equal-length character rows. Each character is
//! looked up in [`TILE_RULES`], which says what tile goes in the cell and
//! whether something spawns there. Parsing is one pass, rows top to bottom
//! and columns left to right, and either yields a complete layout or fails.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::orb::OrbKind;
use super::tile::{Tile, TileCollision, TileGrid};
use crate::assets::AssetProvider;
use crate::consts::TILE_VARIANT_SEED;

/// Structural problems in a level description
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level description is empty")]
    Empty,
    #[error("line {line} is {found} tiles wide, preceding lines are {expected}")]
    RaggedRow {
        /// 1-based line number
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("unsupported tile character '{ch}' at row {row}, column {column}")]
    UnknownTile { ch: char, row: usize, column: usize },
    #[error("second starting point at row {row}, column {column}; a level may only have one")]
    DuplicateStart { row: usize, column: usize },
    #[error("a level must have a starting point")]
    MissingStart,
    #[error("second exit at row {row}, column {column}; a level may only have one")]
    DuplicateExit { row: usize, column: usize },
    #[error("a level must have an exit")]
    MissingExit,
}

/// Appearance of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileVisual {
    None,
    /// Single texture under `Tiles/`
    Fixed(&'static str),
    /// One of `count` textures `Tiles/{base}0..Tiles/{base}{count-1}`, picked by the seeded RNG
    Variety { base: &'static str, count: u32 },
}

/// Entity registered at a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRule {
    PlayerStart,
    Exit,
    Enemy { sprite_set: &'static str },
    Orb(OrbKind),
}

/// What a level character produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRule {
    pub collision: TileCollision,
    pub visual: TileVisual,
    pub spawn: Option<SpawnRule>,
}

const fn rule(collision: TileCollision, visual: TileVisual, spawn: Option<SpawnRule>) -> TileRule {
    TileRule {
        collision,
        visual,
        spawn,
    }
}

use TileCollision::{Impassable, Passable, Platform};

/// Character table for the level format
pub const TILE_RULES: &[(char, TileRule)] = &[
    ('.', rule(Passable, TileVisual::None, None)),
    ('X', rule(Passable, TileVisual::Fixed("Exit"), Some(SpawnRule::Exit))),
    ('G', rule(Passable, TileVisual::None, Some(SpawnRule::Orb(OrbKind::Plain)))),
    ('P', rule(Passable, TileVisual::None, Some(SpawnRule::Orb(OrbKind::PowerUp)))),
    ('S', rule(Passable, TileVisual::None, Some(SpawnRule::Orb(OrbKind::Special)))),
    ('-', rule(Platform, TileVisual::Fixed("Platform"), None)),
    ('A', rule(Passable, TileVisual::None, Some(SpawnRule::Enemy { sprite_set: "MonsterA" }))),
    ('B', rule(Passable, TileVisual::None, Some(SpawnRule::Enemy { sprite_set: "MonsterB" }))),
    ('~', rule(Platform, TileVisual::Variety { base: "BlockB", count: 2 }, None)),
    (':', rule(Passable, TileVisual::Variety { base: "BlockB", count: 2 }, None)),
    ('1', rule(Passable, TileVisual::None, Some(SpawnRule::PlayerStart))),
    ('#', rule(Impassable, TileVisual::Variety { base: "Ground", count: 5 }, None)),
];

/// Look up the rule for a level character
pub fn tile_rule(ch: char) -> Option<&'static TileRule> {
    TILE_RULES.iter().find(|(c, _)| *c == ch).map(|(_, rule)| rule)
}

/// Parsed level: grid plus spawn points
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub grid: TileGrid,
    /// Bottom-center of the start tile
    pub start: Vec2,
    /// Center of the exit tile
    pub exit: Vec2,
    /// Bottom-center anchors
    pub enemies: Vec<(Vec2, &'static str)>,
    /// Tile centers
    pub orbs: Vec<(Vec2, OrbKind)>,
}

/// Parse a level description
pub fn parse_level(
    source: &str,
    tile_size: Vec2,
    assets: &mut impl AssetProvider,
) -> Result<LevelLayout, LevelError> {
    let lines: Vec<Vec<char>> = source.lines().map(|l| l.chars().collect()).collect();
    let width = lines.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return Err(LevelError::Empty);
    }
    for (i, line) in lines.iter().enumerate() {
        if line.len() != width {
            return Err(LevelError::RaggedRow {
                line: i + 1,
                expected: width,
                found: line.len(),
            });
        }
    }
    let height = lines.len();

    // Bounds of a cell before the grid exists
    let cell = |x: usize, y: usize| {
        let min = Vec2::new(x as f32, y as f32) * tile_size;
        (min, min + tile_size)
    };

    let mut rng = Pcg32::seed_from_u64(TILE_VARIANT_SEED);
    let mut tiles = Vec::with_capacity(width * height);
    let mut start = None;
    let mut exit = None;
    let mut enemies = Vec::new();
    let mut orbs = Vec::new();

    for (y, line) in lines.iter().enumerate() {
        for (x, &ch) in line.iter().enumerate() {
            let rule = tile_rule(ch).ok_or(LevelError::UnknownTile { ch, row: y, column: x })?;

            let visual = match rule.visual {
                TileVisual::None => None,
                TileVisual::Fixed(name) => Some(assets.texture(&format!("Tiles/{name}"))),
                TileVisual::Variety { base, count } => {
                    let index = rng.random_range(0..count);
                    Some(assets.texture(&format!("Tiles/{base}{index}")))
                }
            };
            tiles.push(Tile::new(visual, rule.collision));

            let (min, max) = cell(x, y);
            let bottom_center = Vec2::new((min.x + max.x) / 2.0, max.y);
            let center = (min + max) / 2.0;
            match rule.spawn {
                None => {}
                Some(SpawnRule::PlayerStart) => {
                    if start.is_some() {
                        return Err(LevelError::DuplicateStart { row: y, column: x });
                    }
                    start = Some(bottom_center);
                }
                Some(SpawnRule::Exit) => {
                    if exit.is_some() {
                        return Err(LevelError::DuplicateExit { row: y, column: x });
                    }
                    exit = Some(center);
                }
                Some(SpawnRule::Enemy { sprite_set }) => enemies.push((bottom_center, sprite_set)),
                Some(SpawnRule::Orb(kind)) => orbs.push((center, kind)),
            }
        }
    }

    let start = start.ok_or(LevelError::MissingStart)?;
    let exit = exit.ok_or(LevelError::MissingExit)?;

    Ok(LevelLayout {
        grid: TileGrid::from_tiles(width, height, tile_size, tiles),
        start,
        exit,
        enemies,
        orbs,
    })
}
