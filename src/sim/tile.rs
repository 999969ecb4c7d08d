//! Tile grid
//!
//! Dense, immutable grid of collision classes. Queries outside the grid are
//! answered so the level has solid left/right walls but an open top and
//! bottom: characters can jump above the screen and fall out of the level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::assets::TextureHandle;

/// How a tile interacts with moving characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileCollision {
    /// Does not block anything
    #[default]
    Passable,
    /// Blocks from every side
    Impassable,
    /// Blocks only when landed on from above
    Platform,
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub visual: Option<TextureHandle>,
    pub collision: TileCollision,
}

impl Tile {
    pub fn new(visual: Option<TextureHandle>, collision: TileCollision) -> Self {
        Self { visual, collision }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Fixed-size grid of tiles indexed `[x, y]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: Vec2,
    /// Row-major storage
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Build a grid from row-major tiles. `tiles.len()` must equal `width * height`.
    pub(crate) fn from_tiles(width: usize, height: usize, tile_size: Vec2, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self {
            width,
            height,
            tile_size,
            tiles,
        }
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// Level extent in world units
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size.x,
            self.height as f32 * self.tile_size.y,
        )
    }

    /// Stored tile, `None` outside the grid
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.tiles.get(y as usize * self.width + x as usize)
    }

    /// Collision class at a grid coordinate.
    ///
    /// Left/right of the grid is solid, above/below is open.
    pub fn collision_at(&self, x: i32, y: i32) -> TileCollision {
        if x < 0 || x as usize >= self.width {
            return TileCollision::Impassable;
        }
        if y < 0 || y as usize >= self.height {
            return TileCollision::Passable;
        }
        self.tiles[y as usize * self.width + x as usize].collision
    }

    /// World-space rectangle of a grid cell (valid for any coordinate)
    pub fn bounds_of(&self, x: i32, y: i32) -> Rect {
        Rect::new(
            x as f32 * self.tile_size.x,
            y as f32 * self.tile_size.y,
            self.tile_size.x,
            self.tile_size.y,
        )
    }

    /// Grid column containing a world X
    pub fn column_at(&self, world_x: f32) -> i32 {
        (world_x / self.tile_size.x).floor() as i32
    }

    /// Grid row containing a world Y
    pub fn row_at(&self, world_y: f32) -> i32 {
        (world_y / self.tile_size.y).floor() as i32
    }

    /// Inclusive cell range overlapped by a rectangle: `(x0, y0, x1, y1)`
    pub fn cells_overlapping(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let x0 = self.column_at(rect.left);
        let y0 = self.row_at(rect.top);
        let x1 = (rect.right() / self.tile_size.x).ceil() as i32 - 1;
        let y1 = (rect.bottom() / self.tile_size.y).ceil() as i32 - 1;
        (x0, y0, x1, y1)
    }

    /// Iterate `(x, y, tile)` over every cell
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (i % self.width, i / self.width, tile))
    }
}
