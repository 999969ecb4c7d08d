//! Level scene submission
//!
//! Draw order: background (screen space, parallax), then in world space the
//! visible tile columns, orbs, player, blasts and enemies.

use glam::Vec2;

use super::{Color, DrawSink, Flip, colors};
use crate::bottom_center_to_top_left;
use crate::consts::{BLAST_HEIGHT, BLAST_WIDTH, CHARACTER_FRAME_SIZE, ORB_TEXTURE_HEIGHT};
use crate::sim::{Facing, Level};

/// Character sheets face left; mirror when facing right
fn flip_for(facing: Facing) -> Flip {
    match facing {
        Facing::Left => Flip::None,
        Facing::Right => Flip::Horizontal,
    }
}

impl Level {
    /// Submit this frame's draws. Leaves the sink in world space.
    pub fn draw(&self, sink: &mut impl DrawSink) {
        let scroll = self.camera.scroll_x;

        sink.set_scroll(0.0);
        let background_x = -scroll * self.tuning.background_parallax;
        sink.draw_sprite(
            self.textures.background,
            Vec2::new(background_x, 0.0),
            colors::WHITE,
            Flip::None,
        );

        sink.set_scroll(scroll);
        self.draw_tiles(sink);

        let orb_size = Vec2::splat(ORB_TEXTURE_HEIGHT);
        for orb in &self.orbs {
            sink.draw_sprite(orb.texture, orb.position() - orb_size / 2.0, colors::WHITE, Flip::None);
        }

        let frame = Vec2::splat(CHARACTER_FRAME_SIZE);
        let player_tint: Color = if self.player.is_flashing() {
            colors::GOLD
        } else {
            colors::WHITE
        };
        sink.draw_sprite(
            self.player.sprite(),
            bottom_center_to_top_left(self.player.position, frame),
            player_tint,
            flip_for(self.player.facing()),
        );

        let blast_size = Vec2::new(BLAST_WIDTH, BLAST_HEIGHT);
        for blast in &self.blasts {
            let flip = if blast.speed < 0.0 { Flip::Horizontal } else { Flip::None };
            sink.draw_sprite(self.textures.blast, blast.position - blast_size / 2.0, colors::WHITE, flip);
        }

        for enemy in &self.enemies {
            sink.draw_sprite(
                enemy.sprite(),
                bottom_center_to_top_left(enemy.position, frame),
                colors::WHITE,
                flip_for(enemy.facing),
            );
        }
    }

    /// Only columns inside the view are submitted
    fn draw_tiles(&self, sink: &mut impl DrawSink) {
        let tile_size = self.grid.tile_size();
        let width = self.grid.width() as i32;
        let left = (self.camera.scroll_x / tile_size.x).floor() as i32;
        let right = (left + (self.tuning.viewport_width / tile_size.x) as i32 + 1).min(width - 1);

        for y in 0..self.grid.height() as i32 {
            for x in left.max(0)..=right {
                let Some(texture) = self.grid.tile(x, y).and_then(|t| t.visual) else {
                    continue;
                };
                let position = Vec2::new(x as f32 * tile_size.x, y as f32 * tile_size.y);
                sink.draw_sprite(texture, position, colors::WHITE, Flip::None);
            }
        }
    }
}
