//! Soft-follow horizontal camera
//!
//! The view only scrolls when the player walks into the margin near either
//! screen edge, and then by exactly the overshoot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Left edge of the view in world units
    pub scroll_x: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest offset that keeps the view inside the level
    pub fn max_scroll(level_width: f32, viewport_width: f32) -> f32 {
        (level_width - viewport_width).max(0.0)
    }

    /// Track `player_x`, keeping it outside the edge margins when possible
    pub fn follow(&mut self, player_x: f32, viewport_width: f32, level_width: f32, margin_fraction: f32) {
        let margin = viewport_width * margin_fraction;
        let margin_left = self.scroll_x + margin;
        let margin_right = self.scroll_x + viewport_width - margin;

        let movement = if player_x < margin_left {
            player_x - margin_left
        } else if player_x > margin_right {
            player_x - margin_right
        } else {
            0.0
        };

        self.scroll_x =
            (self.scroll_x + movement).clamp(0.0, Self::max_scroll(level_width, viewport_width));
    }
}
