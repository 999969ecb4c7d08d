//! Draw-call seam
//!
//! The game never talks to a graphics API. Each frame it submits sprite and
//! text draws to a [`DrawSink`]; the host maps texture/font handles to real
//! resources and applies the scroll offset to world-space draws.

pub mod scene;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::{FontHandle, TextureHandle};

/// RGBA, 0..1 per channel
pub type Color = [f32; 4];

/// Named colors used by the scene and HUD
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const WHITE_SMOKE: Color = [0.96, 0.96, 0.96, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const GOLD: Color = [1.0, 0.84, 0.0, 1.0]; // Powered-up flash
}

/// Horizontal mirroring of a sprite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
}

/// Receives draw calls in submission order
pub trait DrawSink {
    /// Offset subtracted from the X of every following draw (0 for screen space)
    fn set_scroll(&mut self, scroll_x: f32);
    /// Sprite with its top-left corner at `position`
    fn draw_sprite(&mut self, texture: TextureHandle, position: Vec2, tint: Color, flip: Flip);
    fn draw_text(&mut self, font: FontHandle, text: &str, position: Vec2, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Scroll(f32),
    Sprite {
        texture: TextureHandle,
        position: Vec2,
        tint: Color,
        flip: Flip,
    },
    Text {
        font: FontHandle,
        text: String,
        position: Vec2,
        color: Color,
    },
}

/// Sink that keeps every call, for headless runs and tests
#[derive(Debug, Default)]
pub struct DrawLog {
    pub commands: Vec<DrawCommand>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Sprite draws using `texture`
    pub fn sprites_of(&self, texture: TextureHandle) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |c| matches!(c, DrawCommand::Sprite { texture: t, .. } if *t == texture))
    }

    /// Text of every text draw, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSink for DrawLog {
    fn set_scroll(&mut self, scroll_x: f32) {
        self.commands.push(DrawCommand::Scroll(scroll_x));
    }

    fn draw_sprite(&mut self, texture: TextureHandle, position: Vec2, tint: Color, flip: Flip) {
        self.commands.push(DrawCommand::Sprite {
            texture,
            position,
            tint,
            flip,
        });
    }

    fn draw_text(&mut self, font: FontHandle, text: &str, position: Vec2, color: Color) {
        self.commands.push(DrawCommand::Text {
            font,
            text: text.to_string(),
            position,
            color,
        });
    }
}
