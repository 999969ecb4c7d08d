//! Heads-up display
//!
//! Time and score readout in the top-left corner, plus a status overlay in
//! the middle of the screen once the level is won, lost or the player died.

use std::time::Duration;

use glam::Vec2;

use crate::assets::{AssetProvider, FontHandle, TextureHandle};
use crate::renderer::{Color, DrawSink, Flip, colors};
use crate::sim::Level;

/// Below this the time readout blinks red
pub const WARNING_TIME: Duration = Duration::from_secs(30);

/// Line height of the HUD font
const LINE_HEIGHT: f32 = 24.0;
/// Overlay texture dimensions
const OVERLAY_SIZE: Vec2 = Vec2::new(400.0, 120.0);
const SHADOW_OFFSET: Vec2 = Vec2::new(1.0, 1.0);

/// Which overlay, if any, to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    /// Time ran out after reaching the exit
    Won,
    /// Time ran out first
    Lost,
    Died,
}

/// Font and overlay textures
#[derive(Debug, Clone, Copy)]
pub struct HudAssets {
    pub font: FontHandle,
    pub win: TextureHandle,
    pub lose: TextureHandle,
    pub died: TextureHandle,
}

impl HudAssets {
    pub fn load(assets: &mut impl AssetProvider) -> Self {
        Self {
            font: assets.font("Fonts/Hud"),
            win: assets.texture("Overlays/YouWin"),
            lose: assets.texture("Overlays/YouLose"),
            died: assets.texture("Overlays/YouDied"),
        }
    }
}

/// HUD contents for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub time_text: String,
    pub time_color: Color,
    pub score_text: String,
    pub status: Status,
}

impl Hud {
    pub fn from_level(level: &Level) -> Self {
        let remaining = level.time_remaining();
        Self {
            time_text: format_time(remaining),
            time_color: time_color(remaining, level.reached_exit()),
            score_text: format!("SCORE: {}", level.score()),
            status: status_of(level),
        }
    }

    /// Draw in screen space
    pub fn draw(&self, assets: &HudAssets, viewport: Vec2, sink: &mut impl DrawSink) {
        sink.set_scroll(0.0);
        let origin = Vec2::ZERO;
        draw_shadowed(sink, assets.font, &self.time_text, origin, self.time_color);
        draw_shadowed(
            sink,
            assets.font,
            &self.score_text,
            origin + Vec2::new(0.0, LINE_HEIGHT * 1.2),
            colors::WHITE_SMOKE,
        );

        let overlay = match self.status {
            Status::Playing => return,
            Status::Won => assets.win,
            Status::Lost => assets.lose,
            Status::Died => assets.died,
        };
        let position = (viewport - OVERLAY_SIZE) / 2.0;
        sink.draw_sprite(overlay, position, colors::WHITE, Flip::None);
    }
}

/// `TIME: mm:ss` with whole seconds truncated
pub fn format_time(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("TIME: {:02}:{:02}", secs / 60, secs % 60)
}

/// Red on odd seconds inside the warning window, unless the exit was reached
pub fn time_color(remaining: Duration, reached_exit: bool) -> Color {
    if remaining > WARNING_TIME || reached_exit || remaining.as_secs() % 2 == 0 {
        colors::WHITE_SMOKE
    } else {
        colors::RED
    }
}

pub fn status_of(level: &Level) -> Status {
    if level.time_remaining().is_zero() {
        if level.reached_exit() {
            Status::Won
        } else {
            Status::Lost
        }
    } else if !level.player().is_alive() {
        Status::Died
    } else {
        Status::Playing
    }
}

fn draw_shadowed(sink: &mut impl DrawSink, font: FontHandle, text: &str, position: Vec2, color: Color) {
    sink.draw_text(font, text, position + SHADOW_OFFSET, colors::BLACK);
    sink.draw_text(font, text, position, color);
}
