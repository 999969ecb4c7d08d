//! Play session
//!
//! Owns the active level and rotates through a fixed list of level sources.
//! The continue button is edge-triggered: a dead player respawns, a level
//! whose clock ran out is either advanced (exit reached) or restarted.

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;

use crate::assets::{AssetProvider, HandleTable};
use crate::audio::AudioSink;
use crate::hud::{Hud, HudAssets};
use crate::input::{Button, InputSource};
use crate::renderer::DrawSink;
use crate::sim::{Level, LevelError, LevelEvent, parse_level};
use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no levels to play")]
    NoLevels,
    #[error("level {index}: {source}")]
    Level {
        index: usize,
        #[source]
        source: LevelError,
    },
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

/// Level rotation plus the continue flow
#[derive(Debug)]
pub struct Session {
    sources: Vec<String>,
    tuning: Tuning,
    level: Level,
    hud: HudAssets,
    was_continue_pressed: bool,
}

impl Session {
    /// Validate every level up front, then load the first
    pub fn new(
        sources: Vec<String>,
        tuning: Tuning,
        assets: &mut impl AssetProvider,
    ) -> Result<Self, SessionError> {
        tuning.validate()?;
        if sources.is_empty() {
            return Err(SessionError::NoLevels);
        }

        let tile_size = Vec2::new(tuning.tile_width, tuning.tile_height);
        for (index, source) in sources.iter().enumerate() {
            parse_level(source, tile_size, &mut HandleTable::new())
                .map_err(|source| SessionError::Level { index, source })?;
        }

        let level = load(&sources, 0, &tuning, assets)?;
        log::info!("Session started with {} levels", sources.len());
        Ok(Self {
            hud: HudAssets::load(assets),
            sources,
            tuning,
            level,
            was_continue_pressed: false,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_index(&self) -> usize {
        self.level.index()
    }

    pub fn level_count(&self) -> usize {
        self.sources.len()
    }

    /// Handle the continue button, then advance the level
    pub fn update(
        &mut self,
        elapsed: Duration,
        input: &impl InputSource,
        audio: &mut impl AudioSink,
        assets: &mut impl AssetProvider,
    ) -> Result<Vec<LevelEvent>, SessionError> {
        let continue_pressed = input.is_down(Button::Continue);
        if continue_pressed && !self.was_continue_pressed {
            self.on_continue(audio, assets)?;
        }
        self.was_continue_pressed = continue_pressed;

        Ok(self.level.update(elapsed, input, audio))
    }

    fn on_continue(
        &mut self,
        audio: &mut impl AudioSink,
        assets: &mut impl AssetProvider,
    ) -> Result<(), SessionError> {
        if !self.level.player().is_alive() {
            self.level.start_new_life();
            audio.resume_music();
        } else if self.level.time_remaining().is_zero() {
            let index = if self.level.reached_exit() {
                (self.level.index() + 1) % self.sources.len()
            } else {
                self.level.index()
            };
            self.level = load(&self.sources, index, &self.tuning, assets)?;
            audio.resume_music();
        }
        Ok(())
    }

    /// Level then HUD
    pub fn draw(&self, sink: &mut impl DrawSink) {
        self.level.draw(sink);
        let viewport = Vec2::new(self.tuning.viewport_width, self.tuning.viewport_height);
        Hud::from_level(&self.level).draw(&self.hud, viewport, sink);
    }
}

fn load(
    sources: &[String],
    index: usize,
    tuning: &Tuning,
    assets: &mut impl AssetProvider,
) -> Result<Level, SessionError> {
    let source = sources.get(index).ok_or(SessionError::NoLevels)?;
    log::info!("Loading level {}", index);
    Level::new(index, source, tuning.clone(), assets)
        .map_err(|source| SessionError::Level { index, source })
}
