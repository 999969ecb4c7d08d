//! Audio cues
//!
//! The level decides *when* a sound plays; an [`AudioSink`] supplied by the
//! host decides *how*. Sound handles are resolved once per level.

use crate::assets::{AssetProvider, SoundHandle};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player fired a blast
    Blast,
    /// Enemy destroyed
    EnemyDie,
    /// Player reached the exit
    ExitReached,
    /// Level timer ran out
    TimeUp,
    /// Orb collected
    OrbCollected,
    /// Player died
    PlayerKilled,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::Blast,
        SoundEffect::EnemyDie,
        SoundEffect::ExitReached,
        SoundEffect::TimeUp,
        SoundEffect::OrbCollected,
        SoundEffect::PlayerKilled,
    ];

    /// Logical asset path
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::Blast => "Sounds/blastSound",
            SoundEffect::EnemyDie => "Sounds/enemyDie",
            SoundEffect::ExitReached => "Sounds/ExitReached",
            SoundEffect::TimeUp => "Sounds/timeUp",
            SoundEffect::OrbCollected => "Sounds/GemCollected",
            SoundEffect::PlayerKilled => "Sounds/PlayerKilled",
        }
    }
}

/// Playback seam implemented by the host
pub trait AudioSink {
    /// Fire-and-forget one-shot effect
    fn play(&mut self, sound: SoundHandle);
    /// Pause the ambient music track
    fn pause_music(&mut self);
    /// Resume the ambient music track
    fn resume_music(&mut self);
}

/// Handles for every effect a level can trigger
#[derive(Debug, Clone)]
pub struct LevelSounds {
    handles: [SoundHandle; SoundEffect::ALL.len()],
}

impl LevelSounds {
    pub fn load(assets: &mut impl AssetProvider) -> Self {
        Self {
            handles: SoundEffect::ALL.map(|effect| assets.sound(effect.asset_path())),
        }
    }

    pub fn handle(&self, effect: SoundEffect) -> SoundHandle {
        // ALL is declared in variant order
        self.handles[effect as usize]
    }

    pub fn play(&self, sink: &mut impl AudioSink, effect: SoundEffect) {
        sink.play(self.handle(effect));
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _sound: SoundHandle) {}
    fn pause_music(&mut self) {}
    fn resume_music(&mut self) {}
}

/// A recorded audio command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play(SoundHandle),
    PauseMusic,
    ResumeMusic,
}

/// Sink that records commands (headless runs and tests)
#[derive(Debug, Default, Clone)]
pub struct AudioLog {
    pub commands: Vec<AudioCommand>,
    pub music_paused: bool,
}

impl AudioLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a given sound was played
    pub fn play_count(&self, sound: SoundHandle) -> usize {
        self.commands
            .iter()
            .filter(|c| **c == AudioCommand::Play(sound))
            .count()
    }
}

impl AudioSink for AudioLog {
    fn play(&mut self, sound: SoundHandle) {
        log::debug!("play sound {:?}", sound);
        self.commands.push(AudioCommand::Play(sound));
    }

    fn pause_music(&mut self) {
        self.music_paused = true;
        self.commands.push(AudioCommand::PauseMusic);
    }

    fn resume_music(&mut self) {
        self.music_paused = false;
        self.commands.push(AudioCommand::ResumeMusic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::HandleTable;

    #[test]
    fn test_level_sounds_resolve_each_effect() {
        let mut assets = HandleTable::new();
        let sounds = LevelSounds::load(&mut assets);
        for effect in SoundEffect::ALL {
            assert_eq!(assets.path(sounds.handle(effect).0), Some(effect.asset_path()));
        }
    }

    #[test]
    fn test_audio_log_tracks_music_state() {
        let mut log = AudioLog::new();
        log.pause_music();
        assert!(log.music_paused);
        log.resume_music();
        assert!(!log.music_paused);
        log.play(SoundHandle(3));
        log.play(SoundHandle(3));
        assert_eq!(log.play_count(SoundHandle(3)), 2);
    }
}
