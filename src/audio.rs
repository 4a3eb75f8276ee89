//! Audio cues
//!
//! The game only ever asks for a cue to be played. Whether anything is heard
//! is up to the backend, and failures never reach the game.

use std::io::{self, Write};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Correct bit caught
    BitCollected,
    /// Wrong bit caught
    WrongBit,
    /// Round finished
    LevelComplete,
    /// Power-up caught
    PowerUp,
    /// Run ended
    GameOver,
}

/// Cue for a session event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::BitCollected { .. } => Some(SoundCue::BitCollected),
        GameEvent::WrongBit { .. } => Some(SoundCue::WrongBit),
        GameEvent::LevelComplete { .. } => Some(SoundCue::LevelComplete),
        GameEvent::PowerUpCollected(_) => Some(SoundCue::PowerUp),
        GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
        GameEvent::LevelStarted { .. } => None,
    }
}

/// Fire-and-forget receiver of cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Something that can actually make a noise
pub trait CueBackend {
    fn emit(&mut self, cue: SoundCue, volume: f32) -> io::Result<()>;
}

/// Rings the terminal bell for the cues that matter
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn rings(cue: SoundCue) -> usize {
        match cue {
            SoundCue::WrongBit | SoundCue::LevelComplete => 1,
            SoundCue::GameOver => 2,
            SoundCue::BitCollected | SoundCue::PowerUp => 0,
        }
    }
}

impl<W: Write> CueBackend for TerminalBell<W> {
    fn emit(&mut self, cue: SoundCue, _volume: f32) -> io::Result<()> {
        let rings = Self::rings(cue);
        if rings == 0 {
            return Ok(());
        }
        self.out.write_all(&b"\x07".repeat(rings))?;
        self.out.flush()
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn CueBackend>>,
    master_volume: f32,
    sfx_volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn CueBackend>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }

    /// Manager with no backend; every cue is dropped
    pub fn silent() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }

    /// Build from settings, using the terminal bell when sound is on
    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = if settings.sound {
            Self::new(Box::new(TerminalBell::stdout()))
        } else {
            log::info!("Sound disabled in settings");
            Self::silent()
        };
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(e) = backend.emit(cue, vol) {
            log::debug!("Dropped {:?} cue: {}", cue, e);
        }
    }
}
