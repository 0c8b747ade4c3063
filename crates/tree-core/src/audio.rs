//! Ambient music playback and its coupling to the interaction mode.
//!
//! The sound device is a collaborator behind [`AudioBackend`].
//! [`AudioDeck`] implements the host-facing commands (play, toggle, volume)
//! and, once per frame, eases the playback rate toward a mode-dependent
//! target.

use crate::constants::*;
use crate::ease::ease;
use crate::error::AudioError;
use crate::state::InteractionMode;

/// Output device holding at most one looping buffer.
pub trait AudioBackend {
    /// Load `source` as the new buffer.
    ///
    /// On failure the previous buffer and playback state must be left as
    /// they were.
    fn load(&mut self, source: &str) -> Result<(), AudioError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    fn has_buffer(&self) -> bool;
    fn set_looping(&mut self, looping: bool);
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;
    fn playback_rate(&self) -> f32;
    fn set_playback_rate(&mut self, rate: f32);
    /// Release the device. Called once on teardown.
    fn close(&mut self) {}
}

/// Backend that tracks state but produces no sound.
#[derive(Clone, Debug)]
pub struct SilentBackend {
    source: Option<String>,
    playing: bool,
    looping: bool,
    volume: f32,
    rate: f32,
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self {
            source: None,
            playing: false,
            looping: false,
            volume: 1.0,
            rate: 1.0,
        }
    }
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl AudioBackend for SilentBackend {
    fn load(&mut self, source: &str) -> Result<(), AudioError> {
        self.source = Some(source.to_string());
        Ok(())
    }
    fn play(&mut self) {
        self.playing = self.source.is_some();
    }
    fn pause(&mut self) {
        self.playing = false;
    }
    fn stop(&mut self) {
        self.playing = false;
    }
    fn is_playing(&self) -> bool {
        self.playing
    }
    fn has_buffer(&self) -> bool {
        self.source.is_some()
    }
    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
    fn volume(&self) -> f32 {
        self.volume
    }
    fn playback_rate(&self) -> f32 {
        self.rate
    }
    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
    }
}

/// Playback-rate multiplier for the given mode.
///
/// Dispersing speeds the music up a little, more the further the hand is
/// from center; focusing on a photo slows it down.
pub fn target_playback_rate(mode: InteractionMode, pointer_x: f32) -> f32 {
    match mode {
        InteractionMode::Scatter => SCATTER_PLAYBACK_RATE + pointer_x.abs() * SCATTER_PLAYBACK_SPAN,
        InteractionMode::Focus => FOCUS_PLAYBACK_RATE,
        InteractionMode::Tree => 1.0,
    }
}

pub struct AudioDeck {
    backend: Box<dyn AudioBackend>,
    volume: f32,
}

impl AudioDeck {
    pub fn new(backend: Box<dyn AudioBackend>, volume: f32) -> Self {
        Self { backend, volume }
    }

    pub fn backend(&self) -> &dyn AudioBackend {
        self.backend.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.backend.is_playing()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Replace the current track with `source` (or the default) and start
    /// looping it. A failed load leaves the current playback untouched.
    pub fn play_audio(&mut self, source: Option<&str>) -> Result<(), AudioError> {
        let source = source.unwrap_or(DEFAULT_AUDIO_SOURCE);
        if let Err(e) = self.backend.load(source) {
            log::error!("[audio] {e}");
            return Err(e);
        }
        self.backend.stop();
        self.backend.set_looping(true);
        self.backend.set_volume(self.volume);
        self.backend.play();
        log::info!("[audio] now playing {source}");
        Ok(())
    }

    /// Pause if playing, resume if a track is loaded, otherwise load and
    /// play the default track. Returns whether music is now playing.
    pub fn toggle_audio(&mut self) -> bool {
        if self.backend.is_playing() {
            self.backend.pause();
        } else if self.backend.has_buffer() {
            self.backend.play();
        } else if self.play_audio(None).is_err() {
            return false;
        }
        self.backend.is_playing()
    }

    /// Set the output gain immediately.
    pub fn set_music_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
    }

    /// Ease the playback rate toward the mode's target. No-op while paused.
    pub fn couple(&mut self, mode: InteractionMode, pointer_x: f32, dt: f32) {
        if !self.backend.is_playing() {
            return;
        }
        let target = target_playback_rate(mode, pointer_x);
        let rate = ease(self.backend.playback_rate(), target, PLAYBACK_EASE_RATE, dt);
        self.backend.set_playback_rate(rate);
    }

    pub fn close(&mut self) {
        self.backend.stop();
        self.backend.close();
    }
}
