//! Audio playback
//!
//! Decoding and mixing belong to the engine; the game talks to it through
//! [`AudioOut`] and keeps volume/mute policy in [`AudioManager`].

use crate::settings::Settings;

/// Opaque handle to a sound or music track owned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Engine-side sound output
pub trait AudioOut {
    fn play_sound(&mut self, sound: SoundHandle, volume: f32);
    fn play_music(&mut self, track: SoundHandle, volume: f32);
    fn stop_music(&mut self);
}

/// Backend that discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioOut for NullAudio {
    fn play_sound(&mut self, _sound: SoundHandle, _volume: f32) {}
    fn play_music(&mut self, _track: SoundHandle, _volume: f32) {}
    fn stop_music(&mut self) {}
}

/// Backend that remembers what was played
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub sounds: Vec<(SoundHandle, f32)>,
    pub music: Option<SoundHandle>,
}

impl AudioOut for RecordingAudio {
    fn play_sound(&mut self, sound: SoundHandle, volume: f32) {
        self.sounds.push((sound, volume));
    }

    fn play_music(&mut self, track: SoundHandle, _volume: f32) {
        self.music = Some(track);
    }

    fn stop_music(&mut self) {
        self.music = None;
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioOut>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioOut>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Build a manager with the volumes stored in settings
    pub fn from_settings(backend: Box<dyn AudioOut>, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
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

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, sound: SoundHandle) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        self.backend.play_sound(sound, vol);
    }

    /// Start a looping music track, replacing any current one
    pub fn play_music(&mut self, track: SoundHandle) {
        self.backend.stop_music();
        let vol = self.effective_volume(self.music_volume);
        self.backend.play_music(track, vol);
    }

    pub fn stop_music(&mut self) {
        self.backend.stop_music();
    }
}
