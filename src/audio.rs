//! Audio playback via [kira](https://docs.rs/kira). Feature `audio`.
//!
//! [`SoundData`] is the decoded artifact the resource map stores;
//! [`AudioEngine`] plays them. Two playback modes match how games use
//! sound: *cues* are fire-and-forget one-shots, the *background* track is
//! a single looping sound the engine keeps a handle to, so it can be
//! stopped, paused, or re-volumed at any time. Starting a new background
//! sound replaces the old one.
//!
//! Volumes are linear amplitudes (0.0 silence, 1.0 full) and converted to
//! decibels at the kira boundary.

use std::fmt;
use std::io::Cursor;

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::sound::PlaybackState;
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};

use crate::error::EngineError;
use crate::resources::ResourceMap;

/// Convert a linear amplitude (0.0 = silence, 1.0 = full) to decibels.
fn amplitude_to_db(amplitude: f64) -> Decibels {
    if amplitude <= 0.0 {
        Decibels::SILENCE
    } else {
        Decibels((20.0 * amplitude.log10()) as f32)
    }
}

/// Decoded audio data, cheap to clone (shared via `Arc` internally).
#[derive(Clone)]
pub struct SoundData {
    inner: StaticSoundData,
}

impl SoundData {
    /// Decode audio from raw file bytes (OGG, MP3, WAV, FLAC). This is
    /// what the resource map's sound codec calls on its worker.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EngineError> {
        let inner = StaticSoundData::from_cursor(Cursor::new(bytes))
            .map_err(|e| EngineError::Audio(format!("sound decode failed: {e}")))?;
        Ok(Self { inner })
    }
}

impl fmt::Debug for SoundData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundData").finish_non_exhaustive()
    }
}

fn sound<'a>(map: &'a ResourceMap, key: &str) -> Result<&'a SoundData, EngineError> {
    map.get(key)?
        .as_sound()
        .ok_or_else(|| EngineError::NotLoaded(key.to_string()))
}

pub fn load(map: &mut ResourceMap, key: &str) -> Option<crate::resources::LoadTicket> {
    map.load(key, crate::resources::Codec::Sound)
}

pub fn unload(map: &mut ResourceMap, key: &str) -> bool {
    map.unload(key)
}

/// Wraps kira's `AudioManager` with cue and background playback.
pub struct AudioEngine {
    manager: AudioManager<DefaultBackend>,
    background: Option<StaticSoundHandle>,
    background_volume: f64,
    master_volume: f64,
}

impl AudioEngine {
    pub fn new() -> Result<Self, EngineError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| EngineError::Audio(format!("backend init failed: {e}")))?;
        Ok(Self {
            manager,
            background: None,
            background_volume: 1.0,
            master_volume: 1.0,
        })
    }

    /// Fire a one-shot sound at the given amplitude.
    pub fn play_cue(&mut self, map: &ResourceMap, key: &str, volume: f64) -> Result<(), EngineError> {
        let data = sound(map, key)?.inner.clone().volume(amplitude_to_db(volume));
        self.manager
            .play(data)
            .map_err(|e| EngineError::Audio(format!("cue '{key}' failed: {e}")))?;
        Ok(())
    }

    /// Start (or replace) the looping background track.
    pub fn play_background(
        &mut self,
        map: &ResourceMap,
        key: &str,
        volume: f64,
    ) -> Result<(), EngineError> {
        self.stop_background();
        let data = sound(map, key)?
            .inner
            .clone()
            .loop_region(..)
            .volume(amplitude_to_db(volume));
        let handle = self
            .manager
            .play(data)
            .map_err(|e| EngineError::Audio(format!("background '{key}' failed: {e}")))?;
        self.background = Some(handle);
        self.background_volume = volume;
        Ok(())
    }

    pub fn is_background_playing(&self) -> bool {
        self.background
            .as_ref()
            .is_some_and(|h| h.state() == PlaybackState::Playing)
    }

    pub fn pause_background(&mut self) {
        if let Some(handle) = &mut self.background {
            handle.pause(Tween::default());
        }
    }

    pub fn resume_background(&mut self) {
        if let Some(handle) = &mut self.background {
            handle.resume(Tween::default());
        }
    }

    pub fn stop_background(&mut self) {
        if let Some(mut handle) = self.background.take() {
            handle.stop(Tween::default());
        }
    }

    pub fn background_volume(&self) -> f64 {
        self.background_volume
    }

    pub fn set_background_volume(&mut self, volume: f64) {
        self.background_volume = volume.max(0.0);
        if let Some(handle) = &mut self.background {
            handle.set_volume(amplitude_to_db(self.background_volume), Tween::default());
        }
    }

    pub fn nudge_background_volume(&mut self, delta: f64) {
        self.set_background_volume(self.background_volume + delta);
    }

    pub fn master_volume(&self) -> f64 {
        self.master_volume
    }

    /// Scale every playing sound through kira's main track.
    pub fn set_master_volume(&mut self, volume: f64) {
        self.master_volume = volume.max(0.0);
        self.manager
            .main_track()
            .set_volume(amplitude_to_db(self.master_volume), Tween::default());
    }

    pub fn nudge_master_volume(&mut self, delta: f64) {
        self.set_master_volume(self.master_volume + delta);
    }
}

impl fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioEngine")
            .field("background", &self.background.is_some())
            .field("master_volume", &self.master_volume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplitude_conversion() {
        assert_eq!(amplitude_to_db(0.0), Decibels::SILENCE);
        assert_eq!(amplitude_to_db(-1.0), Decibels::SILENCE);
        assert_eq!(amplitude_to_db(1.0).0, 0.0);
        assert!((amplitude_to_db(0.5).0 - (-6.0206)).abs() < 1e-3);
    }
}
