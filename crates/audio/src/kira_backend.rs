//! Kira-backed cue playback.

use crate::{AudioCue, AudioPort};
use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

/// Plays cues loaded from `<dir>/<stem>.ogg`.
pub struct KiraAudio {
    manager: AudioManager,
    sounds: HashMap<AudioCue, StaticSoundData>,
    active_sounds: Vec<StaticSoundHandle>,
}

impl KiraAudio {
    /// Open the default device and load whatever cue files exist in `dir`.
    pub fn new(dir: &Path, master_volume: f64) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        let mut audio = Self {
            manager,
            sounds: HashMap::new(),
            active_sounds: Vec::new(),
        };
        audio.set_master_volume(master_volume);

        for cue in AudioCue::ALL {
            let path = dir.join(format!("{}.ogg", cue.file_stem()));
            match StaticSoundData::from_file(&path) {
                Ok(data) => {
                    audio.sounds.insert(cue, data);
                }
                Err(e) => log::warn!("No sound for {:?} at {:?}: {}", cue, path, e),
            }
        }
        log::info!("Loaded {}/{} audio cues", audio.sounds.len(), AudioCue::ALL.len());
        Ok(audio)
    }

    /// Set master volume (0.0 to 1.0).
    pub fn set_master_volume(&mut self, volume: f64) {
        let _ = self
            .manager
            .main_track()
            .set_volume(volume.clamp(0.0, 1.0), Tween::default());
    }

    fn try_play(&mut self, cue: AudioCue) -> Result<()> {
        let Some(sound_data) = self.sounds.get(&cue) else {
            return Ok(());
        };
        let volume = if cue == AudioCue::Ambience { 0.4 } else { 1.0 };
        let settings = StaticSoundSettings::new().volume(volume);
        let handle = self.manager.play(sound_data.clone().with_settings(settings))?;
        self.active_sounds.push(handle);
        Ok(())
    }

    /// Clean up finished sounds.
    fn cleanup(&mut self) {
        self.active_sounds
            .retain(|handle| handle.state() != kira::sound::PlaybackState::Stopped);
    }
}

impl AudioPort for KiraAudio {
    fn play(&mut self, cue: AudioCue) {
        self.cleanup();
        if let Err(e) = self.try_play(cue) {
            log::debug!("Dropped cue {:?}: {}", cue, e);
        }
    }

    fn stop_all(&mut self) {
        for handle in &mut self.active_sounds {
            let _ = handle.stop(Tween::default());
        }
        self.active_sounds.clear();
    }
}
