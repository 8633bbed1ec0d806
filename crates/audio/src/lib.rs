//! Audio cue port: fire-and-forget sound triggers for game events.
//!
//! The simulation never depends on audio. Every sink may silently drop cues,
//! and [`NullAudio`] drops all of them.

#[cfg(feature = "kira-backend")]
mod kira_backend;

#[cfg(feature = "kira-backend")]
pub use kira_backend::KiraAudio;

/// Named sound events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    ClueGrab,
    Gunshot,
    PistolToggle,
    Win,
    Fail,
    /// Background loop started when a case begins.
    Ambience,
}

impl AudioCue {
    pub const ALL: [AudioCue; 6] = [
        AudioCue::ClueGrab,
        AudioCue::Gunshot,
        AudioCue::PistolToggle,
        AudioCue::Win,
        AudioCue::Fail,
        AudioCue::Ambience,
    ];

    /// File stem used when loading the cue from a sound directory.
    pub fn file_stem(&self) -> &'static str {
        match self {
            AudioCue::ClueGrab => "clue_grab",
            AudioCue::Gunshot => "gunshot",
            AudioCue::PistolToggle => "pistol_toggle",
            AudioCue::Win => "win",
            AudioCue::Fail => "fail",
            AudioCue::Ambience => "ambience",
        }
    }
}

/// Anything that can play cues.
pub trait AudioPort {
    /// Trigger a cue. Never fails; unavailable cues are skipped.
    fn play(&mut self, cue: AudioCue);

    /// Stop everything that is playing, e.g. when a case ends.
    fn stop_all(&mut self) {}
}

/// Sink used when no audio device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioPort for NullAudio {
    fn play(&mut self, cue: AudioCue) {
        log::trace!("audio disabled, dropping {:?}", cue);
    }
}

/// Sink that records cues in order. Handy for tests and replays.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<AudioCue>,
    pub stops: usize,
}

impl AudioPort for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.played.push(cue);
    }

    fn stop_all(&mut self) {
        self.stops += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn file_stems_are_unique() {
        let stems: HashSet<_> = AudioCue::ALL.iter().map(|c| c.file_stem()).collect();
        assert_eq!(stems.len(), AudioCue::ALL.len());
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingAudio::default();
        sink.play(AudioCue::PistolToggle);
        sink.play(AudioCue::Gunshot);
        sink.stop_all();
        assert_eq!(sink.played, vec![AudioCue::PistolToggle, AudioCue::Gunshot]);
        assert_eq!(sink.stops, 1);
    }
}
