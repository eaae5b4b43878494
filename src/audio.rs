//! Audio cue playback
//!
//! The engine only reports which cues fired; a sink decides what to do with
//! them. The terminal has no mixer, so the audible sink rings the bell.

use std::io::Write;

use tracing::{debug, warn};

use crate::game::SoundCue;

/// Consumer of audio cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    fn set_muted(&mut self, _muted: bool) {}
}

/// Drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: SoundCue) {
        debug!(?cue, "cue (silent)");
    }
}

/// Rings the terminal bell for cues worth hearing
pub struct BellAudio<W: Write> {
    out: W,
    muted: bool,
}

impl<W: Write> BellAudio<W> {
    pub fn new(out: W) -> Self {
        Self { out, muted: false }
    }

    /// Food pickups are too frequent to beep for
    fn is_audible(cue: SoundCue) -> bool {
        matches!(cue, SoundCue::BonusSpawned | SoundCue::GameOver)
    }
}

impl<W: Write> AudioSink for BellAudio<W> {
    fn play(&mut self, cue: SoundCue) {
        debug!(?cue, muted = self.muted, "cue");
        if self.muted || !Self::is_audible(cue) {
            return;
        }
        if let Err(err) = self.out.write_all(b"\x07").and_then(|()| self.out.flush()) {
            warn!(error = %err, "failed to ring terminal bell");
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
