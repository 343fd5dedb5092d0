//! Built-in fallback chime.
//!
//! Played when the selected sound cannot be found on disk (for example on
//! machines without `/System/Library/Sounds`). The chime is synthesized, so
//! no audio data ships in the binary.

use std::time::Duration;

use rodio::source::{SineWave, Source};

/// One note of the fallback chime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeNote {
    /// Pitch in hertz.
    pub frequency_hz: f32,
    /// Note length in milliseconds.
    pub duration_ms: u64,
}

/// Two descending notes, soft enough not to startle.
pub const FALLBACK_CHIME: &[ChimeNote] = &[
    ChimeNote {
        frequency_hz: 880.0,
        duration_ms: 160,
    },
    ChimeNote {
        frequency_hz: 660.0,
        duration_ms: 240,
    },
];

/// Playback gain applied to every chime note.
pub const CHIME_VOLUME: f32 = 0.2;

/// Returns the chime as playable rodio sources, in order.
pub fn chime_sources() -> impl Iterator<Item = impl Source<Item = f32> + Send + 'static> {
    FALLBACK_CHIME.iter().map(|note| {
        SineWave::new(note.frequency_hz)
            .take_duration(Duration::from_millis(note.duration_ms))
            .amplify(CHIME_VOLUME)
    })
}

/// Returns the total length of the chime.
#[must_use]
pub fn chime_duration() -> Duration {
    FALLBACK_CHIME
        .iter()
        .map(|note| Duration::from_millis(note.duration_ms))
        .sum()
}
