//! Sound playback for break alerts.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   play_named("Submarine")
//! │   SoundPlayer    │ ◀──────────────────────── ReminderCycle
//! └────────┬─────────┘
//!          │ resolve_sound
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundSource    │────▶│  System Sounds   │
//! │                  │     │  (/System/...)   │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  Built-in chime  │
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```
//!
//! The cycle only knows sound *names*; turning a name into a file is done
//! here, behind the [`SoundPlayer`] trait.
//!
//! # Usage
//!
//! ```rust,no_run
//! use eyesoff::sound::{RodioSoundPlayer, SoundPlayer};
//!
//! let player = RodioSoundPlayer::new().expect("audio init");
//! player.play_named("Submarine").expect("playback failed");
//! ```

mod embedded;
mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub use embedded::{chime_duration, chime_sources, ChimeNote, CHIME_VOLUME, FALLBACK_CHIME};
pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::{
    available_sound_names, discover_system_sounds, find_system_sound, resolve_sound, SoundSource,
    BUILTIN_SOUND_NAMES,
};

/// Sound playback collaborator.
pub trait SoundPlayer {
    /// Plays a sound without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Resolves a sound name and plays it.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play_named(&self, name: &str) -> Result<(), SoundError> {
        self.play(&resolve_sound(name))
    }

    /// Returns true if an output device is available.
    fn is_available(&self) -> bool;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Player used when no audio device could be opened.
#[derive(Debug, Default)]
pub struct SilentSoundPlayer;

impl SoundPlayer for SilentSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        tracing::debug!(sound = source.name(), "no audio device, sound skipped");
        Ok(())
    }

    fn play_named(&self, name: &str) -> Result<(), SoundError> {
        tracing::debug!(sound = name, "no audio device, sound skipped");
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Opens the audio device, or returns a silent player when there is none.
#[must_use]
pub fn create_player() -> Arc<dyn SoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Arc::new(player),
        Err(e) => {
            tracing::warn!(error = %e, "audio not available, sounds silenced");
            Arc::new(SilentSoundPlayer)
        }
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    available: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    /// Returns the names of the sounds played, in order.
    #[must_use]
    pub fn played_names(&self) -> Vec<String> {
        self.calls().iter().map(|s| s.name().to_string()).collect()
    }

    pub fn clear_calls(&self) {
        self.calls().clear();
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<SoundSource>> {
        self.play_calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("mock failure".to_string()));
        }
        self.calls().push(source.clone());
        Ok(())
    }

    // Skips the filesystem scan so tests see the exact name requested.
    fn play_named(&self, name: &str) -> Result<(), SoundError> {
        self.play(&SoundSource::embedded(name))
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
