//! User preferences.
//!
//! The only persisted preference is the selected sound. The work interval
//! is exposed through the same trait so the cycle has one place to ask,
//! but it is supplied at startup and never written to disk.

mod error;
mod file;

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

pub use error::SettingsError;
pub use file::{JsonSettingsStore, SETTINGS_FILE_NAME};

use crate::types::ReminderConfig;

/// Directory holding EyesOff's own files (`~/.eyesoff`).
///
/// # Errors
///
/// Returns `SettingsError::HomeDirNotFound` if there is no home directory.
pub fn settings_dir() -> Result<PathBuf, SettingsError> {
    dirs::home_dir()
        .map(|home| home.join(".eyesoff"))
        .ok_or(SettingsError::HomeDirNotFound)
}

/// Settings collaborator.
pub trait SettingsStore {
    /// Returns the persisted sound name ("Submarine" if none was saved).
    fn selected_sound(&self) -> String;

    /// Persists a new sound name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or could not be saved.
    fn set_selected_sound(&self, name: &str) -> Result<(), SettingsError>;

    /// Returns the work interval supplied at startup.
    fn work_interval_seconds(&self) -> u64;
}

/// In-memory store for tests and `--no-save` style runs.
#[derive(Debug)]
pub struct MemorySettingsStore {
    selected_sound: Mutex<String>,
    work_interval_seconds: u64,
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new(ReminderConfig::DEFAULT_WORK_INTERVAL_SECONDS)
    }
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new(work_interval_seconds: u64) -> Self {
        Self {
            selected_sound: Mutex::new(ReminderConfig::DEFAULT_SOUND_NAME.to_string()),
            work_interval_seconds,
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn selected_sound(&self) -> String {
        self.selected_sound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_selected_sound(&self, name: &str) -> Result<(), SettingsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsError::EmptySoundName);
        }
        *self
            .selected_sound
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = name.to_string();
        Ok(())
    }

    fn work_interval_seconds(&self) -> u64 {
        self.work_interval_seconds
    }
}
