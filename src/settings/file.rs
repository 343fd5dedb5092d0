//! JSON-file settings store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::SettingsError;
use super::{settings_dir, SettingsStore};
use crate::types::ReminderConfig;

/// Settings file name inside `~/.eyesoff`.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// What is written to disk. Only the sound survives restarts; the
/// interval always comes from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedSettings {
    #[serde(default = "default_sound")]
    selected_sound: String,
}

fn default_sound() -> String {
    ReminderConfig::DEFAULT_SOUND_NAME.to_string()
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            selected_sound: default_sound(),
        }
    }
}

/// Stores the selected sound in a JSON file.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    work_interval_seconds: u64,
    current: Mutex<PersistedSettings>,
}

impl JsonSettingsStore {
    /// Opens the store at `path`.
    ///
    /// A missing file means defaults. An unreadable or corrupt file is
    /// logged and also treated as defaults; it is overwritten on the next
    /// save.
    pub fn open(path: impl Into<PathBuf>, work_interval_seconds: u64) -> Self {
        let path = path.into();
        let current = match Self::load(&path) {
            Ok(Some(settings)) => {
                debug!(path = %path.display(), "settings loaded");
                settings
            }
            Ok(None) => PersistedSettings::default(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable settings file");
                PersistedSettings::default()
            }
        };

        Self {
            path,
            work_interval_seconds,
            current: Mutex::new(current),
        }
    }

    /// Opens `~/.eyesoff/settings.json`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::HomeDirNotFound` if there is no home directory.
    pub fn open_default(work_interval_seconds: u64) -> Result<Self, SettingsError> {
        let path = settings_dir()?.join(SETTINGS_FILE_NAME);
        Ok(Self::open(path, work_interval_seconds))
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Option<PersistedSettings>, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SettingsError::io(path, e)),
        };

        let mut settings: PersistedSettings = serde_json::from_str(&contents)?;
        if settings.selected_sound.trim().is_empty() {
            settings.selected_sound = default_sound();
        }
        Ok(Some(settings))
    }

    fn save(&self, settings: &PersistedSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
        }

        let contents = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| SettingsError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| SettingsError::io(&self.path, e))?;

        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    fn current(&self) -> MutexGuard<'_, PersistedSettings> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for JsonSettingsStore {
    fn selected_sound(&self) -> String {
        self.current().selected_sound.clone()
    }

    fn set_selected_sound(&self, name: &str) -> Result<(), SettingsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsError::EmptySoundName);
        }

        let updated = PersistedSettings {
            selected_sound: name.to_string(),
        };
        self.save(&updated)?;
        *self.current() = updated;
        Ok(())
    }

    fn work_interval_seconds(&self) -> u64 {
        self.work_interval_seconds
    }
}
