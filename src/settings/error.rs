//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving preferences.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The home directory could not be determined.
    #[error("home directory not found")]
    HomeDirNotFound,

    /// Reading or writing the settings file failed.
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings could not be serialized.
    #[error("invalid settings data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An empty sound name was given.
    #[error("sound name must not be empty")]
    EmptySoundName,
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SettingsError::HomeDirNotFound.to_string(),
            "home directory not found"
        );

        let err = SettingsError::io(
            "/tmp/settings.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/settings.json"));
        assert!(err.to_string().contains("denied"));
    }
}
