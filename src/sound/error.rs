//! Sound system error types.

use thiserror::Error;

/// Errors that can occur while resolving or playing a sound.
///
/// None of these are fatal to the reminder cycle: the break proceeds
/// silently when playback fails.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio output device could be opened.
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The sound file does not exist.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// The sound path lies outside the system sound directories.
    #[error("sound path not allowed: {0}")]
    InvalidPath(String),

    /// The audio data could not be decoded.
    #[error("failed to decode sound: {0}")]
    DecodeError(String),

    /// The output stream or sink could not be created.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Any other playback failure.
    #[error("sound playback failed: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the sound file itself.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::InvalidPath(_) | Self::DecodeError(_)
        )
    }

    /// Returns true if playback should retry with the built-in chime.
    #[must_use]
    pub fn should_fallback_to_chime(&self) -> bool {
        self.is_file_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) | Self::StreamError(_) => {
                "check your audio output settings or run with --no-sound"
            }
            Self::FileNotFound(_) | Self::InvalidPath(_) => {
                "run `eyesoff sounds` to list available sounds"
            }
            Self::DecodeError(_) => "the sound file may be corrupted; pick another sound",
            Self::PlaybackError(_) => "restart EyesOff",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert_eq!(err.to_string(), "audio device not available: no device");

        let err = SoundError::FileNotFound("/path/to/sound.aiff".to_string());
        assert!(err.to_string().contains("/path/to/sound.aiff"));

        let err = SoundError::InvalidPath("/tmp/x.wav".to_string());
        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn test_classification() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::DecodeError("x".into()).is_device_error());

        assert!(SoundError::InvalidPath("x".into()).is_file_error());
        assert!(SoundError::DecodeError("x".into()).is_file_error());
        assert!(!SoundError::PlaybackError("x".into()).is_file_error());
    }

    #[test]
    fn test_should_fallback_to_chime() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_chime());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_chime());
        assert!(!SoundError::StreamError("x".into()).should_fallback_to_chime());
    }

    #[test]
    fn test_suggestion() {
        assert!(SoundError::StreamError("x".into())
            .suggestion()
            .contains("--no-sound"));
        assert!(SoundError::FileNotFound("x".into())
            .suggestion()
            .contains("eyesoff sounds"));
    }
}
