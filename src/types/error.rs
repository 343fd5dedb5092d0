//! Configuration error types.

use thiserror::Error;

/// Errors raised when a configuration change is rejected.
///
/// A rejected change never alters the configuration that was in effect
/// before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The work interval must be between one second and one day.
    #[error("invalid work interval: {0} seconds (must be between 1 and 86400)")]
    InvalidInterval(u64),

    /// The break duration must be at least one second.
    #[error("invalid break duration: {0} seconds (must be greater than zero)")]
    InvalidBreakDuration(u32),

    /// The sound name was empty or whitespace.
    #[error("sound name must not be empty")]
    EmptySoundName,
}

impl ConfigError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInterval(_) => "choose an interval between one minute and one day",
            Self::InvalidBreakDuration(_) => "choose a break of at least one second",
            Self::EmptySoundName => "run `eyesoff sounds` to list available sounds",
        }
    }
}
