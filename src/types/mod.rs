//! Core data types for EyesOff.
//!
//! This module defines the data structures used for:
//! - Reminder configuration with validation
//! - Cycle phase tracking
//! - Read-only snapshots of the cycle for UI layers

mod error;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

// ============================================================================
// CyclePhase
// ============================================================================

/// Represents the current phase of the reminder cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Work period; the work timer is armed
    Working,
    /// Break alert is being brought up
    AlertActive,
    /// Break alert is visible and counting down
    CountingDown,
}

impl CyclePhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Working => "working",
            CyclePhase::AlertActive => "alert_active",
            CyclePhase::CountingDown => "counting_down",
        }
    }

    /// Returns true if a break is in flight.
    pub fn is_break(&self) -> bool {
        matches!(self, CyclePhase::AlertActive | CyclePhase::CountingDown)
    }
}

impl Default for CyclePhase {
    fn default() -> Self {
        CyclePhase::Working
    }
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ReminderConfig
// ============================================================================

/// Configuration for the reminder cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Length of the work period in seconds
    pub work_interval_seconds: u64,
    /// Length of the break countdown in seconds
    pub break_duration_seconds: u32,
    /// Name of the sound played when a break starts
    pub selected_sound_name: String,
    /// Whether a system notification accompanies the break alert
    pub notifications_enabled: bool,
    /// Whether the break sound plays at all
    pub sound_enabled: bool,
}

impl ReminderConfig {
    /// Twenty minutes of work.
    pub const DEFAULT_WORK_INTERVAL_SECONDS: u64 = 20 * 60;
    /// Longest accepted work interval: one day.
    pub const MAX_WORK_INTERVAL_SECONDS: u64 = 24 * 60 * 60;
    /// Twenty seconds of looking away.
    pub const DEFAULT_BREAK_DURATION_SECONDS: u32 = 20;
    /// Sound used until the user picks another one.
    pub const DEFAULT_SOUND_NAME: &'static str = "Submarine";

    /// Sets the work interval in seconds.
    pub fn with_work_interval_seconds(mut self, seconds: u64) -> Self {
        self.work_interval_seconds = seconds;
        self
    }

    /// Sets the break duration in seconds.
    pub fn with_break_duration_seconds(mut self, seconds: u32) -> Self {
        self.break_duration_seconds = seconds;
        self
    }

    /// Sets the selected sound name.
    pub fn with_sound(mut self, name: impl Into<String>) -> Self {
        self.selected_sound_name = name.into();
        self
    }

    /// Enables or disables notifications.
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    /// Mutes or unmutes the break sound.
    pub fn with_sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_interval(self.work_interval_seconds)?;
        if self.break_duration_seconds == 0 {
            return Err(ConfigError::InvalidBreakDuration(self.break_duration_seconds));
        }
        validate_sound_name(&self.selected_sound_name)?;
        Ok(())
    }

    /// Returns the work interval as a `Duration`.
    pub fn work_interval(&self) -> Duration {
        Duration::from_secs(self.work_interval_seconds)
    }

    /// Returns the break duration as a `Duration`.
    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.break_duration_seconds))
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            work_interval_seconds: Self::DEFAULT_WORK_INTERVAL_SECONDS,
            break_duration_seconds: Self::DEFAULT_BREAK_DURATION_SECONDS,
            selected_sound_name: Self::DEFAULT_SOUND_NAME.to_string(),
            notifications_enabled: true,
            sound_enabled: true,
        }
    }
}

/// Checks that a work interval is usable.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidInterval`] for zero or anything longer
/// than [`ReminderConfig::MAX_WORK_INTERVAL_SECONDS`].
pub fn validate_interval(seconds: u64) -> Result<(), ConfigError> {
    if seconds == 0 || seconds > ReminderConfig::MAX_WORK_INTERVAL_SECONDS {
        return Err(ConfigError::InvalidInterval(seconds));
    }
    Ok(())
}

/// Checks that a sound name is usable.
///
/// # Errors
///
/// Returns [`ConfigError::EmptySoundName`] for empty or blank names.
pub fn validate_sound_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::EmptySoundName);
    }
    Ok(())
}

// ============================================================================
// IntervalPreset
// ============================================================================

/// Work interval presets offered in the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalPreset {
    /// 10 minutes
    Ten,
    /// 20 minutes
    Twenty,
    /// 30 minutes
    Thirty,
}

impl IntervalPreset {
    /// All presets in menu order.
    pub const ALL: [IntervalPreset; 3] = [
        IntervalPreset::Ten,
        IntervalPreset::Twenty,
        IntervalPreset::Thirty,
    ];

    /// Returns the preset length in minutes.
    pub fn minutes(&self) -> u64 {
        match self {
            IntervalPreset::Ten => 10,
            IntervalPreset::Twenty => 20,
            IntervalPreset::Thirty => 30,
        }
    }

    /// Returns the preset length in seconds.
    pub fn seconds(&self) -> u64 {
        self.minutes() * 60
    }

    /// Returns the menu label, e.g. "20 minutes".
    pub fn label(&self) -> String {
        format!("{} minutes", self.minutes())
    }

    /// Finds the preset matching an interval, if any.
    pub fn from_seconds(seconds: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.seconds() == seconds)
    }

    /// Finds the preset matching a minute count, if any.
    pub fn from_minutes(minutes: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.minutes() == minutes)
    }
}

// ============================================================================
// CycleSnapshot
// ============================================================================

/// Read-only view of the reminder cycle for display layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    /// Current phase
    pub phase: CyclePhase,
    /// Seconds left in the break (0 outside a break)
    pub remaining_seconds: u32,
    /// Work interval in effect
    pub work_interval_seconds: u64,
    /// Break duration in effect
    pub break_duration_seconds: u32,
    /// Currently selected sound
    pub selected_sound_name: String,
    /// Whether notifications accompany break alerts
    pub notifications_enabled: bool,
    /// Whether the break sound plays
    pub sound_enabled: bool,
    /// Whether the cycle has been started and not stopped
    pub running: bool,
    /// Number of breaks that have ended so far
    pub breaks_completed: u32,
}

impl CycleSnapshot {
    /// Returns true if a break is in flight.
    pub fn is_break(&self) -> bool {
        self.phase.is_break()
    }
}

impl Default for CycleSnapshot {
    fn default() -> Self {
        let config = ReminderConfig::default();
        Self {
            phase: CyclePhase::Working,
            remaining_seconds: 0,
            work_interval_seconds: config.work_interval_seconds,
            break_duration_seconds: config.break_duration_seconds,
            selected_sound_name: config.selected_sound_name,
            notifications_enabled: config.notifications_enabled,
            sound_enabled: config.sound_enabled,
            running: false,
            breaks_completed: 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // CyclePhase Tests
    // ------------------------------------------------------------------------

    mod cycle_phase_tests {
        use super::*;

        #[test]
        fn test_default_is_working() {
            assert_eq!(CyclePhase::default(), CyclePhase::Working);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(CyclePhase::Working.as_str(), "working");
            assert_eq!(CyclePhase::AlertActive.as_str(), "alert_active");
            assert_eq!(CyclePhase::CountingDown.as_str(), "counting_down");
        }

        #[test]
        fn test_is_break() {
            assert!(!CyclePhase::Working.is_break());
            assert!(CyclePhase::AlertActive.is_break());
            assert!(CyclePhase::CountingDown.is_break());
        }

        #[test]
        fn test_serialize_matches_as_str() {
            for phase in [
                CyclePhase::Working,
                CyclePhase::AlertActive,
                CyclePhase::CountingDown,
            ] {
                let json = serde_json::to_string(&phase).unwrap();
                assert_eq!(json, format!("\"{}\"", phase.as_str()));
            }
        }
    }

    // ------------------------------------------------------------------------
    // ReminderConfig Tests
    // ------------------------------------------------------------------------

    mod reminder_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = ReminderConfig::default();
            assert_eq!(config.work_interval_seconds, 1200);
            assert_eq!(config.break_duration_seconds, 20);
            assert_eq!(config.selected_sound_name, "Submarine");
            assert!(config.notifications_enabled);
            assert!(config.sound_enabled);
        }

        #[test]
        fn test_builder_pattern() {
            let config = ReminderConfig::default()
                .with_work_interval_seconds(5)
                .with_break_duration_seconds(3)
                .with_sound("Glass")
                .with_notifications(false)
                .with_sound_enabled(false);

            assert_eq!(config.work_interval_seconds, 5);
            assert_eq!(config.break_duration_seconds, 3);
            assert_eq!(config.selected_sound_name, "Glass");
            assert!(!config.notifications_enabled);
            assert!(!config.sound_enabled);
        }

        #[test]
        fn test_validate_default_ok() {
            assert!(ReminderConfig::default().validate().is_ok());
        }

        #[test]
        fn test_validate_zero_interval() {
            let config = ReminderConfig::default().with_work_interval_seconds(0);
            assert_eq!(config.validate(), Err(ConfigError::InvalidInterval(0)));
        }

        #[test]
        fn test_validate_interval_upper_bound() {
            let max = ReminderConfig::MAX_WORK_INTERVAL_SECONDS;
            assert_eq!(validate_interval(max), Ok(()));
            assert_eq!(
                validate_interval(max + 1),
                Err(ConfigError::InvalidInterval(max + 1))
            );
            assert_eq!(
                validate_interval(u64::MAX),
                Err(ConfigError::InvalidInterval(u64::MAX))
            );
        }

        #[test]
        fn test_validate_zero_break() {
            let config = ReminderConfig::default().with_break_duration_seconds(0);
            assert_eq!(config.validate(), Err(ConfigError::InvalidBreakDuration(0)));
        }

        #[test]
        fn test_validate_blank_sound() {
            let config = ReminderConfig::default().with_sound("   ");
            assert_eq!(config.validate(), Err(ConfigError::EmptySoundName));
        }

        #[test]
        fn test_durations() {
            let config = ReminderConfig::default();
            assert_eq!(config.work_interval(), Duration::from_secs(1200));
            assert_eq!(config.break_duration(), Duration::from_secs(20));
        }
    }

    // ------------------------------------------------------------------------
    // IntervalPreset Tests
    // ------------------------------------------------------------------------

    mod interval_preset_tests {
        use super::*;

        #[test]
        fn test_minutes_and_seconds() {
            assert_eq!(IntervalPreset::Ten.seconds(), 600);
            assert_eq!(IntervalPreset::Twenty.seconds(), 1200);
            assert_eq!(IntervalPreset::Thirty.seconds(), 1800);
        }

        #[test]
        fn test_label() {
            assert_eq!(IntervalPreset::Twenty.label(), "20 minutes");
        }

        #[test]
        fn test_from_seconds() {
            assert_eq!(IntervalPreset::from_seconds(1200), Some(IntervalPreset::Twenty));
            assert_eq!(IntervalPreset::from_seconds(20), None);
        }

        #[test]
        fn test_from_minutes() {
            assert_eq!(IntervalPreset::from_minutes(30), Some(IntervalPreset::Thirty));
            assert_eq!(IntervalPreset::from_minutes(25), None);
        }
    }

    // ------------------------------------------------------------------------
    // CycleSnapshot Tests
    // ------------------------------------------------------------------------

    mod cycle_snapshot_tests {
        use super::*;

        #[test]
        fn test_default_snapshot() {
            let snapshot = CycleSnapshot::default();
            assert_eq!(snapshot.phase, CyclePhase::Working);
            assert!(!snapshot.running);
            assert!(!snapshot.is_break());
            assert_eq!(snapshot.work_interval_seconds, 1200);
        }

        #[test]
        fn test_serialize_snapshot() {
            let snapshot = CycleSnapshot {
                phase: CyclePhase::CountingDown,
                remaining_seconds: 12,
                ..CycleSnapshot::default()
            };
            let json = serde_json::to_string(&snapshot).unwrap();
            assert!(json.contains("\"counting_down\""));
            assert!(json.contains("\"remaining_seconds\":12"));
        }
    }
}
