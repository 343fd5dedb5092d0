//! EyesOff Library
//!
//! Core of the EyesOff menu bar reminder:
//! - Reminder cycle state machine driven by a pluggable clock
//! - Collaborator traits for alerts, sounds, notifications and settings
//! - Menu bar UI with tray icon (macOS only)
//! - Native macOS notifications with a "Got it!" action (macOS only)
//! - LaunchAgent management for launch at login (macOS only)
//! - CLI command parsing and display utilities

pub mod alert;
pub mod app;
pub mod cli;
pub mod cycle;
pub mod launchagent;
pub mod menubar;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{ConfigError, CyclePhase, CycleSnapshot, IntervalPreset, ReminderConfig};

pub use cycle::{
    BreakEndReason, Clock, Collaborators, CycleEvent, ManualClock, ReminderCycle, TimerId,
    TokioClock,
};

pub use alert::{AlertHandle, AlertPresenter, BreakMessage, MockAlertPresenter, PresentationError};

pub use notification::{
    MockNotifier, NotificationActionEvent, NotificationContent, NotificationError, Notifier,
};

pub use settings::{JsonSettingsStore, MemorySettingsStore, SettingsError, SettingsStore};

pub use sound::{MockSoundPlayer, SoundError, SoundPlayer, SoundSource};

pub use menubar::{MenuAction, TrayIconManager, TrayUpdate};

pub use launchagent::{install, is_installed, uninstall, LaunchAgentError};
