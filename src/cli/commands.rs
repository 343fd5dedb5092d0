//! Command definitions for the EyesOff CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::ReminderConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// EyesOff - rest your eyes with the 20-20-20 rule
#[derive(Parser, Debug)]
#[command(
    name = "eyesoff",
    version,
    about = "Menu bar reminder for the 20-20-20 eye rest rule",
    long_about = "Every 20 minutes, look at something 20 feet away for 20 seconds.\n\
                  EyesOff lives in the macOS menu bar, plays a sound and posts a \
                  notification when it is time for a break.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the reminder in the menu bar
    Run(RunArgs),

    /// List the available alert sounds
    Sounds,

    /// Launch EyesOff automatically at login
    Install,

    /// Stop launching EyesOff at login
    Uninstall,

    /// Show version and credits
    About,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Upper bound for `--interval-seconds`, in clap's range type.
const MAX_INTERVAL_SECONDS_ARG: u64 = ReminderConfig::MAX_WORK_INTERVAL_SECONDS;

/// Arguments for the run command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Minutes between breaks (1-240)
    #[arg(
        short,
        long,
        default_value = "20",
        value_parser = clap::value_parser!(u64).range(1..=240)
    )]
    pub interval: u64,

    /// Seconds between breaks (1-86400); overrides --interval
    #[arg(
        long,
        conflicts_with = "interval",
        value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECONDS_ARG)
    )]
    pub interval_seconds: Option<u64>,

    /// Break length in seconds (1-600)
    #[arg(
        short = 'b',
        long = "break",
        default_value = "20",
        value_parser = clap::value_parser!(u32).range(1..=600)
    )]
    pub break_seconds: u32,

    /// Alert sound name (see `eyesoff sounds`); remembered for next time
    #[arg(short, long, value_parser = validate_sound_arg)]
    pub sound: Option<String>,

    /// Do not post system notifications
    #[arg(long)]
    pub no_notifications: bool,

    /// Start with the alert sound muted (toggle with "Play Sound")
    #[arg(long)]
    pub no_sound: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            interval: ReminderConfig::DEFAULT_WORK_INTERVAL_SECONDS / 60,
            interval_seconds: None,
            break_seconds: ReminderConfig::DEFAULT_BREAK_DURATION_SECONDS,
            sound: None,
            no_notifications: false,
            no_sound: false,
        }
    }
}

impl RunArgs {
    /// Work interval in seconds after applying `--interval-seconds`.
    pub fn work_interval_seconds(&self) -> u64 {
        self.interval_seconds.unwrap_or(self.interval * 60)
    }

    /// Builds the cycle configuration. `saved_sound` is used unless
    /// `--sound` was given.
    pub fn to_config(&self, saved_sound: &str) -> ReminderConfig {
        let sound = self.sound.as_deref().unwrap_or(saved_sound);
        ReminderConfig::default()
            .with_work_interval_seconds(self.work_interval_seconds())
            .with_break_duration_seconds(self.break_seconds)
            .with_sound(sound)
            .with_notifications(!self.no_notifications)
            .with_sound_enabled(!self.no_sound)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the sound name: non-blank, at most 64 characters.
fn validate_sound_arg(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("sound name must not be empty".to_string());
    }
    if trimmed.chars().count() > 64 {
        return Err("sound name must be 64 characters or fewer".to_string());
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================
