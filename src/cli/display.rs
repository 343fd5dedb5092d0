//! Console output for the EyesOff CLI.
//!
//! This module provides formatted output for:
//! - Cycle events while the menu bar app runs
//! - One-shot command results
//! - Error messages

use crate::cycle::{BreakEndReason, CycleEvent};
use crate::menubar::describe_interval;
use crate::types::CycleSnapshot;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats a cycle event as one console line.
    ///
    /// Ticks return `None`; printing every second would flood the terminal.
    pub fn format_event(event: &CycleEvent) -> Option<String> {
        let line = match event {
            CycleEvent::WorkStarted { interval_seconds } => {
                format!("> Next break in {}", describe_interval(*interval_seconds))
            }
            CycleEvent::BreakStarted { remaining_seconds } => format!(
                "👁️ Break time! Look 20 feet away for {remaining_seconds}s"
            ),
            CycleEvent::Tick { .. } => return None,
            CycleEvent::BreakEnded { reason } => match reason {
                BreakEndReason::Elapsed => "* Break finished".to_string(),
                BreakEndReason::Acknowledged => "* Break acknowledged".to_string(),
            },
            CycleEvent::IntervalChanged { seconds } => {
                format!("* Interval set to {}", describe_interval(*seconds))
            }
            CycleEvent::SoundChanged { name } => format!("* Sound set to {name}"),
            CycleEvent::NotificationsToggled { enabled } => {
                let state = if *enabled { "on" } else { "off" };
                format!("* Notifications {state}")
            }
            CycleEvent::SoundToggled { enabled } => {
                let state = if *enabled { "on" } else { "muted" };
                format!("* Sound {state}")
            }
            CycleEvent::Stopped => "[] EyesOff stopped".to_string(),
        };
        Some(line)
    }

    /// Prints a cycle event.
    pub fn show_event(event: &CycleEvent) {
        if let Some(line) = Self::format_event(event) {
            println!("{line}");
        }
    }

    /// Shows the startup banner.
    pub fn show_started(snapshot: &CycleSnapshot) {
        println!("👁️ EyesOff is running in the menu bar");
        println!(
            "  Interval: {}",
            describe_interval(snapshot.work_interval_seconds)
        );
        println!("  Break: {}s", snapshot.break_duration_seconds);
        if snapshot.sound_enabled {
            println!("  Sound: {}", snapshot.selected_sound_name);
        } else {
            println!("  Sound: muted");
        }
        if !snapshot.notifications_enabled {
            println!("  Notifications: off");
        }
    }

    /// Lists sounds, marking the selected one.
    pub fn show_sounds(names: &[String], selected: &str) {
        for name in names {
            let marker = if name == selected { "*" } else { " " };
            println!("{marker} {name}");
        }
    }

    /// Shows a success message for login-item installation.
    pub fn show_install_success() {
        println!("* EyesOff will launch at login");
    }

    /// Shows a success message for login-item removal.
    pub fn show_uninstall_success() {
        println!("* EyesOff will no longer launch at login");
    }

    /// Shows the about text.
    pub fn show_about() {
        println!("{}", about_text());
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }
}

/// About text shared by the CLI and the menu.
pub fn about_text() -> String {
    format!(
        "EyesOff {}\n\
         Every 20 minutes, look at something 20 feet away for 20 seconds.\n\
         Sounds come from /System/Library/Sounds and /Library/Sounds.",
        env!("CARGO_PKG_VERSION")
    )
}

// ============================================================================
// Tests
// ============================================================================
