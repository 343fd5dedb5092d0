//! Menu bar title text.
//!
//! - Working: "👁️"
//! - Break: "👁️ 0:15"
//! - Stopped: "👁️ ⏸"

use crate::types::{CyclePhase, CycleSnapshot};

/// Eye shown in the menu bar at all times
const EYE_EMOJI: &str = "👁️";

/// Suffix while no work timer runs
const STOPPED_EMOJI: &str = "⏸";

/// Builds the title text and tracks phase changes.
#[derive(Debug, Default)]
pub struct IconManager {
    last_phase: Option<CyclePhase>,
}

impl IconManager {
    pub fn new() -> Self {
        Self { last_phase: None }
    }

    /// Generates the title for the given state.
    pub fn generate_title(&self, snapshot: &CycleSnapshot) -> String {
        if snapshot.is_break() {
            Self::countdown_title(snapshot.remaining_seconds)
        } else if snapshot.running {
            EYE_EMOJI.to_string()
        } else {
            format!("{EYE_EMOJI} {STOPPED_EMOJI}")
        }
    }

    /// Title shown during a break.
    pub fn countdown_title(remaining_seconds: u32) -> String {
        format!("{EYE_EMOJI} {}", Self::format_time(remaining_seconds))
    }

    /// Returns true (and remembers the phase) when it differs from the
    /// previous call.
    pub fn phase_changed(&mut self, phase: CyclePhase) -> bool {
        let changed = self.last_phase != Some(phase);
        if changed {
            self.last_phase = Some(phase);
        }
        changed
    }

    /// Formats seconds as M:SS.
    pub fn format_time(seconds: u32) -> String {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }
}
