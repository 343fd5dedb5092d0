//! Events published by the reminder cycle.

use serde::{Deserialize, Serialize};

/// Why a break ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEndReason {
    /// The countdown reached zero.
    Elapsed,
    /// The user dismissed the alert.
    Acknowledged,
}

impl BreakEndReason {
    /// Returns the reason as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elapsed => "elapsed",
            Self::Acknowledged => "acknowledged",
        }
    }
}

/// Cycle events for the console display and the menu bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// The work timer was (re)started
    WorkStarted {
        /// Interval until the next break
        interval_seconds: u64,
    },
    /// A break alert was raised
    BreakStarted {
        /// Countdown start value
        remaining_seconds: u32,
    },
    /// One second of the break elapsed
    Tick {
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// The break ended and the cycle is back to work
    BreakEnded {
        /// How the break ended
        reason: BreakEndReason,
    },
    /// The work interval was changed
    IntervalChanged {
        /// New interval
        seconds: u64,
    },
    /// A different sound was selected
    SoundChanged {
        /// Sound name
        name: String,
    },
    /// Notifications were switched on or off
    NotificationsToggled {
        /// New setting
        enabled: bool,
    },
    /// The break sound was muted or unmuted
    SoundToggled {
        /// New setting
        enabled: bool,
    },
    /// All timers were cancelled
    Stopped,
}

impl CycleEvent {
    /// Returns true for events that change the break phase.
    pub fn is_phase_change(&self) -> bool {
        matches!(
            self,
            Self::BreakStarted { .. } | Self::BreakEnded { .. } | Self::Stopped
        )
    }
}
