//! Reminder cycle.
//!
//! - `clock`: timer scheduling behind the [`Clock`] trait
//! - `event`: events published on every transition
//! - `machine`: the [`ReminderCycle`] state machine

pub mod clock;
pub mod event;
pub mod machine;

pub use clock::{Clock, ManualClock, TimerHandle, TimerId, TokioClock};
pub use event::{BreakEndReason, CycleEvent};
pub use machine::{Collaborators, ReminderCycle};
