//! The reminder cycle state machine.
//!
//! `ReminderCycle` owns the work timer, the break countdown and the alert
//! handle. Every clock fire enters through [`ReminderCycle::on_timer`], so
//! transitions happen one at a time on whichever task owns the cycle.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::clock::{Clock, TimerHandle, TimerId};
use super::event::{BreakEndReason, CycleEvent};
use crate::alert::{AlertHandle, AlertPresenter, BreakMessage};
use crate::notification::{NotificationContent, Notifier};
use crate::settings::SettingsStore;
use crate::sound::SoundPlayer;
use crate::types::{
    validate_interval, validate_sound_name, ConfigError, CyclePhase, CycleSnapshot,
    ReminderConfig,
};

/// Countdown granularity.
const COUNTDOWN_PERIOD: std::time::Duration = std::time::Duration::from_secs(1);

// ============================================================================
// Collaborators
// ============================================================================

/// Platform services the cycle calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub alert: Arc<dyn AlertPresenter>,
    pub sound: Arc<dyn SoundPlayer>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

// ============================================================================
// ReminderCycle
// ============================================================================

/// Work/break cycle driven by a [`Clock`].
pub struct ReminderCycle<C: Clock> {
    config: ReminderConfig,
    phase: CyclePhase,
    remaining_seconds: u32,
    running: bool,
    breaks_completed: u32,
    clock: C,
    next_timer_id: u64,
    work_timer: Option<C::Handle>,
    countdown_timer: Option<C::Handle>,
    alert_handle: Option<AlertHandle>,
    collaborators: Collaborators,
    event_tx: mpsc::UnboundedSender<CycleEvent>,
}

impl<C: Clock> ReminderCycle<C> {
    /// Creates a stopped cycle in the `Working` phase.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field of `config`.
    pub fn new(
        config: ReminderConfig,
        clock: C,
        collaborators: Collaborators,
        event_tx: mpsc::UnboundedSender<CycleEvent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            phase: CyclePhase::Working,
            remaining_seconds: 0,
            running: false,
            breaks_completed: 0,
            clock,
            next_timer_id: 0,
            work_timer: None,
            countdown_timer: None,
            alert_handle: None,
            collaborators,
            event_tx,
        })
    }

    // ------------------------------------------------------------------------
    // Public operations
    // ------------------------------------------------------------------------

    /// Starts (or restarts) the cycle.
    ///
    /// While working, the work timer is cancelled and armed again with the
    /// current interval. During a break nothing is touched; the end of the
    /// break arms the work timer.
    pub fn start(&mut self) {
        self.running = true;

        if self.phase.is_break() {
            debug!(phase = %self.phase, "start during break; work timer resumes afterwards");
            return;
        }

        info!(
            interval_seconds = self.config.work_interval_seconds,
            "reminder cycle started"
        );
        self.restart_work_timer();
    }

    /// Cancels every timer and hides any visible alert.
    pub fn stop(&mut self) {
        self.cancel_work_timer();
        self.cancel_countdown_timer();
        self.hide_alert();

        self.phase = CyclePhase::Working;
        self.remaining_seconds = 0;
        self.running = false;

        info!("reminder cycle stopped");
        self.emit(CycleEvent::Stopped);
    }

    /// Changes the work interval.
    ///
    /// A running cycle in the `Working` phase restarts its work timer with
    /// the new interval. An in-flight break keeps counting down.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInterval`] for zero or more than a
    /// day; the previous interval and timers stay as they were.
    pub fn change_interval(&mut self, seconds: u64) -> Result<(), ConfigError> {
        if let Err(e) = validate_interval(seconds) {
            warn!(seconds, error = %e, "interval change rejected");
            return Err(e);
        }

        self.config.work_interval_seconds = seconds;
        debug!(seconds, "work interval changed");
        self.emit(CycleEvent::IntervalChanged { seconds });

        if self.running && self.phase == CyclePhase::Working {
            self.restart_work_timer();
        }
        Ok(())
    }

    /// Ends the current break early.
    ///
    /// Returns `false` (and does nothing) when no break is in flight.
    pub fn acknowledge(&mut self) -> bool {
        if !self.phase.is_break() {
            debug!("acknowledge ignored outside a break");
            return false;
        }

        self.finish_break(BreakEndReason::Acknowledged);
        true
    }

    /// Starts a break right away instead of waiting for the work timer.
    ///
    /// Returns `false` when the cycle is stopped or already in a break.
    pub fn trigger_break(&mut self) -> bool {
        if !self.running || self.phase != CyclePhase::Working {
            debug!(running = self.running, phase = %self.phase, "manual break ignored");
            return false;
        }

        self.enter_alert();
        true
    }

    /// Selects the sound played when a break starts and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySoundName`] for blank names.
    pub fn select_sound(&mut self, name: &str) -> Result<(), ConfigError> {
        validate_sound_name(name)?;

        let name = name.trim().to_string();
        if let Err(e) = self.collaborators.settings.set_selected_sound(&name) {
            warn!(error = %e, "failed to persist sound selection");
        }

        self.config.selected_sound_name = name.clone();
        self.emit(CycleEvent::SoundChanged { name });
        Ok(())
    }

    /// Plays the selected sound once, outside of any break.
    pub fn preview_sound(&self) {
        if let Err(e) = self
            .collaborators
            .sound
            .play_named(&self.config.selected_sound_name)
        {
            warn!(error = %e, "sound preview failed");
        }
    }

    /// Switches the break notification on or off.
    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        if self.config.notifications_enabled == enabled {
            return;
        }
        self.config.notifications_enabled = enabled;
        self.emit(CycleEvent::NotificationsToggled { enabled });
    }

    /// Mutes or unmutes the break sound.
    ///
    /// Muting also keeps the notification silent. [`Self::preview_sound`]
    /// still plays.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.config.sound_enabled == enabled {
            return;
        }
        self.config.sound_enabled = enabled;
        self.emit(CycleEvent::SoundToggled { enabled });
    }

    /// Routes a clock fire into the machine.
    ///
    /// Fires from timers that were cancelled or replaced are ignored.
    pub fn on_timer(&mut self, id: TimerId) {
        if self.work_timer.as_ref().map(TimerHandle::id) == Some(id) {
            self.on_work_timer_fired();
        } else if self.countdown_timer.as_ref().map(TimerHandle::id) == Some(id) {
            self.on_countdown_tick();
        } else {
            debug!(%id, "stale timer fire ignored");
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Seconds left in the current break (0 while working).
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn breaks_completed(&self) -> u32 {
        self.breaks_completed
    }

    /// Returns the clock driving this cycle.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns a read-only view for display layers.
    pub fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            work_interval_seconds: self.config.work_interval_seconds,
            break_duration_seconds: self.config.break_duration_seconds,
            selected_sound_name: self.config.selected_sound_name.clone(),
            notifications_enabled: self.config.notifications_enabled,
            sound_enabled: self.config.sound_enabled,
            running: self.running,
            breaks_completed: self.breaks_completed,
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn on_work_timer_fired(&mut self) {
        if self.phase != CyclePhase::Working {
            debug!(phase = %self.phase, "work timer fired during break; ignored");
            return;
        }
        self.enter_alert();
    }

    fn enter_alert(&mut self) {
        self.phase = CyclePhase::AlertActive;
        self.cancel_work_timer();
        self.remaining_seconds = self.config.break_duration_seconds;

        let remaining = self.remaining_seconds;
        info!(remaining_seconds = remaining, "break started");

        let message = BreakMessage::for_break(remaining);
        self.alert_handle = match self.collaborators.alert.show(&message, remaining) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "break alert could not be shown; counting down anyway");
                None
            }
        };

        let sound_name = self.config.selected_sound_name.clone();
        if self.config.sound_enabled {
            if let Err(e) = self.collaborators.sound.play_named(&sound_name) {
                warn!(sound = %sound_name, error = %e, "break sound failed");
            }
        }

        if self.config.notifications_enabled {
            let mut content = NotificationContent::break_reminder(remaining);
            if self.config.sound_enabled && !self.collaborators.sound.is_available() {
                content = content.with_sound(sound_name);
            }
            if let Err(e) = self.collaborators.notifier.send(&content) {
                warn!(error = %e, "break notification failed");
            }
        }

        self.emit(CycleEvent::BreakStarted {
            remaining_seconds: remaining,
        });

        let id = self.allocate_timer_id();
        self.countdown_timer = Some(self.clock.schedule_repeating(id, COUNTDOWN_PERIOD));
        self.phase = CyclePhase::CountingDown;
    }

    fn on_countdown_tick(&mut self) {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        let remaining = self.remaining_seconds;
        self.emit(CycleEvent::Tick {
            remaining_seconds: remaining,
        });

        if remaining == 0 {
            self.finish_break(BreakEndReason::Elapsed);
        } else if let Some(handle) = &self.alert_handle {
            self.collaborators.alert.update_countdown(handle, remaining);
        }
    }

    fn finish_break(&mut self, reason: BreakEndReason) {
        self.cancel_countdown_timer();
        self.hide_alert();

        self.remaining_seconds = 0;
        self.phase = CyclePhase::Working;
        self.breaks_completed = self.breaks_completed.saturating_add(1);

        info!(reason = reason.as_str(), "break ended");
        self.emit(CycleEvent::BreakEnded { reason });

        if self.running {
            self.restart_work_timer();
        }
    }

    // ------------------------------------------------------------------------
    // Timer plumbing
    // ------------------------------------------------------------------------

    fn restart_work_timer(&mut self) {
        self.cancel_work_timer();

        let id = self.allocate_timer_id();
        self.work_timer = Some(
            self.clock
                .schedule_repeating(id, self.config.work_interval()),
        );

        debug!(%id, interval_seconds = self.config.work_interval_seconds, "work timer armed");
        self.emit(CycleEvent::WorkStarted {
            interval_seconds: self.config.work_interval_seconds,
        });
    }

    fn cancel_work_timer(&mut self) {
        if let Some(mut timer) = self.work_timer.take() {
            timer.cancel();
        }
    }

    fn cancel_countdown_timer(&mut self) {
        if let Some(mut timer) = self.countdown_timer.take() {
            timer.cancel();
        }
    }

    fn hide_alert(&mut self) {
        if let Some(handle) = self.alert_handle.take() {
            self.collaborators.alert.hide(handle);
        }
    }

    fn allocate_timer_id(&mut self) -> TimerId {
        self.next_timer_id += 1;
        TimerId::new(self.next_timer_id)
    }

    fn emit(&self, event: CycleEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("cycle event dropped; no listener");
        }
    }
}

impl<C: Clock> Drop for ReminderCycle<C> {
    fn drop(&mut self) {
        self.cancel_work_timer();
        self.cancel_countdown_timer();
        self.hide_alert();
    }
}

// ============================================================================
// Tests
// ============================================================================
