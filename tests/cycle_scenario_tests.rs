//! Scenario tests for the reminder cycle.
//!
//! Virtual time via `ManualClock`; every collaborator is a mock. The
//! harness advances one second at a time and routes each fire into the
//! cycle, the same way the runtime loop does.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use eyesoff::alert::{AlertCall, MockAlertPresenter};
use eyesoff::cycle::{BreakEndReason, Collaborators, CycleEvent, ManualClock, ReminderCycle};
use eyesoff::notification::MockNotifier;
use eyesoff::settings::MemorySettingsStore;
use eyesoff::sound::MockSoundPlayer;
use eyesoff::types::{ConfigError, CyclePhase, ReminderConfig};

// ============================================================================
// Test Helpers
// ============================================================================

struct Scenario {
    cycle: ReminderCycle<ManualClock>,
    clock: ManualClock,
    alert: Arc<MockAlertPresenter>,
    events: mpsc::UnboundedReceiver<CycleEvent>,
    /// Virtual second at which each alert was shown.
    shown_at: Vec<u64>,
}

impl Scenario {
    fn new(work_seconds: u64, break_seconds: u32) -> Self {
        let clock = ManualClock::new();
        let alert = Arc::new(MockAlertPresenter::new());
        let (tx, events) = mpsc::unbounded_channel();

        let config = ReminderConfig::default()
            .with_work_interval_seconds(work_seconds)
            .with_break_duration_seconds(break_seconds);
        let collaborators = Collaborators {
            alert: alert.clone(),
            sound: Arc::new(MockSoundPlayer::new()),
            notifier: Arc::new(MockNotifier::new()),
            settings: Arc::new(MemorySettingsStore::new(work_seconds)),
        };
        let cycle = ReminderCycle::new(config, clock.clone(), collaborators, tx).unwrap();

        Self {
            cycle,
            clock,
            alert,
            events,
            shown_at: Vec::new(),
        }
    }

    fn now(&self) -> u64 {
        self.clock.now().as_secs()
    }

    /// Advances virtual time to `t` seconds.
    fn run_until(&mut self, t: u64) {
        while self.now() < t {
            let shows_before = self.alert.show_count();
            for id in self.clock.advance(Duration::from_secs(1)) {
                self.cycle.on_timer(id);
            }
            if self.alert.show_count() > shows_before {
                self.shown_at.push(self.now());
            }
        }
    }

    fn drain_events(&mut self) -> Vec<CycleEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    fn work_starts(events: &[CycleEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, CycleEvent::WorkStarted { .. }))
            .count()
    }
}

// ============================================================================
// Timeline Scenarios
// ============================================================================

#[test]
fn test_five_second_interval_three_second_break() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();

    s.run_until(5);
    assert_eq!(s.shown_at, vec![5]);
    assert_eq!(s.cycle.phase(), CyclePhase::CountingDown);
    assert_eq!(s.cycle.remaining_seconds(), 3);

    s.run_until(6);
    assert_eq!(s.cycle.remaining_seconds(), 2);

    s.run_until(7);
    assert_eq!(s.alert.hide_count(), 0);

    s.run_until(8);
    assert_eq!(s.alert.hide_count(), 1);
    assert_eq!(s.cycle.phase(), CyclePhase::Working);

    s.run_until(12);
    assert_eq!(s.shown_at, vec![5]);
    s.run_until(13);
    assert_eq!(s.shown_at, vec![5, 13]);
}

#[test]
fn test_acknowledge_restarts_interval_from_acknowledgment() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();
    s.run_until(6);

    assert!(s.cycle.acknowledge());
    assert_eq!(s.alert.hide_count(), 1);
    assert_eq!(s.cycle.phase(), CyclePhase::Working);

    s.run_until(10);
    assert_eq!(s.shown_at, vec![5]);
    s.run_until(11);
    assert_eq!(s.shown_at, vec![5, 11]);
}

#[test]
fn test_remaining_seconds_drop_by_one_per_tick() {
    let mut s = Scenario::new(5, 4);
    s.cycle.start();
    s.run_until(5);
    s.drain_events();

    s.run_until(9);
    let ticks: Vec<u32> = s
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            CycleEvent::Tick { remaining_seconds } => Some(remaining_seconds),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![3, 2, 1, 0]);
    assert_eq!(s.alert.countdown_updates(), vec![3, 2, 1]);
}

#[test]
fn test_one_alert_per_interval_over_many_cycles() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();

    // Each cycle is 5s of work plus 3s of break.
    s.run_until(5 + 8 * 9);
    assert_eq!(s.shown_at, vec![5, 13, 21, 29, 37, 45, 53, 61, 69, 77]);
    assert_eq!(s.alert.max_visible(), 1);
}

// ============================================================================
// Acknowledgment
// ============================================================================

#[test]
fn test_repeated_acknowledge_is_single_transition() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();
    s.run_until(5);
    s.drain_events();

    let results: Vec<bool> = (0..5).map(|_| s.cycle.acknowledge()).collect();
    assert_eq!(results, vec![true, false, false, false, false]);

    let events = s.drain_events();
    assert_eq!(Scenario::work_starts(&events), 1);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(
                e,
                CycleEvent::BreakEnded {
                    reason: BreakEndReason::Acknowledged
                }
            ))
            .count(),
        1
    );
    assert_eq!(s.clock.active_timer_count(), 1);
}

#[test]
fn test_acknowledge_while_working_does_nothing() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();
    s.run_until(2);
    s.drain_events();

    assert!(!s.cycle.acknowledge());
    assert!(s.drain_events().is_empty());
    assert!(s.alert.calls().is_empty());
}

// ============================================================================
// Interval Changes
// ============================================================================

#[test]
fn test_consecutive_interval_changes_leave_one_timer() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();

    s.cycle.change_interval(8).unwrap();
    s.cycle.change_interval(4).unwrap();

    let ids = s.clock.active_timer_ids();
    assert_eq!(ids.len(), 1);
    assert_eq!(s.clock.period_of(ids[0]), Some(Duration::from_secs(4)));

    s.run_until(4);
    assert_eq!(s.shown_at, vec![4]);
}

#[test]
fn test_invalid_interval_keeps_previous_timer() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();
    s.run_until(2);
    let before = s.clock.active_timer_ids();
    s.drain_events();

    assert_eq!(
        s.cycle.change_interval(0),
        Err(ConfigError::InvalidInterval(0))
    );
    assert_eq!(s.clock.active_timer_ids(), before);
    assert_eq!(s.cycle.config().work_interval_seconds, 5);
    assert_eq!(Scenario::work_starts(&s.drain_events()), 0);

    s.run_until(5);
    assert_eq!(s.shown_at, vec![5]);
}

#[test]
fn test_interval_change_mid_break_does_not_overlap_alerts() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();
    s.run_until(6);

    s.cycle.change_interval(1).unwrap();
    assert_eq!(s.cycle.remaining_seconds(), 2);

    // Break ends at t=8; the 1s interval starts only then.
    s.run_until(8);
    assert_eq!(s.shown_at, vec![5]);
    s.run_until(9);
    assert_eq!(s.shown_at, vec![5, 9]);
    assert_eq!(s.alert.max_visible(), 1);
}

// ============================================================================
// Failure Policy
// ============================================================================

#[test]
fn test_presentation_failure_still_returns_to_working() {
    let mut s = Scenario::new(5, 3);
    s.alert.set_should_fail(true);
    s.cycle.start();

    s.run_until(5);
    assert_eq!(s.cycle.phase(), CyclePhase::CountingDown);
    assert!(s.alert.calls().is_empty());

    s.run_until(8);
    assert_eq!(s.cycle.phase(), CyclePhase::Working);
    assert_eq!(s.cycle.breaks_completed(), 1);

    s.alert.set_should_fail(false);
    s.run_until(13);
    assert_eq!(s.alert.show_count(), 1);
}

#[test]
fn test_stale_fire_after_acknowledge_is_ignored() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();
    s.run_until(5);

    let countdown = s.clock.active_timer_ids()[0];
    s.cycle.acknowledge();

    // A fire that was already queued for the old countdown.
    s.cycle.on_timer(countdown);
    assert_eq!(s.cycle.phase(), CyclePhase::Working);
    assert_eq!(s.cycle.remaining_seconds(), 0);
    assert_eq!(s.alert.hide_count(), 1);
}

#[test]
fn test_stop_cancels_everything() {
    let mut s = Scenario::new(5, 3);
    s.cycle.start();
    s.run_until(6);

    s.cycle.stop();
    assert_eq!(s.clock.active_timer_count(), 0);
    assert_eq!(s.alert.visible_count(), 0);
    assert!(matches!(s.alert.calls().last(), Some(AlertCall::Hide { .. })));

    s.run_until(30);
    assert_eq!(s.shown_at, vec![5]);
}
