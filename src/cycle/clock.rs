//! Timer scheduling for the reminder cycle.
//!
//! A [`Clock`] schedules one-shot or repeating timers and hands back a
//! cancellable [`TimerHandle`]. Fires are not delivered as callbacks: each
//! clock reports the [`TimerId`] of a fired timer, and the owner of the cycle
//! routes that id into [`ReminderCycle::on_timer`](super::ReminderCycle::on_timer).
//!
//! - [`TokioClock`]: wall-clock timers backed by tokio tasks
//! - [`ManualClock`]: virtual time, advanced explicitly (tests, simulations)

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

// ============================================================================
// TimerId / TimerHandle / Clock
// ============================================================================

/// Identifies one scheduled timer.
///
/// Ids are never reused by a cycle, so a fire carrying an old id can be
/// recognised as stale after its timer was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wraps a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Handle to a scheduled timer.
pub trait TimerHandle: fmt::Debug {
    /// Returns the id the timer reports when it fires.
    fn id(&self) -> TimerId;

    /// Cancels the timer. No further fires are produced after this returns.
    fn cancel(&mut self);
}

/// Schedules timers whose fires are reported by id.
pub trait Clock {
    /// Handle type returned for scheduled timers.
    type Handle: TimerHandle;

    /// Schedules a single fire after `delay`.
    fn schedule_once(&self, id: TimerId, delay: Duration) -> Self::Handle;

    /// Schedules a fire every `period`, the first one after `period`.
    fn schedule_repeating(&self, id: TimerId, period: Duration) -> Self::Handle;
}

// ============================================================================
// TokioClock
// ============================================================================

/// Clock backed by tokio timers.
///
/// Every scheduled timer is a spawned task that sends its id over an
/// unbounded channel. The receiving end is meant to be polled by the same
/// task that owns the cycle, which keeps all state changes on one logical
/// thread.
///
/// Repeating timers deliver every elapsed period. When the runtime thread
/// is blocked (AppKit menu tracking holds it while a menu is open), the
/// missed fires arrive back to back once it is released, so a break
/// countdown still ends after `break_duration_seconds` of wall time.
#[derive(Debug, Clone)]
pub struct TokioClock {
    fire_tx: mpsc::UnboundedSender<TimerId>,
}

impl TokioClock {
    /// Creates a clock and the receiver on which timer fires arrive.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (fire_tx, fire_rx) = mpsc::unbounded_channel();
        (Self { fire_tx }, fire_rx)
    }
}

/// Handle to a tokio-backed timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct TokioTimerHandle {
    id: TimerId,
    task: Option<JoinHandle<()>>,
}

impl TimerHandle for TokioTimerHandle {
    fn id(&self) -> TimerId {
        self.id
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::trace!(timer = %self.id, "timer task aborted");
        }
    }
}

impl Drop for TokioTimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Clock for TokioClock {
    type Handle = TokioTimerHandle;

    fn schedule_once(&self, id: TimerId, delay: Duration) -> Self::Handle {
        let Some(deadline) = deadline_after(id, delay) else {
            return TokioTimerHandle { id, task: None };
        };

        let tx = self.fire_tx.clone();
        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(id);
        });

        TokioTimerHandle {
            id,
            task: Some(task),
        }
    }

    fn schedule_repeating(&self, id: TimerId, period: Duration) -> Self::Handle {
        let Some(start) = deadline_after(id, period) else {
            return TokioTimerHandle { id, task: None };
        };

        let tx = self.fire_tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                ticker.tick().await;
                if tx.send(id).is_err() {
                    // Receiver gone: nobody is dispatching fires anymore.
                    break;
                }
            }
        });

        TokioTimerHandle {
            id,
            task: Some(task),
        }
    }
}

/// Deadline measured from the moment of scheduling, not from the first
/// poll of the timer task.
fn deadline_after(id: TimerId, delay: Duration) -> Option<Instant> {
    let deadline = Instant::now().checked_add(delay);
    if deadline.is_none() {
        tracing::warn!(timer = %id, ?delay, "timer delay out of range; it will never fire");
    }
    deadline
}

// ============================================================================
// ManualClock
// ============================================================================

#[derive(Debug)]
struct ManualTimer {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    cancelled: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct ManualClockInner {
    now: Duration,
    timers: Vec<ManualTimer>,
}

/// Clock driven by explicit calls to [`ManualClock::advance`].
///
/// Clones share the same virtual time, so a test can keep one clone while
/// the cycle owns another. For exact timing, advance in steps no longer
/// than the shortest scheduled period and dispatch the returned fires
/// before advancing again.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockInner>>,
}

/// Handle to a [`ManualClock`] timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct ManualTimerHandle {
    id: TimerId,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle for ManualTimerHandle {
    fn id(&self) -> TimerId {
        self.id
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Drop for ManualTimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl ManualClock {
    /// Creates a clock at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualClockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Returns the ids of timers that have not been cancelled or spent.
    #[must_use]
    pub fn active_timer_ids(&self) -> Vec<TimerId> {
        self.lock()
            .timers
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .map(|t| t.id)
            .collect()
    }

    /// Returns the number of live timers.
    #[must_use]
    pub fn active_timer_count(&self) -> usize {
        self.active_timer_ids().len()
    }

    /// Returns when the given live timer fires next.
    #[must_use]
    pub fn next_due(&self, id: TimerId) -> Option<Duration> {
        self.lock()
            .timers
            .iter()
            .find(|t| t.id == id && !t.cancelled.load(Ordering::SeqCst))
            .map(|t| t.due)
    }

    /// Returns the period of the given live timer (None for one-shot timers).
    #[must_use]
    pub fn period_of(&self, id: TimerId) -> Option<Duration> {
        self.lock()
            .timers
            .iter()
            .find(|t| t.id == id && !t.cancelled.load(Ordering::SeqCst))
            .and_then(|t| t.period)
    }

    /// Moves virtual time forward and returns the fires that became due,
    /// in chronological order (ties in scheduling order).
    pub fn advance(&self, by: Duration) -> Vec<TimerId> {
        let mut inner = self.lock();
        let target = inner.now.saturating_add(by);
        let mut fired = Vec::new();

        loop {
            let next = inner
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| !t.cancelled.load(Ordering::SeqCst) && t.due <= target)
                .min_by_key(|(index, t)| (t.due, *index))
                .map(|(index, _)| index);

            let Some(index) = next else {
                break;
            };

            let timer = &mut inner.timers[index];
            fired.push(timer.id);
            let due = timer.due;
            match timer.period.and_then(|period| due.checked_add(period)) {
                Some(next) => timer.due = next,
                None => timer.cancelled.store(true, Ordering::SeqCst),
            }
            inner.now = due;
        }

        inner.now = target;
        inner
            .timers
            .retain(|t| !t.cancelled.load(Ordering::SeqCst));
        fired
    }

    fn schedule(&self, id: TimerId, delay: Duration, period: Option<Duration>) -> ManualTimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut inner = self.lock();
        let due = inner.now.saturating_add(delay);
        inner.timers.push(ManualTimer {
            id,
            due,
            period,
            cancelled: Arc::clone(&cancelled),
        });

        ManualTimerHandle { id, cancelled }
    }
}

impl Clock for ManualClock {
    type Handle = ManualTimerHandle;

    fn schedule_once(&self, id: TimerId, delay: Duration) -> Self::Handle {
        self.schedule(id, delay, None)
    }

    fn schedule_repeating(&self, id: TimerId, period: Duration) -> Self::Handle {
        self.schedule(id, period, Some(period))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    // ------------------------------------------------------------------------
    // TimerId Tests
    // ------------------------------------------------------------------------

    mod timer_id_tests {
        use super::*;

        #[test]
        fn test_display() {
            assert_eq!(TimerId::new(7).to_string(), "timer#7");
        }

        #[test]
        fn test_ordering() {
            assert!(TimerId::new(1) < TimerId::new(2));
            assert_eq!(TimerId::new(3).get(), 3);
        }
    }

    // ------------------------------------------------------------------------
    // ManualClock Tests
    // ------------------------------------------------------------------------

    mod manual_clock_tests {
        use super::*;

        #[test]
        fn test_once_fires_a_single_time() {
            let clock = ManualClock::new();
            let _handle = clock.schedule_once(TimerId::new(1), secs(2));

            assert!(clock.advance(secs(1)).is_empty());
            assert_eq!(clock.advance(secs(1)), vec![TimerId::new(1)]);
            assert!(clock.advance(secs(10)).is_empty());
            assert_eq!(clock.active_timer_count(), 0);
        }

        #[test]
        fn test_repeating_fires_every_period() {
            let clock = ManualClock::new();
            let _handle = clock.schedule_repeating(TimerId::new(1), secs(2));

            assert_eq!(clock.advance(secs(6)), vec![TimerId::new(1); 3]);
            assert_eq!(clock.next_due(TimerId::new(1)), Some(secs(8)));
            assert_eq!(clock.period_of(TimerId::new(1)), Some(secs(2)));
        }

        #[test]
        fn test_cancel_stops_fires() {
            let clock = ManualClock::new();
            let mut handle = clock.schedule_repeating(TimerId::new(1), secs(1));

            handle.cancel();

            assert!(clock.advance(secs(5)).is_empty());
            assert_eq!(clock.active_timer_count(), 0);
        }

        #[test]
        fn test_drop_cancels() {
            let clock = ManualClock::new();
            {
                let _handle = clock.schedule_repeating(TimerId::new(1), secs(1));
            }
            assert!(clock.advance(secs(3)).is_empty());
        }

        #[test]
        fn test_fires_are_chronological() {
            let clock = ManualClock::new();
            let _a = clock.schedule_once(TimerId::new(1), secs(3));
            let _b = clock.schedule_once(TimerId::new(2), secs(1));
            let _c = clock.schedule_once(TimerId::new(3), secs(3));

            assert_eq!(
                clock.advance(secs(5)),
                vec![TimerId::new(2), TimerId::new(1), TimerId::new(3)]
            );
            assert_eq!(clock.now(), secs(5));
        }

        #[test]
        fn test_schedule_is_relative_to_now() {
            let clock = ManualClock::new();
            clock.advance(secs(10));
            let handle = clock.schedule_once(TimerId::new(9), secs(5));

            assert_eq!(clock.next_due(handle.id()), Some(secs(15)));
        }

        #[test]
        fn test_out_of_range_period_never_fires() {
            let clock = ManualClock::new();
            clock.advance(secs(1));
            let _handle = clock.schedule_repeating(TimerId::new(1), secs(u64::MAX));

            assert!(clock.advance(secs(1)).is_empty());
            assert_eq!(clock.now(), secs(2));
        }

        #[test]
        fn test_clones_share_time() {
            let clock = ManualClock::new();
            let other = clock.clone();
            clock.advance(secs(4));
            assert_eq!(other.now(), secs(4));
        }
    }

    // ------------------------------------------------------------------------
    // TokioClock Tests
    // ------------------------------------------------------------------------

    mod tokio_clock_tests {
        use super::*;
        use tokio::time::timeout;

        #[tokio::test]
        async fn test_once_delivers_id() {
            let (clock, mut rx) = TokioClock::new();
            let _handle = clock.schedule_once(TimerId::new(42), Duration::from_millis(50));

            let fired = timeout(Duration::from_secs(2), rx.recv()).await;
            assert_eq!(fired.ok().flatten(), Some(TimerId::new(42)));
        }

        #[tokio::test]
        async fn test_repeating_delivers_multiple_fires() {
            let (clock, mut rx) = TokioClock::new();
            let _handle = clock.schedule_repeating(TimerId::new(1), Duration::from_millis(50));

            for _ in 0..3 {
                let fired = timeout(Duration::from_secs(2), rx.recv()).await;
                assert_eq!(fired.ok().flatten(), Some(TimerId::new(1)));
            }
        }

        #[tokio::test]
        async fn test_out_of_range_period_is_inert() {
            let (clock, mut rx) = TokioClock::new();
            let handle = clock.schedule_repeating(TimerId::new(5), secs(u64::MAX));
            assert_eq!(handle.id(), TimerId::new(5));

            let fired = timeout(Duration::from_millis(100), rx.recv()).await;
            assert!(fired.is_err());
        }

        #[tokio::test]
        async fn test_blocked_runtime_catches_up_missed_periods() {
            let (clock, mut rx) = TokioClock::new();
            let _handle = clock.schedule_repeating(TimerId::new(1), Duration::from_millis(100));

            // Holds the only runtime thread, like AppKit menu tracking does.
            std::thread::sleep(Duration::from_millis(550));

            let caught_up = timeout(Duration::from_millis(80), async {
                for _ in 0..5 {
                    rx.recv().await;
                }
            })
            .await;
            assert!(caught_up.is_ok(), "missed periods should be delivered at once");
        }

        #[tokio::test]
        async fn test_cancel_stops_delivery() {
            let (clock, mut rx) = TokioClock::new();
            let mut handle = clock.schedule_repeating(TimerId::new(1), Duration::from_millis(50));
            handle.cancel();

            tokio::time::sleep(Duration::from_millis(200)).await;
            assert!(rx.try_recv().is_err());
        }

        #[tokio::test]
        async fn test_drop_stops_delivery() {
            let (clock, mut rx) = TokioClock::new();
            drop(clock.schedule_once(TimerId::new(1), Duration::from_millis(50)));

            tokio::time::sleep(Duration::from_millis(200)).await;
            assert!(rx.try_recv().is_err());
        }
    }
}
