//! Break alert presentation.
//!
//! The cycle shows at most one alert at a time through an
//! [`AlertPresenter`]. Every successful `show` hands back an
//! [`AlertHandle`], which must be passed to `hide` exactly once.

mod error;
mod tray;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use error::PresentationError;
pub use tray::TrayAlertPresenter;

// ============================================================================
// BreakMessage / AlertHandle
// ============================================================================

/// Text shown while a break is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakMessage {
    /// Alert title.
    pub title: String,
    /// Multi-line body.
    pub body: String,
}

impl BreakMessage {
    /// Builds the standard 20-20-20 message for a break of the given length.
    #[must_use]
    pub fn for_break(seconds: u32) -> Self {
        Self {
            title: "👁️ EyesOff Break Time".to_string(),
            body: format!(
                "🧘 Time to rest your eyes!\n\n\
                 ⏳ Please look 20 feet away and relax for {seconds}s.\n\n\
                 💡 Blink slowly. Breathe deeply."
            ),
        }
    }

    /// Returns the body lines, skipping blank separators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines().filter(|line| !line.trim().is_empty())
    }
}

/// Formats the countdown label shown next to an alert.
#[must_use]
pub fn countdown_label(remaining_seconds: u32) -> String {
    format!("⏳ {remaining_seconds}s")
}

/// Identifies one shown alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertHandle(u64);

impl AlertHandle {
    /// Wraps a raw handle value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlertHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alert#{}", self.0)
    }
}

// ============================================================================
// AlertPresenter
// ============================================================================

/// Alert presentation collaborator.
pub trait AlertPresenter {
    /// Shows the break alert.
    ///
    /// # Errors
    ///
    /// Returns an error if no alert could be displayed.
    fn show(
        &self,
        message: &BreakMessage,
        remaining_seconds: u32,
    ) -> Result<AlertHandle, PresentationError>;

    /// Updates the countdown of a visible alert.
    fn update_countdown(&self, handle: &AlertHandle, remaining_seconds: u32);

    /// Hides an alert. The handle is consumed.
    fn hide(&self, handle: AlertHandle);
}

// ============================================================================
// MockAlertPresenter
// ============================================================================

/// A call recorded by [`MockAlertPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertCall {
    Show {
        handle: AlertHandle,
        remaining_seconds: u32,
    },
    Update {
        handle: AlertHandle,
        remaining_seconds: u32,
    },
    Hide {
        handle: AlertHandle,
    },
}

/// Mock alert presenter for testing.
#[derive(Debug)]
pub struct MockAlertPresenter {
    calls: Mutex<Vec<AlertCall>>,
    visible: Mutex<Vec<AlertHandle>>,
    max_visible: AtomicU64,
    next_handle: AtomicU64,
    should_fail: AtomicBool,
}

impl Default for MockAlertPresenter {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAlertPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            visible: Mutex::new(Vec::new()),
            max_visible: AtomicU64::new(0),
            next_handle: AtomicU64::new(1),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<AlertCall> {
        lock(&self.calls).clone()
    }

    /// Number of successful `show` calls.
    #[must_use]
    pub fn show_count(&self) -> usize {
        self.count(|c| matches!(c, AlertCall::Show { .. }))
    }

    #[must_use]
    pub fn hide_count(&self) -> usize {
        self.count(|c| matches!(c, AlertCall::Hide { .. }))
    }

    /// Countdown values passed to `update_countdown`, in order.
    #[must_use]
    pub fn countdown_updates(&self) -> Vec<u32> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                AlertCall::Update {
                    remaining_seconds, ..
                } => Some(*remaining_seconds),
                _ => None,
            })
            .collect()
    }

    /// Number of alerts currently shown and not yet hidden.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        lock(&self.visible).len()
    }

    /// Highest number of alerts that were ever visible at once.
    #[must_use]
    pub fn max_visible(&self) -> u64 {
        self.max_visible.load(Ordering::SeqCst)
    }

    fn count(&self, pred: impl Fn(&AlertCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| pred(c)).count()
    }
}

impl AlertPresenter for MockAlertPresenter {
    fn show(
        &self,
        _message: &BreakMessage,
        remaining_seconds: u32,
    ) -> Result<AlertHandle, PresentationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(PresentationError::WindowCreation("mock failure".to_string()));
        }

        let handle = AlertHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        let mut visible = lock(&self.visible);
        visible.push(handle);
        self.max_visible
            .fetch_max(visible.len() as u64, Ordering::SeqCst);

        lock(&self.calls).push(AlertCall::Show {
            handle,
            remaining_seconds,
        });
        Ok(handle)
    }

    fn update_countdown(&self, handle: &AlertHandle, remaining_seconds: u32) {
        lock(&self.calls).push(AlertCall::Update {
            handle: *handle,
            remaining_seconds,
        });
    }

    fn hide(&self, handle: AlertHandle) {
        lock(&self.visible).retain(|h| *h != handle);
        lock(&self.calls).push(AlertCall::Hide { handle });
    }
}
