//! Break notifications.
//!
//! The reminder cycle talks to a [`Notifier`]. Sending is fire-and-forget:
//! failures come back as [`NotificationError`] and are logged by the caller,
//! never retried.
//!
//! - [`UserNotificationsNotifier`] (macOS): `UNUserNotificationCenter`, with
//!   a "Got it!" button that acknowledges the break
//! - [`LogNotifier`]: writes notifications to the log
//! - [`MockNotifier`]: records notifications for tests
//!
//! # Requirements
//!
//! On macOS the notification center only works for processes launched from
//! an app bundle. Bare binaries fall back to [`LogNotifier`].

mod actions;
mod content;
pub mod error;

#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod delegate;
#[cfg(target_os = "macos")]
mod request;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use self::actions::{action_ids, category_ids, NotificationActionEvent};
pub use self::content::{sanitize_text, NotificationContent};
pub use self::error::NotificationError;

#[cfg(target_os = "macos")]
pub use self::content::NotificationContentBuilder;
#[cfg(target_os = "macos")]
pub use self::delegate::NotificationDelegate;

/// Notification collaborator.
pub trait Notifier {
    /// Asks the user for permission. Returns immediately; a denial is only
    /// logged.
    fn request_permission(&self);

    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be handed to the
    /// system.
    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError>;

    /// Returns the next pending user response, if any.
    fn try_recv_action(&self) -> Option<NotificationActionEvent> {
        None
    }

    /// Returns true if notifications can be delivered.
    fn is_available(&self) -> bool {
        true
    }
}

// ============================================================================
// UserNotificationsNotifier (macOS)
// ============================================================================

#[cfg(target_os = "macos")]
pub use self::macos::UserNotificationsNotifier;

#[cfg(target_os = "macos")]
mod macos {
    use std::sync::mpsc::{self, Receiver};

    use objc2::rc::Retained;
    use objc2::MainThreadMarker;

    use super::actions::create_categories;
    use super::center::NotificationCenter;
    use super::delegate::NotificationDelegate;
    use super::request::create_notification_request;
    use super::{NotificationActionEvent, NotificationContent, NotificationError, Notifier};

    /// Notifier backed by `UNUserNotificationCenter`.
    pub struct UserNotificationsNotifier {
        action_receiver: Receiver<NotificationActionEvent>,
        _delegate: Retained<NotificationDelegate>,
    }

    impl UserNotificationsNotifier {
        /// Installs the delegate and registers the break category.
        ///
        /// # Errors
        ///
        /// Returns an error when called off the main thread or outside an
        /// app bundle.
        pub fn new() -> Result<Self, NotificationError> {
            let mtm = MainThreadMarker::new().ok_or_else(|| {
                NotificationError::InitializationFailed(
                    "notifications must be set up on the main thread".to_string(),
                )
            })?;

            if !NotificationCenter::is_available() {
                return Err(NotificationError::NotAvailable);
            }

            let (sender, receiver) = mpsc::channel();
            let delegate = NotificationDelegate::new(mtm, sender);
            NotificationCenter::set_delegate(&NotificationDelegate::as_protocol(&delegate));
            NotificationCenter::set_notification_categories(&create_categories());

            Ok(Self {
                action_receiver: receiver,
                _delegate: delegate,
            })
        }
    }

    impl Notifier for UserNotificationsNotifier {
        fn request_permission(&self) {
            NotificationCenter::request_authorization();
        }

        fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
            let native = content.to_native();
            let request = create_notification_request(&native);
            NotificationCenter::add_notification_request(&request);
            Ok(())
        }

        fn try_recv_action(&self) -> Option<NotificationActionEvent> {
            self.action_receiver.try_recv().ok()
        }
    }
}

// ============================================================================
// LogNotifier
// ============================================================================

/// Notifier that writes to the log instead of the desktop.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn request_permission(&self) {
        tracing::debug!("log notifier needs no permission");
    }

    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        tracing::info!(title = %content.title, body = %content.body, "notification");
        Ok(())
    }
}

/// Creates the best notifier available for this process.
#[must_use]
pub fn create_notifier() -> Arc<dyn Notifier> {
    #[cfg(target_os = "macos")]
    {
        match UserNotificationsNotifier::new() {
            Ok(notifier) => return Arc::new(notifier),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to log notifications");
                tracing::info!("{}", e.suggestion());
            }
        }
    }

    Arc::new(LogNotifier)
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    sent: Mutex<Vec<NotificationContent>>,
    action_events: Mutex<VecDeque<NotificationActionEvent>>,
    permission_requests: Mutex<u32>,
    available: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            action_events: Mutex::new(VecDeque::new()),
            permission_requests: Mutex::new(0),
            available: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn inject_action_event(&self, event: NotificationActionEvent) {
        lock(&self.action_events).push_back(event);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<NotificationContent> {
        lock(&self.sent).clone()
    }

    #[must_use]
    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }

    #[must_use]
    pub fn permission_requests(&self) -> u32 {
        *lock(&self.permission_requests)
    }
}

impl Notifier for MockNotifier {
    fn request_permission(&self) {
        *lock(&self.permission_requests) += 1;
    }

    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("mock failure".to_string()));
        }
        if !self.is_available() {
            return Err(NotificationError::NotAvailable);
        }
        lock(&self.sent).push(content.clone());
        Ok(())
    }

    fn try_recv_action(&self) -> Option<NotificationActionEvent> {
        lock(&self.action_events).pop_front()
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
