//! Fire-and-forget wrappers around `UNUserNotificationCenter`.
//!
//! Completion handlers only log; nothing waits on them, so the event loop
//! never blocks on the notification daemon.

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{Bool, ProtocolObject};
use objc2_foundation::{NSBundle, NSError, NSSet};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNNotificationCategory, UNNotificationRequest,
    UNUserNotificationCenter, UNUserNotificationCenterDelegate,
};
use tracing::{debug, warn};

pub struct NotificationCenter;

impl NotificationCenter {
    /// Returns true when the process runs from an app bundle.
    ///
    /// `currentNotificationCenter` raises an Objective-C exception for bare
    /// binaries, so this must be checked first.
    #[allow(unused_unsafe)]
    #[must_use]
    pub fn is_available() -> bool {
        let identifier = unsafe { NSBundle::mainBundle().bundleIdentifier() };
        identifier.is_some()
    }

    #[must_use]
    pub fn current() -> Retained<UNUserNotificationCenter> {
        UNUserNotificationCenter::currentNotificationCenter()
    }

    pub fn request_authorization() {
        let options = UNAuthorizationOptions::Alert | UNAuthorizationOptions::Sound;

        let block = RcBlock::new(|granted: Bool, error: *mut NSError| {
            if let Some(error) = unsafe { error.as_ref() } {
                warn!(
                    error = %error.localizedDescription(),
                    "notification permission request failed"
                );
            } else if granted.as_bool() {
                debug!("notification permission granted");
            } else {
                warn!("notification permission not granted");
            }
        });

        Self::current().requestAuthorizationWithOptions_completionHandler(options, &block);
    }

    pub fn set_notification_categories(categories: &[Retained<UNNotificationCategory>]) {
        let refs: Vec<&UNNotificationCategory> = categories.iter().map(AsRef::as_ref).collect();
        let set: Retained<NSSet<UNNotificationCategory>> = NSSet::from_slice(&refs);
        Self::current().setNotificationCategories(&set);
    }

    pub fn set_delegate(delegate: &ProtocolObject<dyn UNUserNotificationCenterDelegate>) {
        Self::current().setDelegate(Some(delegate));
    }

    pub fn add_notification_request(request: &UNNotificationRequest) {
        let block = RcBlock::new(|error: *mut NSError| {
            if let Some(error) = unsafe { error.as_ref() } {
                warn!(
                    error = %error.localizedDescription(),
                    "notification delivery failed"
                );
            }
        });

        Self::current().addNotificationRequest_withCompletionHandler(request, Some(&block));
    }
}
