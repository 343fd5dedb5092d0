//! Notification actions and categories.
//!
//! Break notifications carry a single "Got it!" button. Pressing it ends
//! the break the same way the menu item does.

#[cfg(target_os = "macos")]
use objc2::rc::Retained;
#[cfg(target_os = "macos")]
use objc2_foundation::{NSArray, NSString};
#[cfg(target_os = "macos")]
use objc2_user_notifications::{
    UNNotificationAction, UNNotificationActionOptions, UNNotificationCategory,
    UNNotificationCategoryOptions,
};

/// Notification action identifiers.
pub mod action_ids {
    /// "Got it!" button.
    pub const ACKNOWLEDGE: &str = "ACKNOWLEDGE_ACTION";
    /// The user clicked the notification body.
    pub const DEFAULT: &str = "com.apple.UNNotificationDefaultActionIdentifier";
    /// The user closed the notification.
    pub const DISMISS: &str = "com.apple.UNNotificationDismissActionIdentifier";
}

/// Notification category identifiers.
pub mod category_ids {
    /// Category attached to break reminders.
    pub const BREAK_REMINDER: &str = "BREAK_REMINDER";
}

/// A user response to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationActionEvent {
    /// "Got it!" was pressed.
    Acknowledge,
    /// The notification itself was clicked.
    Default,
    /// The notification was dismissed.
    Dismiss,
}

impl NotificationActionEvent {
    /// Maps a native action identifier to an event.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            action_ids::ACKNOWLEDGE => Some(Self::Acknowledge),
            action_ids::DEFAULT => Some(Self::Default),
            action_ids::DISMISS => Some(Self::Dismiss),
            _ => None,
        }
    }

    /// Returns true if this response should end the current break.
    #[must_use]
    pub fn acknowledges_break(&self) -> bool {
        matches!(self, Self::Acknowledge)
    }
}

/// Creates the "Got it!" action.
#[cfg(target_os = "macos")]
#[must_use]
pub fn create_acknowledge_action() -> Retained<UNNotificationAction> {
    let identifier = NSString::from_str(action_ids::ACKNOWLEDGE);
    let title = NSString::from_str("Got it!");

    unsafe {
        UNNotificationAction::actionWithIdentifier_title_options(
            &identifier,
            &title,
            UNNotificationActionOptions::empty(),
        )
    }
}

/// Creates the categories registered with the notification center.
#[cfg(target_os = "macos")]
#[must_use]
pub fn create_categories() -> Vec<Retained<UNNotificationCategory>> {
    let acknowledge = create_acknowledge_action();
    let actions: Retained<NSArray<UNNotificationAction>> =
        NSArray::from_slice(&[acknowledge.as_ref()]);
    let intent_identifiers: Retained<NSArray<NSString>> = NSArray::from_slice(&[]);
    let identifier = NSString::from_str(category_ids::BREAK_REMINDER);

    let category = unsafe {
        UNNotificationCategory::categoryWithIdentifier_actions_intentIdentifiers_options(
            &identifier,
            &actions,
            &intent_identifiers,
            UNNotificationCategoryOptions::CustomDismissAction,
        )
    };

    vec![category]
}
