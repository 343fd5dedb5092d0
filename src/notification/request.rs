//! Notification request creation.

use objc2::rc::Retained;
use objc2_foundation::NSString;
use objc2_user_notifications::{UNMutableNotificationContent, UNNotificationRequest};
use uuid::Uuid;

/// Wraps content in an immediately delivered request with a fresh id.
#[must_use]
pub fn create_notification_request(
    content: &UNMutableNotificationContent,
) -> Retained<UNNotificationRequest> {
    let identifier = NSString::from_str(&format!("eyesoff-break-{}", Uuid::new_v4()));

    UNNotificationRequest::requestWithIdentifier_content_trigger(&identifier, content, None)
}
