//! Notification content.

#[cfg(target_os = "macos")]
use objc2::rc::Retained;
#[cfg(target_os = "macos")]
use objc2_foundation::NSString;
#[cfg(target_os = "macos")]
use objc2_user_notifications::{UNMutableNotificationContent, UNNotificationSound};

#[cfg(target_os = "macos")]
use super::actions::category_ids;

/// Upper bound for any text field shown in a notification.
const MAX_TEXT_LENGTH: usize = 200;

/// Platform-neutral content of one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Sound to attach, or None for a silent notification.
    pub sound_name: Option<String>,
}

impl NotificationContent {
    /// Creates silent content with sanitized text.
    #[must_use]
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: sanitize_text(title),
            body: sanitize_text(body),
            sound_name: None,
        }
    }

    /// Attaches a named sound.
    #[must_use]
    pub fn with_sound(mut self, name: impl Into<String>) -> Self {
        self.sound_name = Some(name.into());
        self
    }

    /// Content sent when a break starts.
    #[must_use]
    pub fn break_reminder(remaining_seconds: u32) -> Self {
        Self::new(
            "👁️ EyesOff Break Time",
            &format!("Look 20 feet away for {remaining_seconds} seconds."),
        )
    }
}

/// Truncates text and strips control characters other than newlines.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .take(MAX_TEXT_LENGTH)
        .collect()
}

/// Fluent wrapper around `UNMutableNotificationContent`.
#[cfg(target_os = "macos")]
pub struct NotificationContentBuilder {
    content: Retained<UNMutableNotificationContent>,
}

#[cfg(target_os = "macos")]
impl NotificationContentBuilder {
    #[must_use]
    pub fn new() -> Self {
        let content = unsafe { UNMutableNotificationContent::new() };
        Self { content }
    }

    #[must_use]
    pub fn title(self, title: &str) -> Self {
        unsafe { self.content.setTitle(&NSString::from_str(title)) };
        self
    }

    #[must_use]
    pub fn body(self, body: &str) -> Self {
        unsafe { self.content.setBody(&NSString::from_str(body)) };
        self
    }

    #[must_use]
    pub fn category_identifier(self, category_id: &str) -> Self {
        unsafe {
            self.content
                .setCategoryIdentifier(&NSString::from_str(category_id));
        }
        self
    }

    /// Attaches a sound from `/Library/Sounds` or the system sound set.
    #[must_use]
    pub fn named_sound(self, name: &str) -> Self {
        let sound = unsafe { UNNotificationSound::soundNamed(&NSString::from_str(name)) };
        unsafe { self.content.setSound(Some(&sound)) };
        self
    }

    #[must_use]
    pub fn build(self) -> Retained<UNMutableNotificationContent> {
        self.content
    }
}

#[cfg(target_os = "macos")]
impl Default for NotificationContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "macos")]
impl NotificationContent {
    /// Converts to native content in the break category, so the
    /// acknowledge button is shown.
    #[must_use]
    pub fn to_native(&self) -> Retained<UNMutableNotificationContent> {
        let builder = NotificationContentBuilder::new()
            .title(&self.title)
            .body(&self.body)
            .category_identifier(category_ids::BREAK_REMINDER);

        match &self.sound_name {
            Some(name) => builder.named_sound(name),
            None => builder,
        }
        .build()
    }
}
