//! Notification error types.

use thiserror::Error;

/// Errors raised by a [`Notifier`](super::Notifier).
///
/// The reminder cycle logs these and carries on; a missing notification
/// never blocks a break.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The authorization request itself failed.
    #[error("failed to request notification permission: {0}")]
    AuthorizationFailed(String),

    /// The notification could not be delivered.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// The user declined notifications.
    #[error("notification permission denied")]
    PermissionDenied,

    /// The notification center could not be set up.
    #[error("failed to initialize notifications: {0}")]
    InitializationFailed(String),

    /// No notification center exists for this process.
    #[error("notification center not available")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "allow EyesOff in System Settings > Notifications"
            }
            Self::SendFailed(_) => "check Notification Center settings",
            Self::InitializationFailed(_) => "restart EyesOff",
            Self::NotAvailable => {
                "notifications need an app bundle; run with --no-notifications to silence this"
            }
        }
    }
}
