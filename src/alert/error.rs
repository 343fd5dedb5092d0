//! Alert presentation errors.

use thiserror::Error;

/// Errors raised when a break alert cannot be shown.
///
/// The cycle treats these as non-fatal: the countdown runs without a
/// visible alert and the break still ends on time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    /// No UI surface is available (headless session, tray not running).
    #[error("alert surface unavailable: {0}")]
    Unavailable(String),

    /// The alert window or menu could not be created.
    #[error("failed to create alert: {0}")]
    WindowCreation(String),
}
