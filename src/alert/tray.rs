//! Break alert shown in the menu bar and the floating break panel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crossbeam_channel::Sender;

use super::{AlertHandle, AlertPresenter, BreakMessage, PresentationError};
use crate::menubar::TrayUpdate;

/// Presents breaks through the tray manager: countdown in the title,
/// message lines and "Got it!" in the menu, plus the floating break panel
/// on macOS.
#[derive(Debug)]
pub struct TrayAlertPresenter {
    update_tx: Sender<TrayUpdate>,
    next_handle: AtomicU64,
    current: Mutex<Option<AlertHandle>>,
}

impl TrayAlertPresenter {
    pub fn new(update_tx: Sender<TrayUpdate>) -> Self {
        Self {
            update_tx,
            next_handle: AtomicU64::new(1),
            current: Mutex::new(None),
        }
    }

    fn is_current(&self, handle: &AlertHandle) -> bool {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) == Some(*handle)
    }
}

impl AlertPresenter for TrayAlertPresenter {
    fn show(
        &self,
        message: &BreakMessage,
        remaining_seconds: u32,
    ) -> Result<AlertHandle, PresentationError> {
        self.update_tx
            .send(TrayUpdate::ShowBreak {
                message: message.clone(),
                remaining_seconds,
            })
            .map_err(|_| PresentationError::Unavailable("menu bar is not running".to_string()))?;

        let handle = AlertHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(handle)
    }

    fn update_countdown(&self, handle: &AlertHandle, remaining_seconds: u32) {
        if !self.is_current(handle) {
            tracing::debug!(%handle, "countdown update for hidden alert ignored");
            return;
        }
        let _ = self.update_tx.send(TrayUpdate::Countdown(remaining_seconds));
    }

    fn hide(&self, handle: AlertHandle) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != Some(handle) {
            tracing::debug!(%handle, "alert already hidden");
            return;
        }
        *current = None;
        let _ = self.update_tx.send(TrayUpdate::HideBreak);
    }
}
